use anyhow::anyhow;
use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use tracing::info;

use runbox_types::api::{
    Claims, SaveSnippetRequest, SaveSnippetResponse, SnippetRecord, SnippetSummary,
};

use crate::auth::AppState;
use crate::error::ApiError;

/// POST /api/code/save: export one editor buffer as a new snippet row.
/// Saves never update in place; every call inserts.
pub async fn save_code(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SaveSnippetRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (Some(filename), Some(language), Some(code)) = (
        nonempty(&req.filename),
        nonempty(&req.language),
        nonempty(&req.code),
    ) else {
        return Err(ApiError::Validation("Missing required fields".into()));
    };

    let db = state.clone();
    let filename = filename.to_string();
    let language = language.to_string();
    let code = code.to_string();
    let user_id = claims.sub;

    let id = tokio::task::spawn_blocking(move || {
        db.db
            .insert_snippet(user_id, &filename, &language, &code)
            .map_err(|e| ApiError::store("Failed to save code", e))
    })
    .await
    .map_err(|e| ApiError::store("Failed to save code", anyhow!(e)))??;

    info!(user_id, snippet_id = id, "snippet saved");

    Ok(Json(SaveSnippetResponse { success: true, id }))
}

/// GET /api/code: the caller's snippets, metadata only, newest first.
pub async fn list_codes(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let user_id = claims.sub;

    let rows = tokio::task::spawn_blocking(move || {
        db.db
            .list_snippets_by_owner(user_id)
            .map_err(|e| ApiError::store("Failed to fetch codes", e))
    })
    .await
    .map_err(|e| ApiError::store("Failed to fetch codes", anyhow!(e)))??;

    let summaries: Vec<SnippetSummary> = rows
        .into_iter()
        .map(|row| SnippetSummary {
            id: row.id,
            filename: row.filename,
            language: row.language,
            created_at: row.created_at,
        })
        .collect();

    Ok(Json(summaries))
}

/// GET /api/code/{id}: full snippet including source. A snippet owned
/// by someone else 404s exactly like a missing one.
pub async fn get_code(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let user_id = claims.sub;

    let row = tokio::task::spawn_blocking(move || {
        db.db
            .get_snippet(user_id, id)
            .map_err(|e| ApiError::store("Failed to fetch code", e))
    })
    .await
    .map_err(|e| ApiError::store("Failed to fetch code", anyhow!(e)))??
    .ok_or_else(|| ApiError::NotFound("Code not found".into()))?;

    Ok(Json(SnippetRecord {
        id: row.id,
        user_id: row.user_id,
        filename: row.filename,
        language: row.language,
        code: row.code,
        created_at: row.created_at,
    }))
}

fn nonempty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}
