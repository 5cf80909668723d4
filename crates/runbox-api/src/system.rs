use anyhow::anyhow;
use axum::{Extension, Json, extract::State};
use serde_json::{Value, json};

use runbox_types::api::{Claims, PingResponse};

use crate::auth::AppState;
use crate::error::ApiError;

/// GET /ping: liveness probe exercising the database.
pub async fn ping(State(state): State<AppState>) -> Result<Json<PingResponse>, ApiError> {
    let db = state.clone();
    let db_time = tokio::task::spawn_blocking(move || {
        db.db
            .db_time()
            .map_err(|e| ApiError::store("Database connection failed", e))
    })
    .await
    .map_err(|e| ApiError::store("Database connection failed", anyhow!(e)))??;

    Ok(Json(PingResponse {
        message: "pong".into(),
        db_time,
    }))
}

/// GET /api/protected: diagnostic identity echo behind the auth gate.
pub async fn protected(Extension(claims): Extension<Claims>) -> Json<Value> {
    Json(json!({
        "message": format!("Hello user {}, you accessed a protected route!", claims.sub),
    }))
}
