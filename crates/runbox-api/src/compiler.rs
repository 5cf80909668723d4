use axum::{Json, extract::State};
use serde_json::Value;

use runbox_gateway::GatewayError;
use runbox_types::api::RunRequest;

use crate::auth::AppState;
use crate::error::ApiError;

/// POST /api/compiler/run: forward the run to the execution provider
/// and relay its JSON verbatim. No auth gate: running code does not
/// require an account, only saving does.
pub async fn run(
    State(state): State<AppState>,
    Json(req): Json<RunRequest>,
) -> Result<Json<Value>, ApiError> {
    let result = state.gateway.execute(&req).await.map_err(|e| match e {
        GatewayError::Validation(msg) => ApiError::Validation(msg),
        GatewayError::Provider(msg) => ApiError::Execution(msg),
    })?;

    Ok(Json(result))
}
