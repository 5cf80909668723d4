pub mod auth;
pub mod compiler;
pub mod error;
pub mod middleware;
pub mod snippets;
pub mod system;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};

use crate::auth::AppState;
use crate::middleware::require_auth;

/// The full API surface. Static assets and tower layers are the
/// server binary's business; tests drive this router directly.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/compiler/run", post(compiler::run))
        .route("/ping", get(system::ping))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/api/code/save", post(snippets::save_code))
        .route("/api/code", get(snippets::list_codes))
        .route("/api/code/{id}", get(snippets::get_code))
        .route("/api/protected", get(system::protected))
        .layer(from_fn_with_state(state.clone(), require_auth))
        .with_state(state);

    Router::new().merge(public_routes).merge(protected_routes)
}
