mod config;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::info;

use runbox_api::auth::{AppState, AppStateInner};
use runbox_gateway::ExecutionGateway;

use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "runbox=debug,tower_http=debug".into()),
        )
        .init();

    let cfg = Config::from_env()?;

    // The language table ships with the embedded frontend; refuse to
    // start if it ever goes inconsistent.
    runbox_session::validate_catalog()?;

    // Init database
    let db = runbox_db::Database::open(&PathBuf::from(&cfg.db_path))?;

    let gateway = ExecutionGateway::new(
        cfg.provider_url.clone(),
        cfg.provider_client_id.clone(),
        cfg.provider_client_secret.clone(),
    )?;

    // Shared state
    let state: AppState = Arc::new(AppStateInner {
        db,
        jwt_secret: cfg.jwt_secret.clone(),
        gateway,
    });

    // Static frontend with SPA fallback to index.html
    let assets = PathBuf::from(&cfg.assets_dir);
    let frontend = ServeDir::new(&assets).fallback(ServeFile::new(assets.join("index.html")));

    let app = runbox_api::router(state)
        .fallback_service(frontend)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", cfg.host, cfg.port).parse()?;
    info!("runbox server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
