use anyhow::{Context, Result};
use tracing::warn;

/// Environment-sourced configuration. Everything has a default except
/// the provider credentials; runs are rejected by the provider until
/// those are set, which is worth a loud warning at startup.
pub struct Config {
    pub db_path: String,
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
    pub assets_dir: String,
    pub provider_url: Option<String>,
    pub provider_client_id: String,
    pub provider_client_secret: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let port: u16 = std::env::var("RUNBOX_PORT")
            .unwrap_or_else(|_| "5000".into())
            .parse()
            .context("RUNBOX_PORT must be a port number")?;

        let provider_client_id = std::env::var("JDOODLE_CLIENT_ID").unwrap_or_default();
        let provider_client_secret = std::env::var("JDOODLE_CLIENT_SECRET").unwrap_or_default();
        if provider_client_id.is_empty() || provider_client_secret.is_empty() {
            warn!("JDOODLE_CLIENT_ID / JDOODLE_CLIENT_SECRET not set; the provider will reject runs");
        }

        Ok(Self {
            db_path: std::env::var("RUNBOX_DB_PATH").unwrap_or_else(|_| "runbox.db".into()),
            jwt_secret: std::env::var("RUNBOX_JWT_SECRET")
                .unwrap_or_else(|_| "dev-secret-change-me".into()),
            host: std::env::var("RUNBOX_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port,
            assets_dir: std::env::var("RUNBOX_ASSETS_DIR").unwrap_or_else(|_| "frontend".into()),
            provider_url: std::env::var("JDOODLE_URL").ok(),
            provider_client_id,
            provider_client_secret,
        })
    }
}
