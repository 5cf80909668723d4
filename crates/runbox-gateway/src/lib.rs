//! Execution Gateway: forwards run requests to the external execution
//! provider and relays its JSON response verbatim.
//!
//! The gateway is stateless and keeps no result cache: identical inputs
//! are always re-submitted. Provider output is the contract; nothing is
//! reshaped on the way through.

use std::time::Duration;

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use runbox_types::api::RunRequest;

const DEFAULT_ENDPOINT: &str = "https://api.jdoodle.com/v1/execute";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Provider(String),
}

/// Wire shape of the provider's synchronous execute endpoint. `stdin`
/// always goes out, defaulting to empty, matching what the provider
/// expects for programs that read no input.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProviderRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    script: &'a str,
    language: &'a str,
    version_index: &'a str,
    stdin: &'a str,
}

pub struct ExecutionGateway {
    http: reqwest::Client,
    endpoint: String,
    client_id: String,
    client_secret: String,
}

impl ExecutionGateway {
    pub fn new(
        endpoint: Option<String>,
        client_id: String,
        client_secret: String,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            endpoint: endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            client_id,
            client_secret,
        })
    }

    /// Submit a run to the provider and return its response body as-is.
    ///
    /// Required fields are checked before any network traffic. The
    /// provider's own status handling is part of the passthrough: a non-2xx
    /// body that still parses as JSON is returned to the caller unchanged.
    pub async fn execute(&self, req: &RunRequest) -> Result<Value, GatewayError> {
        let language = required(&req.language, "language")?;
        let version_index = required(&req.version_index, "versionIndex")?;
        let script = required(&req.code, "code")?;

        let body = ProviderRequest {
            client_id: &self.client_id,
            client_secret: &self.client_secret,
            script,
            language,
            version_index,
            stdin: req.stdin.as_deref().unwrap_or(""),
        };

        debug!(language, version_index, "submitting run to provider");

        let resp = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Provider(e.to_string()))?;

        resp.json::<Value>()
            .await
            .map_err(|e| GatewayError::Provider(e.to_string()))
    }
}

fn required<'a>(field: &'a Option<String>, name: &str) -> Result<&'a str, GatewayError> {
    match field.as_deref() {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(GatewayError::Validation(format!(
            "{} is required",
            name
        ))),
    }
}
