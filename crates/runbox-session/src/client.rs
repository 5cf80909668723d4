//! HTTP client for the playground backend, implementing the session's
//! run/save seams. Mirrors the browser frontend's fetch calls: login
//! stores the bearer token, save and listing send it, run does not need
//! one.

use anyhow::{Result, anyhow};
use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

use runbox_types::api::{
    LoginRequest, LoginResponse, RegisterRequest, RunRequest, SaveSnippetRequest,
    SaveSnippetResponse, SnippetRecord, SnippetSummary,
};

use crate::session::{ExecutionBackend, SnippetBackend};

pub struct ApiClient {
    base: String,
    http: reqwest::Client,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
            token: None,
        }
    }

    pub fn signed_in(&self) -> bool {
        self.token.is_some()
    }

    pub fn sign_out(&mut self) {
        self.token = None;
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn bearer(&self) -> Result<&str> {
        self.token.as_deref().ok_or_else(|| anyhow!("not signed in"))
    }

    /// Register a new account. Returns the server's confirmation message.
    pub async fn register(&self, req: &RegisterRequest) -> Result<String> {
        let resp = self
            .http
            .post(self.url("/api/auth/register"))
            .json(req)
            .send()
            .await?;

        let status = resp.status();
        let body: Value = resp.json().await?;
        if !status.is_success() {
            return Err(api_error(status, &body));
        }

        Ok(body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string())
    }

    /// Sign in and keep the issued bearer token for subsequent calls.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<()> {
        let req = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let resp = self
            .http
            .post(self.url("/api/auth/login"))
            .json(&req)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body: Value = resp.json().await.unwrap_or_default();
            return Err(api_error(status, &body));
        }

        let login: LoginResponse = resp.json().await?;
        debug!("signed in, token expires in 1h");
        self.token = Some(login.token);
        Ok(())
    }

    pub async fn list_snippets(&self) -> Result<Vec<SnippetSummary>> {
        let resp = self
            .http
            .get(self.url("/api/code"))
            .bearer_auth(self.bearer()?)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body: Value = resp.json().await.unwrap_or_default();
            return Err(api_error(status, &body));
        }

        Ok(resp.json().await?)
    }

    pub async fn get_snippet(&self, id: i64) -> Result<SnippetRecord> {
        let resp = self
            .http
            .get(self.url(&format!("/api/code/{}", id)))
            .bearer_auth(self.bearer()?)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body: Value = resp.json().await.unwrap_or_default();
            return Err(api_error(status, &body));
        }

        Ok(resp.json().await?)
    }
}

impl ExecutionBackend for ApiClient {
    async fn execute(&self, req: &RunRequest) -> Result<Value> {
        let resp = self
            .http
            .post(self.url("/api/compiler/run"))
            .json(req)
            .send()
            .await?;

        let status = resp.status();
        let body: Value = resp.json().await?;
        if !status.is_success() {
            return Err(api_error(status, &body));
        }

        Ok(body)
    }
}

impl SnippetBackend for ApiClient {
    fn authenticated(&self) -> bool {
        self.signed_in()
    }

    async fn save(&self, req: &SaveSnippetRequest) -> Result<i64> {
        let resp = self
            .http
            .post(self.url("/api/code/save"))
            .bearer_auth(self.bearer()?)
            .json(req)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body: Value = resp.json().await.unwrap_or_default();
            return Err(api_error(status, &body));
        }

        let saved: SaveSnippetResponse = resp.json().await?;
        Ok(saved.id)
    }
}

fn api_error(status: StatusCode, body: &Value) -> anyhow::Error {
    let msg = body
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or("request failed");
    anyhow!("{} ({})", msg, status)
}
