use serde::{Deserialize, Serialize};

// -- JWT Claims --

/// JWT claims shared between runbox-api (REST middleware) and the
/// runbox-session API client. The token carries only the user id,
/// never a username, email, or role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub exp: usize,
}

// -- Auth --

/// Registration payload. Required fields are modelled as `Option` so the
/// handler can answer a missing field with a 400 validation message
/// instead of a deserialization rejection. `fullname` is an accepted
/// alias for `username` and wins when both are present.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RegisterRequest {
    pub fullname: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<String>,
    #[serde(rename = "jobRole")]
    pub job_role: Option<String>,
    pub institution: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

// -- Snippets --

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SaveSnippetRequest {
    pub filename: Option<String>,
    pub language: Option<String>,
    pub code: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SaveSnippetResponse {
    pub success: bool,
    pub id: i64,
}

/// Listing projection; deliberately omits the source text.
#[derive(Debug, Serialize, Deserialize)]
pub struct SnippetSummary {
    pub id: i64,
    pub filename: String,
    pub language: String,
    pub created_at: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SnippetRecord {
    pub id: i64,
    pub user_id: i64,
    pub filename: String,
    pub language: String,
    pub code: String,
    pub created_at: String,
}

// -- Execution --

/// Run payload as it arrives on the wire. `versionIndex` is a string on
/// the provider side ("3", not 3), so it stays a string here.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct RunRequest {
    pub language: Option<String>,
    #[serde(rename = "versionIndex")]
    pub version_index: Option<String>,
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdin: Option<String>,
}

// -- Liveness --

#[derive(Debug, Serialize, Deserialize)]
pub struct PingResponse {
    pub message: String,
    pub db_time: String,
}
