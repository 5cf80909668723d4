/// Database row types, mapped straight off SQLite rows.
/// Distinct from runbox-types API models to keep the DB layer independent.

pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: String,
}

/// Optional profile attributes captured at registration.
#[derive(Default)]
pub struct UserProfile {
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub job_role: Option<String>,
    pub institution: Option<String>,
    pub phone: Option<String>,
}

pub struct SnippetRow {
    pub id: i64,
    pub user_id: i64,
    pub filename: String,
    pub language: String,
    pub code: String,
    pub created_at: String,
}

/// Listing projection without the source text.
pub struct SnippetMetaRow {
    pub id: i64,
    pub filename: String,
    pub language: String,
    pub created_at: String,
}
