use std::sync::Arc;

use anyhow::anyhow;
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{Json, extract::State, response::IntoResponse};
use jsonwebtoken::{EncodingKey, Header, encode};
use tracing::info;

use runbox_db::Database;
use runbox_db::models::UserProfile;
use runbox_gateway::ExecutionGateway;
use runbox_types::api::{Claims, LoginRequest, LoginResponse, MessageResponse, RegisterRequest};

use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
    pub gateway: ExecutionGateway,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // The signup form sends `fullname`; API callers send `username`.
    // Fullname wins when both are present.
    let username = nonempty(&req.fullname).or_else(|| nonempty(&req.username));
    let (Some(username), Some(email), Some(password)) =
        (username, nonempty(&req.email), nonempty(&req.password))
    else {
        return Err(ApiError::Validation(
            "Username, email, and password are required".into(),
        ));
    };

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ApiError::store("Registration failed", anyhow!(e)))?
        .to_string();

    let profile = UserProfile {
        age: req.age,
        gender: req.gender.clone(),
        job_role: req.job_role.clone(),
        institution: req.institution.clone(),
        phone: req.phone.clone(),
    };

    // Run blocking DB work off the async runtime.
    let db = state.clone();
    let username = username.to_string();
    let email = email.to_string();
    let user_id = tokio::task::spawn_blocking(move || {
        // Explicit conflict check; the UNIQUE constraint on email is the
        // backstop for races, surfacing as a store error.
        let existing = db
            .db
            .get_user_by_email(&email)
            .map_err(|e| ApiError::store("Registration failed", e))?;
        if existing.is_some() {
            return Err(ApiError::Conflict);
        }

        db.db
            .create_user(&username, &email, &password_hash, &profile)
            .map_err(|e| ApiError::store("Registration failed", e))
    })
    .await
    .map_err(|e| ApiError::store("Registration failed", anyhow!(e)))??;

    info!(user_id, "registered new user");

    Ok(Json(MessageResponse {
        message: "User registered successfully".into(),
    }))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let email = req.email.clone();
    let user = tokio::task::spawn_blocking(move || {
        db.db
            .get_user_by_email(&email)
            .map_err(|e| ApiError::store("Login failed", e))
    })
    .await
    .map_err(|e| ApiError::store("Login failed", anyhow!(e)))??
    // Absent user and wrong password take the same exit.
    .ok_or(ApiError::InvalidCredentials)?;

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|e| ApiError::store("Login failed", anyhow!(e)))?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| ApiError::InvalidCredentials)?;

    let token = create_token(&state.jwt_secret, user.id)
        .map_err(|e| ApiError::store("Login failed", e))?;

    Ok(Json(LoginResponse {
        message: "Login successful".into(),
        token,
    }))
}

/// One-hour bearer token carrying only the user id.
fn create_token(secret: &str, user_id: i64) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user_id,
        exp: (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

fn nonempty(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{DecodingKey, Validation, decode};

    #[test]
    fn token_embeds_the_user_id() {
        let token = create_token("test-secret", 17).unwrap();
        let data = decode::<Claims>(
            &token,
            &DecodingKey::from_secret("test-secret".as_bytes()),
            &Validation::default(),
        )
        .unwrap();

        assert_eq!(data.claims.sub, 17);

        // Expiry sits roughly one hour out.
        let now = chrono::Utc::now().timestamp() as usize;
        assert!(data.claims.exp > now + 3500 && data.claims.exp <= now + 3700);
    }

    #[test]
    fn token_signature_is_checked() {
        let token = create_token("right-secret", 1).unwrap();
        let err = decode::<Claims>(
            &token,
            &DecodingKey::from_secret("wrong-secret".as_bytes()),
            &Validation::default(),
        );
        assert!(err.is_err());
    }

    #[test]
    fn fullname_wins_over_username() {
        let req = RegisterRequest {
            fullname: Some("Ana Q".into()),
            username: Some("ana".into()),
            ..Default::default()
        };
        let picked = nonempty(&req.fullname).or_else(|| nonempty(&req.username));
        assert_eq!(picked, Some("Ana Q"));
    }

    #[test]
    fn blank_required_fields_read_as_missing() {
        assert_eq!(nonempty(&Some("  ".into())), None);
        assert_eq!(nonempty(&None), None);
        assert_eq!(nonempty(&Some(" a@x.com ".into())), Some("a@x.com"));
    }
}
