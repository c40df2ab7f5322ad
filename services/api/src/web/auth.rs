//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for registration, login, and the current profile.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use chrono::{DateTime, Utc};
use mindmatters_core::{domain::User, ports::PortError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, LazyLock};
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::{
    error::{ApiError, ErrorBody},
    security::{hash_password, verify_dummy, verify_password},
    web::{
        extract::AppJson,
        state::{AppState, AuthUser},
    },
};

const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+$").expect("email pattern is valid"));

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// The public part of a user, as cached by clients.
#[derive(Serialize, ToSchema)]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

//=========================================================================================
// Validation
//=========================================================================================

/// Emails are the login key; they are compared in this form everywhere.
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str, ApiError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::Validation(format!("{} is required", field)))
}

fn validate_registration(req: &RegisterRequest) -> Result<(String, String, String), ApiError> {
    let name = required(&req.name, "name")?;
    let email = normalize_email(required(&req.email, "email")?);
    if !EMAIL_RE.is_match(&email) {
        return Err(ApiError::Validation("email is not a valid address".to_string()));
    }
    // Passwords are taken verbatim; only their length is checked.
    let password = req.password.as_deref().unwrap_or_default();
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::Validation(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok((name.to_string(), email, password.to_string()))
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /api/auth/register - Create a new user account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created successfully", body = AuthResponse),
        (status = 400, description = "Invalid request or email already registered", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // 1. Validate the submitted fields
    let (name, email, password) = validate_registration(&req)?;

    // 2. Hash the password
    let password_hash =
        hash_password(&password).map_err(|e| ApiError::Internal(e.to_string()))?;

    // 3. Create user in database
    let user = state.db.create_user(&name, &email, &password_hash).await?;

    // 4. Issue a token for the new identity
    let token = state
        .tokens
        .issue(user.id)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    info!("Registered user {}", user.id);
    let response = AuthResponse {
        token,
        user: UserProfile::from(&user),
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/auth/login - Login with existing account
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Missing email or password", body = ErrorBody),
        (status = 401, description = "Invalid credentials", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let email = normalize_email(required(&req.email, "email")?);
    let password = req
        .password
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::Validation("password is required".to_string()))?;

    // 1. Get user by email. An unknown email still pays for one hash check.
    let creds = match state.db.get_user_by_email(&email).await {
        Ok(creds) => creds,
        Err(PortError::NotFound(_)) => {
            verify_dummy(password);
            return Err(ApiError::InvalidCredentials);
        }
        Err(other) => return Err(other.into()),
    };

    // 2. Verify password
    if !verify_password(password, &creds.password_hash) {
        warn!("Failed login for user {}", creds.id);
        return Err(ApiError::InvalidCredentials);
    }

    // 3. Issue a fresh token
    let token = state
        .tokens
        .issue(creds.id)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(AuthResponse {
        token,
        user: UserProfile {
            id: creds.id,
            name: creds.name,
            email: creds.email,
        },
    }))
}

/// GET /api/auth/me - The profile of the authenticated caller
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "auth",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Current user", body = MeResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorBody)
    )
)]
pub async fn me_handler(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<MeResponse>, ApiError> {
    let user = state
        .db
        .get_user_by_id(auth.id)
        .await
        .map_err(ApiError::not_found_as("User not found"))?;
    Ok(Json(MeResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        created_at: user.created_at,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(name: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
    }

    #[test]
    fn registration_normalizes_email() {
        let (name, email, _) =
            validate_registration(&register(" Ann ", " Ann@X.com ", "secret1")).unwrap();
        assert_eq!(name, "Ann");
        assert_eq!(email, "ann@x.com");
    }

    #[test]
    fn registration_rejects_bad_fields() {
        assert!(validate_registration(&register("", "ann@x.com", "secret1")).is_err());
        assert!(validate_registration(&register("Ann", "not-an-email", "secret1")).is_err());
        assert!(validate_registration(&register("Ann", "ann@x.com", "short")).is_err());
        let missing = RegisterRequest {
            name: Some("Ann".into()),
            email: None,
            password: Some("secret1".into()),
        };
        assert!(matches!(
            validate_registration(&missing),
            Err(ApiError::Validation(_))
        ));
    }
}
