use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::auth::password::{credentials_match, hash_password, MIN_PASSWORD_LEN};
use crate::errors::AppError;
use crate::models::user::{PublicUser, UserRow};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub full_name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub user: PublicUser,
}

fn normalize_email(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

/// One `@`, something before it, and a dotted domain after it.
fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
                && domain.contains('.')
                && domain.split('.').all(|label| !label.is_empty())
        }
        None => false,
    }
}

fn token_response(state: &AppState, user: &UserRow) -> Result<TokenResponse, AppError> {
    Ok(TokenResponse {
        access_token: state.tokens.issue(user.id)?,
        token_type: "bearer",
        user: PublicUser::from(user),
    })
}

/// POST /api/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let email = normalize_email(&req.email);
    if !is_plausible_email(&email) {
        return Err(AppError::Validation("Invalid email address".into()));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let password = req.password;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("hashing task failed: {e}")))??;

    let user = UserRow {
        id: Uuid::new_v4(),
        email,
        password_hash,
        full_name: req.full_name.trim().to_string(),
        created_at: Utc::now(),
    };
    state.users.insert(&user).await?;
    info!(user_id = %user.id, "Registered user");

    Ok(Json(token_response(&state, &user)?))
}

/// POST /api/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let invalid = || AppError::Unauthorized("Invalid email or password".into());

    let user = state
        .users
        .find_by_email(&normalize_email(&req.email))
        .await?;

    let password = req.password;
    let stored = user.as_ref().map(|u| u.password_hash.clone());
    let matches =
        tokio::task::spawn_blocking(move || credentials_match(&password, stored.as_deref()))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("verification task failed: {e}")))?;
    let user = match user {
        Some(user) if matches => user,
        _ => return Err(invalid()),
    };

    info!(user_id = %user.id, "User logged in");
    Ok(Json(token_response(&state, &user)?))
}

/// GET /api/auth/me
pub async fn handle_me(AuthUser(user): AuthUser) -> Json<PublicUser> {
    Json(PublicUser::from(&user))
}
