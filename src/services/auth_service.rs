use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordVerifier},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};

use crate::{
    dto::auth::{Claims, LoginRequest, LoginResponse},
    error::{AppError, AppResult},
    response::{ApiResponse, Meta},
    state::AppState,
};

const TOKEN_TTL_HOURS: i64 = 12;

pub async fn login_staff(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let LoginRequest { username, password } = payload;
    let invalid = || AppError::BadRequest("Invalid credentials".into());

    let account = state
        .config
        .staff
        .iter()
        .find(|a| a.username == username)
        .ok_or_else(invalid)?;

    let parsed_hash = PasswordHash::new(&account.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash for {username}")))?;

    if Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        tracing::info!(username = %username, "staff login rejected");
        return Err(invalid());
    }

    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(TOKEN_TTL_HOURS))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: account.username.clone(),
        role: account.role.clone(),
        exp: usize::try_from(expiration.timestamp()).unwrap_or(usize::MAX),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.config.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;

    tracing::info!(username = %account.username, role = %account.role, "staff logged in");

    Ok(ApiResponse::success(
        "Logged in",
        LoginResponse {
            token: format!("Bearer {}", token),
            role: account.role.clone(),
        },
        Some(Meta::empty()),
    ))
}
