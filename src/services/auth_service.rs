use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use password_hash::rand_core::OsRng;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::auth::{Claims, LoginRequest, LoginResponse, RefreshRequest, RegisterRequest, TokenPair},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{User, UserSummary},
    state::AppState,
};

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    let parsed = PasswordHash::new(password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

pub fn issue_token(
    secret: &str,
    user_id: Uuid,
    is_admin: bool,
    token_use: &str,
    lifetime: Duration,
) -> AppResult<String> {
    let expiration = Utc::now()
        .checked_add_signed(lifetime)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set token expiration")))?;

    let claims = Claims {
        sub: user_id.to_string(),
        is_admin,
        token_use: token_use.to_string(),
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

pub fn issue_pair(state: &AppState, user_id: Uuid, is_admin: bool) -> AppResult<TokenPair> {
    let access = issue_token(
        &state.config.jwt_secret,
        user_id,
        is_admin,
        "access",
        Duration::minutes(state.config.access_token_minutes),
    )?;
    let refresh = issue_token(
        &state.config.jwt_secret,
        user_id,
        is_admin,
        "refresh",
        Duration::days(state.config.refresh_token_days),
    )?;
    Ok(TokenPair { access, refresh })
}

pub fn decode_token(secret: &str, token: &str) -> AppResult<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized("Given token not valid for any token type".into()))
}

pub async fn register_user(state: &AppState, payload: RegisterRequest) -> AppResult<UserSummary> {
    let RegisterRequest {
        username,
        email,
        password,
    } = payload;

    if username.is_empty() || email.is_empty() || password.is_empty() {
        return Err(AppError::BadRequest(
            "Username, email and password are required".into(),
        ));
    }

    let exists: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM users WHERE username = $1 OR email = $2")
            .bind(&username)
            .bind(&email)
            .fetch_optional(&state.pool)
            .await?;
    if exists.is_some() {
        return Err(AppError::BadRequest("User already exists".into()));
    }

    let password_hash = hash_password(&password)?;
    let user: User = sqlx::query_as(
        "INSERT INTO users (id, username, email, password_hash) VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(&username)
    .bind(&email)
    .bind(password_hash)
    .fetch_one(&state.pool)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.id),
        "user_register",
        Some("users"),
        Some(serde_json::json!({ "user_id": user.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(user.into())
}

/// The login handle matches either the username or the email column; the
/// storefront uses them interchangeably.
pub async fn login_user(state: &AppState, payload: LoginRequest) -> AppResult<LoginResponse> {
    let LoginRequest { username, password } = payload;

    if username.is_empty() || password.is_empty() {
        return Err(AppError::BadRequest(
            "Username and password are required".into(),
        ));
    }

    let user: Option<User> =
        sqlx::query_as("SELECT * FROM users WHERE username = $1 OR email = $1")
            .bind(&username)
            .fetch_optional(&state.pool)
            .await?;

    let user = user.ok_or_else(|| {
        AppError::Unauthorized("No active account found with the given credentials".into())
    })?;
    if !verify_password(&password, &user.password_hash)? {
        return Err(AppError::Unauthorized(
            "No active account found with the given credentials".into(),
        ));
    }

    let pair = issue_pair(state, user.id, user.is_admin)?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.id),
        "user_login",
        Some("users"),
        Some(serde_json::json!({ "user_id": user.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(LoginResponse {
        access: pair.access,
        refresh: pair.refresh,
        username: user.username,
        is_admin: user.is_admin,
    })
}

pub async fn refresh_tokens(state: &AppState, payload: RefreshRequest) -> AppResult<TokenPair> {
    let claims = decode_token(&state.config.jwt_secret, &payload.refresh)?;
    if claims.token_use != "refresh" {
        return Err(AppError::Unauthorized(
            "Given token not valid for any token type".into(),
        ));
    }
    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Unauthorized("Invalid user id in token".into()))?;
    issue_pair(state, user_id, claims.is_admin)
}

pub async fn get_profile(state: &AppState, user: &AuthUser) -> AppResult<UserSummary> {
    let record: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(user.user_id)
        .fetch_optional(&state.pool)
        .await?;
    match record {
        Some(u) => Ok(u.into()),
        None => Err(AppError::Unauthorized("User not found".into())),
    }
}
