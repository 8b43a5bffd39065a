// src/handlers/auth.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};
use chrono::Utc;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    certificate::CertificateRenderer,
    config::Config,
    error::AppError,
    extractors::AppJson,
    models::user::{AuthResponse, CreateUserRequest, LoginRequest, User, UserSummary},
    utils::{
        hash::{hash_password, verify_password},
        jwt::{auth_cookie, sign_jwt},
    },
};

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Signs a token for the user and wraps it with the mirrored auth cookie.
fn issue_token(
    config: &Config,
    user: UserSummary,
) -> Result<([(header::HeaderName, String); 1], Json<AuthResponse>), AppError> {
    let token = sign_jwt(user.id, &user.email, &config.jwt_secret, config.jwt_expiration)?;
    let cookie = auth_cookie(&token, config.jwt_expiration);

    Ok(([(header::SET_COOKIE, cookie)], Json(AuthResponse { token, user })))
}

/// Registers a new user.
///
/// Hashes the password using Argon2 before storing it.
/// Names the certificate font cannot print are refused.
/// Returns 201 Created with a token and the public user fields.
pub async fn register(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    State(renderer): State<Arc<dyn CertificateRenderer>>,
    AppJson(mut payload): AppJson<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.email = normalize_email(&payload.email);
    payload.name = payload.name.trim().to_string();

    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    if !renderer.supports(&payload.name) {
        return Err(AppError::BadRequest(
            "Name contains characters that cannot be printed on a certificate".to_string(),
        ));
    }

    let hashed_password = hash_password(&payload.password)?;

    let inserted = sqlx::query(
        r#"
        INSERT INTO users (name, email, password, created_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&payload.name)
    .bind(&payload.email)
    .bind(&hashed_password)
    .bind(Utc::now())
    .execute(&pool)
    .await
    .map_err(|e| {
        let duplicate = e
            .as_database_error()
            .is_some_and(|db_err| db_err.is_unique_violation());
        if duplicate {
            AppError::Conflict(format!("Email '{}' is already registered", payload.email))
        } else {
            tracing::error!("Failed to register user: {:?}", e);
            AppError::from(e)
        }
    })?;

    let user = UserSummary {
        id: inserted.last_insert_rowid(),
        name: payload.name,
        email: payload.email,
    };
    tracing::info!(user_id = user.id, "User registered");

    let (headers, body) = issue_token(&config, user)?;
    Ok((StatusCode::CREATED, headers, body))
}

/// Authenticates a user and returns a JWT token.
///
/// Unknown email and wrong password produce the same 401 response.
pub async fn login(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, password, created_at
        FROM users
        WHERE email = ?
        "#,
    )
    .bind(normalize_email(&payload.email))
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Login DB error: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    let invalid = || AppError::AuthError("Invalid credentials".to_string());
    let user = user.ok_or_else(invalid)?;

    if !verify_password(&payload.password, &user.password)? {
        return Err(invalid());
    }

    issue_token(&config, user.into())
}
