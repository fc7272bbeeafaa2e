//! Account endpoints: register, login, logout.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, UserContext};
use crate::auth;

#[derive(Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub token: String,
    pub email: String,
}

/// `POST /api/auth/register`
pub async fn register(
    State(ctx): State<ApiContext>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let email = ctx
        .blocking(move |conn, _| {
            Ok(auth::register(conn, &req.email, &req.password, &req.confirm_password)?)
        })
        .await?;
    let token = ctx.issue_session(&email)?;
    Ok((StatusCode::CREATED, Json(SessionResponse { token, email })))
}

/// `POST /api/auth/login`
pub async fn login(
    State(ctx): State<ApiContext>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let demo_enabled = ctx.config.demo_accounts;
    let email = ctx
        .blocking(move |conn, _| {
            Ok(auth::authenticate(conn, &req.email, &req.password, demo_enabled)?)
        })
        .await?;
    let token = ctx.issue_session(&email)?;
    tracing::info!(email = %email, "Session started");
    Ok(Json(SessionResponse { token, email }))
}

/// `POST /api/auth/logout`
pub async fn logout(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
) -> Result<StatusCode, ApiError> {
    ctx.sessions
        .lock()
        .map_err(|_| ApiError::Internal("session lock".into()))?
        .revoke(&user.token);
    tracing::info!(email = %user.owner_key, "Session ended");
    Ok(StatusCode::NO_CONTENT)
}
