//! `POST /login` and `POST /logout`.

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::HeaderMap;
use axum::response::{AppendHeaders, IntoResponse};
use axum::{Form, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::{session_token, SESSION_COOKIE};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub username: String,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub logged_out: bool,
}

pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<impl IntoResponse, ApiError> {
    let ttl = state.session_ttl();
    let found = state.db()?.login(form.username.trim(), &form.password, ttl)?;
    let (session, actor) = found.ok_or_else(|| {
        tracing::warn!(username = %form.username, "Failed login");
        ApiError::InvalidCredentials
    })?;

    tracing::info!(user = actor.username(), "Logged in");

    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        session.token,
        ttl.num_seconds().max(0)
    );
    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(LoginResponse {
            username: session.username,
            token: session.token,
            expires_at: session.expires_at,
        }),
    ))
}

pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let logged_out = match session_token(&headers) {
        Some(token) => state.db()?.logout(&token)?,
        None => false,
    };

    let cookie = format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE);
    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(LogoutResponse { logged_out }),
    ))
}
