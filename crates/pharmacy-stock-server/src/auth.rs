//! Session authentication middleware.
//!
//! Reads the `session` cookie or `Authorization: Bearer <token>`, resolves it
//! to an [`Actor`] and injects it into request extensions for downstream
//! handlers.

use axum::extract::{Request, State};
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use pharmacy_stock_core::Actor;

use crate::error::ApiError;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "session";

/// Session token from the cookie, falling back to a bearer header.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    cookie_token(headers).or_else(|| bearer_token(headers))
}

fn cookie_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Reject requests without a live session.
pub async fn require_session(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_session_inner(state, req, next).await {
        Ok(resp) => resp,
        Err(err) => err.into_response(),
    }
}

async fn require_session_inner(
    state: AppState,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = session_token(req.headers()).ok_or(ApiError::Unauthorized)?;

    let actor: Actor = {
        let db = state.db()?;
        db.authenticate(&token)?.ok_or(ApiError::Unauthorized)?
    }; // lock released before the handler runs

    req.extensions_mut().insert(actor);
    Ok(next.run(req).await)
}
