//! HTTP router.
//!
//! Staff routes sit behind the session middleware; the record export, the
//! assistant query endpoint and login/logout are public.

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::auth::require_session;
use crate::endpoints;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/", get(endpoints::medicines::list))
        .route("/add", post(endpoints::medicines::add))
        .route(
            "/edit/:id",
            get(endpoints::medicines::edit_form).post(endpoints::medicines::edit),
        )
        .route(
            "/delete/:id",
            get(endpoints::medicines::delete_confirm).post(endpoints::medicines::delete),
        )
        .route("/dashboard", get(endpoints::dashboard::show))
        .route("/assistant/ping", get(endpoints::assistant::ping))
        .route("/assistant/models", get(endpoints::assistant::models))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    let public = Router::new()
        .route("/api/medicines", get(endpoints::api::medicines))
        .route(
            "/ai_query",
            post(endpoints::assistant::query).fallback(endpoints::assistant::usage),
        )
        .route("/login", post(endpoints::auth::login))
        .route("/logout", post(endpoints::auth::logout));

    Router::new()
        .merge(protected)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
