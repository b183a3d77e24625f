//! Assistant endpoints.
//!
//! The database lock covers only the read phase of a query. Gateway calls
//! block, so they run on the blocking pool after the lock is released.
//! Gateway failures come back as `{"error": ...}` with a 200 status.

use std::sync::Arc;

use axum::extract::State;
use axum::{Extension, Form, Json};
use pharmacy_stock_core::assistant::{self, into_payload};
use pharmacy_stock_core::{Actor, Assistant, AssistantPayload, Prepared};
use pharmacy_stock_llm::AssistantGateway;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::{today, AppState};

pub const USAGE_HINT: &str =
    "Send a POST request with a form field named 'query' containing your question.";

#[derive(Debug, Deserialize)]
pub struct QueryForm {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct UsageHint {
    pub usage: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ModelsPayload {
    Models { models: Vec<String> },
    Error { error: String },
}

async fn with_gateway<T, F>(gateway: Arc<dyn AssistantGateway>, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&dyn AssistantGateway) -> T + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(gateway.as_ref()))
        .await
        .map_err(|e| ApiError::Internal(format!("assistant task failed: {}", e)))
}

/// `/ai_query` with any method other than POST.
pub async fn usage() -> Json<UsageHint> {
    Json(UsageHint { usage: USAGE_HINT })
}

/// `POST /ai_query`
pub async fn query(
    State(state): State<AppState>,
    Form(form): Form<QueryForm>,
) -> Result<Json<AssistantPayload>, ApiError> {
    let prepared = {
        let db = state.db()?;
        Assistant::prepare(&db, &form.query, today())
    };

    let result = match prepared {
        Ok(pending @ Prepared::Gateway { .. }) => {
            with_gateway(state.gateway(), move |gateway| pending.complete(gateway)).await?
        }
        Ok(Prepared::Answered(reply)) => Ok(reply),
        Err(e) => Err(e),
    };
    Ok(Json(into_payload(result)))
}

/// `GET /assistant/ping`
pub async fn ping(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<AssistantPayload>, ApiError> {
    tracing::info!(user = actor.username(), "Gateway ping");
    let result = with_gateway(state.gateway(), assistant::ping).await?;
    if let Err(e) = &result {
        tracing::error!(error = %e, "Gateway ping failed");
    }
    Ok(Json(result.into()))
}

/// `GET /assistant/models`
pub async fn models(
    State(state): State<AppState>,
    Extension(_actor): Extension<Actor>,
) -> Result<Json<ModelsPayload>, ApiError> {
    let payload = match with_gateway(state.gateway(), assistant::list_models).await? {
        Ok(models) => ModelsPayload::Models { models },
        Err(e) => {
            tracing::error!(error = %e, "Listing gateway models failed");
            ModelsPayload::Error {
                error: e.to_string(),
            }
        }
    };
    Ok(Json(payload))
}
