//! Pharmacy Stock HTTP server.
//!
//! axum router over [`pharmacy_stock_core`] with cookie/bearer sessions,
//! JSON error mapping and `config`-crate settings.

pub mod auth;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod router;
pub mod state;

use std::sync::Arc;

use pharmacy_stock_llm::{AssistantGateway, GeminiGateway, GatewayResult, UnconfiguredGateway};

pub use crate::config::{GatewayConfig, ServerConfig};
pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;

/// Build the gateway described by `config`, or one that always reports
/// "not configured" when no API key is set.
pub fn build_gateway(config: &GatewayConfig) -> GatewayResult<Arc<dyn AssistantGateway>> {
    match config.settings() {
        Some(settings) => {
            let gateway = GeminiGateway::new(settings)?;
            tracing::info!(model = gateway.model(), "AI gateway configured");
            Ok(Arc::new(gateway))
        }
        None => {
            tracing::warn!("No AI gateway API key configured; assistant AI answers are disabled");
            Ok(Arc::new(UnconfiguredGateway))
        }
    }
}
