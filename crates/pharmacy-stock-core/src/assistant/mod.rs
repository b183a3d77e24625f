//! Inventory assistant.
//!
//! Pipeline: Classify → (Database query → Reply) | (Snapshot → Gateway → Normalize)

mod intent;
mod replies;

pub use intent::*;
pub use replies::*;

use chrono::NaiveDate;
use pharmacy_stock_llm::{
    build_general_prompt, build_medical_prompt, ensure_disclaimer, format_inventory_snapshot,
    normalize_reply, AssistantGateway, GatewayError, InventoryLine, PING_PROMPT,
};
use serde::Serialize;
use thiserror::Error;

use crate::db::{Database, DbError};
use crate::models::{expiry_cutoff, Medicine};

/// Assistant errors.
#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("Please enter a question.")]
    EmptyQuery,

    #[error("AI gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

pub type AssistantResult<T> = Result<T, AssistantError>;

/// Body returned by the assistant endpoint.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum AssistantPayload {
    Reply { reply: String },
    Error { error: String },
}

impl From<AssistantResult<String>> for AssistantPayload {
    fn from(result: AssistantResult<String>) -> Self {
        match result {
            Ok(reply) => Self::Reply { reply },
            Err(e) => Self::Error {
                error: e.to_string(),
            },
        }
    }
}

fn inventory_line(m: &Medicine) -> InventoryLine {
    InventoryLine {
        name: m.name.clone(),
        category: m.category.clone(),
        quantity: m.quantity,
        price: m.price.to_string(),
        expiry_date: m.expiry_date.format("%Y-%m-%d").to_string(),
        reorder_level: m.reorder_level,
    }
}

/// What remains of an answer once the database work is done.
///
/// Produced while the database is held; finishing a [`Prepared::Gateway`]
/// needs only the gateway, so callers can release the database first.
#[derive(Debug, Clone, PartialEq)]
pub enum Prepared {
    /// Reply built entirely from stored records.
    Answered(String),
    /// Prompt still to be sent to the gateway.
    Gateway { prompt: String, medical: bool },
}

impl Prepared {
    pub fn needs_gateway(&self) -> bool {
        matches!(self, Self::Gateway { .. })
    }

    /// Run the gateway half, if any, and normalize its reply.
    pub fn complete(self, gateway: &dyn AssistantGateway) -> AssistantResult<String> {
        match self {
            Self::Answered(reply) => Ok(reply),
            Self::Gateway { prompt, medical } => {
                let reply = normalize_reply(&gateway.generate(&prompt)?);
                if reply.is_empty() {
                    return Err(GatewayError::EmptyResponse.into());
                }
                Ok(if medical {
                    ensure_disclaimer(&reply)
                } else {
                    reply
                })
            }
        }
    }
}

/// Answers free-text inventory questions.
pub struct Assistant<'a> {
    db: &'a Database,
    gateway: &'a dyn AssistantGateway,
}

impl<'a> Assistant<'a> {
    pub fn new(db: &'a Database, gateway: &'a dyn AssistantGateway) -> Self {
        Self { db, gateway }
    }

    /// Route a query and do every database read it needs.
    pub fn prepare(db: &Database, query: &str, today: NaiveDate) -> AssistantResult<Prepared> {
        if query.trim().is_empty() {
            return Err(AssistantError::EmptyQuery);
        }

        let intent = classify(query);
        tracing::debug!(?intent, "Routed assistant query");

        let prepared = match intent {
            Intent::QuantityLookup => {
                let medicines = db.list_medicines()?;
                Prepared::Answered(quantity_reply(find_mentioned(&medicines, query)))
            }
            Intent::LowStock => Prepared::Answered(low_stock_reply(&db.low_stock_medicines()?)),
            Intent::Expiry => {
                let expiring = db.expiring_medicines(expiry_cutoff(today))?;
                Prepared::Answered(expiry_reply(&expiring, today))
            }
            Intent::MedicalAdvice => Prepared::Gateway {
                prompt: build_medical_prompt(query, &snapshot(db)?),
                medical: true,
            },
            Intent::General => Prepared::Gateway {
                prompt: build_general_prompt(query, &snapshot(db)?),
                medical: false,
            },
        };
        Ok(prepared)
    }

    /// Route a query and produce the reply text.
    pub fn answer(&self, query: &str, today: NaiveDate) -> AssistantResult<String> {
        Self::prepare(self.db, query, today)?.complete(self.gateway)
    }

    /// Answer and fold any failure into an error payload.
    pub fn respond(&self, query: &str, today: NaiveDate) -> AssistantPayload {
        into_payload(self.answer(query, today))
    }
}

/// Fold an answer into the endpoint body, logging failures.
pub fn into_payload(result: AssistantResult<String>) -> AssistantPayload {
    if let Err(e) = &result {
        tracing::warn!(error = %e, "Assistant query failed");
    }
    result.into()
}

/// Round-trip a trivial prompt to check the gateway is reachable.
pub fn ping(gateway: &dyn AssistantGateway) -> AssistantResult<String> {
    Ok(normalize_reply(&gateway.generate(PING_PROMPT)?))
}

/// Models the gateway key can use.
pub fn list_models(gateway: &dyn AssistantGateway) -> AssistantResult<Vec<String>> {
    Ok(gateway.list_models()?)
}

fn snapshot(db: &Database) -> AssistantResult<String> {
    let lines: Vec<InventoryLine> = db.list_medicines()?.iter().map(inventory_line).collect();
    Ok(format_inventory_snapshot(&lines))
}
