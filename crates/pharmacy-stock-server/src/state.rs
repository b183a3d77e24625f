//! Request-shared application state.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{Duration, Local, NaiveDate};
use pharmacy_stock_llm::AssistantGateway;
use pharmacy_stock_core::Database;

use crate::error::ApiError;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Database>>,
    gateway: Arc<dyn AssistantGateway>,
    session_ttl: Duration,
}

impl AppState {
    pub fn new(db: Database, gateway: Arc<dyn AssistantGateway>, session_ttl: Duration) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            gateway,
            session_ttl,
        }
    }

    /// Lock the database. Guards must not be held across gateway calls.
    pub fn db(&self) -> Result<MutexGuard<'_, Database>, ApiError> {
        self.db
            .lock()
            .map_err(|_| ApiError::Internal("database lock poisoned".into()))
    }

    /// Owned gateway handle for work moved onto the blocking pool.
    pub fn gateway(&self) -> Arc<dyn AssistantGateway> {
        Arc::clone(&self.gateway)
    }

    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }
}

/// The local calendar date used for expiry comparisons.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
