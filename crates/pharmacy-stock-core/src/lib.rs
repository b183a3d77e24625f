//! Pharmacy Stock Core Library
//!
//! Medicine inventory with validation, dashboard aggregates and a keyword
//! routed assistant.
//!
//! # Architecture
//!
//! ```text
//!   Staff login ──► Session ──► Actor
//!                                 │
//!          ┌──────────────────────┼─────────────────────┐
//!          ▼                      ▼                     ▼
//!     Inventory CRUD          Dashboard            Assistant
//!   (MedicineForm.clean)   (summarize records)   classify(query)
//!          │                      │                     │
//!          └──────────► SQLite ◄──┘        ┌────────────┴────────────┐
//!                                          ▼                         ▼
//!                                   Database query             AI gateway
//!                                   (qty/low/expiry)      (medical/general)
//! ```
//!
//! # Modules
//!
//! - [`db`]: SQLite database layer (medicines, users, sessions)
//! - [`models`]: Domain types (Medicine, MedicineForm, Actor, Session)
//! - [`validation`]: Field rules and per-field error collection
//! - [`inventory`]: CRUD service with two-step delete
//! - [`dashboard`]: Aggregates over the record set
//! - [`assistant`]: Intent routing and reply formatting

pub mod assistant;
pub mod dashboard;
pub mod db;
pub mod inventory;
pub mod models;
pub mod validation;

pub use assistant::{Assistant, AssistantError, AssistantPayload, AssistantResult, Intent, Prepared};
pub use dashboard::{CategorySeries, CategorySummary, Dashboard};
pub use db::{Database, DbError, DbResult, MedicineFilter};
pub use inventory::{DeleteConfirmation, Inventory, InventoryError, InventoryResult};
pub use models::{Actor, Medicine, MedicineForm, MedicineView, NewMedicine, Session};
pub use validation::{FieldErrors, ValidationError};

/// Re-exported so callers can construct gateways without a direct dependency.
pub use pharmacy_stock_llm as llm;
