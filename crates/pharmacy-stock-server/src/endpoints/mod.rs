//! Request handlers, one module per screen or API area.

pub mod api;
pub mod assistant;
pub mod auth;
pub mod dashboard;
pub mod medicines;
