//! Domain models for pharmacy stock management.

mod medicine;
mod user;

pub use medicine::*;
pub use user::*;
