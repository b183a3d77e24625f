//! Generative-language gateway for the pharmacy inventory assistant.
//!
//! This crate wraps the third-party text service behind the
//! [`AssistantGateway`] trait and builds the prompts that carry the
//! inventory snapshot as context.

pub mod extraction;
pub mod gateway;
pub mod prompts;

pub use extraction::*;
pub use gateway::*;
pub use prompts::*;
