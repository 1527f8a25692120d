//! OnChainBrain Agent
//!
//! A command-line agent that answers questions about Solana tokens:
//! - Classifies free-text questions into a fixed set of intents
//! - Builds the matching Bitquery GraphQL query
//! - Decodes and formats the rows for the console
//! - Gates every question on the agent being registered
//!
//! PIPELINE:
//! QUESTION → CLASSIFY → BUILD → FETCH → DECODE → FORMAT → OUTPUT

pub mod agent;
pub mod analytics;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod format;
pub mod models;
pub mod query;
pub mod registry;

#[cfg(test)]
mod test_support;

pub use error::Result;

// Re-export common types
pub use models::*;
pub use classifier::{Classification, IntentClassifier};
