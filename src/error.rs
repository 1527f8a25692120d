//! Error types for the OnChainBrain agent

use thiserror::Error;

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

#[derive(Error, Debug)]
pub enum AgentError {

    // =============================
    // Pipeline Errors
    // =============================

    /// The question lacks a field its intent requires. The message is user-facing.
    #[error("{0}")]
    InvalidParameters(String),

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Network failure: {0}")]
    NetworkFailure(String),

    #[error("Decode error: {0}")]
    DecodeError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Malformed command line; the only error that ends the process non-zero
    #[error("{0}")]
    Usage(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),
}
