//! Error types for the query router

use thiserror::Error;

/// Result type alias for router operations
pub type Result<T> = std::result::Result<T, OrchestrationError>;

#[derive(Error, Debug)]
pub enum OrchestrationError {

    // =============================
    // Routing Errors
    // =============================

    #[error("Substrate unavailable: {0}")]
    SubstrateUnavailable(String),

    #[error("Classification error: {0}")]
    ClassificationError(String),

    #[error("Handler error ({agent}): {message}")]
    HandlerError { agent: String, message: String },

    #[error("Retrieval error: {0}")]
    RetrievalError(String),

    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("Generation timed out after {0:?}")]
    GenerationTimeout(std::time::Duration),

    // =============================
    // Setup Errors
    // =============================

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Corpus error: {0}")]
    CorpusError(String),

    #[error("Index error: {0}")]
    IndexError(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
