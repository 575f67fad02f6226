//! UrlSense error types.
//!
//! Per-request failures (`MissingField`, `EmptyInput`, `Inference`) are
//! caught at the handler boundary and converted to structured JSON error
//! bodies. Only `ModelLoad` at startup is fatal to the process.
//!
//! The `Display` strings of `MissingField` and `EmptyInput` are part of the
//! HTTP wire contract and must not change.

use thiserror::Error;

/// UrlSense errors.
#[derive(Error, Debug)]
pub enum UrlSenseError {
    /// Request body is not valid JSON or lacks the required `url` key.
    #[error("Missing \"url\" field")]
    MissingField,

    /// The `url` field is blank after trimming surrounding whitespace.
    #[error("Empty URL")]
    EmptyInput,

    /// Failure inside the model's predict/predict-probability routines.
    #[error("Inference error: {0}")]
    Inference(String),

    /// Model artifact missing, unreadable, or undeserializable.
    #[error("Model load error: {0}")]
    ModelLoad(String),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// Server-side error (bind failure, accept loop failure).
    #[error("Server error: {0}")]
    Server(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for UrlSense operations
pub type Result<T> = std::result::Result<T, UrlSenseError>;
