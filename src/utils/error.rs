use std::time::Duration;
use thiserror::Error;

/// Failures of the model invocation layer. Always recovered locally by the
/// analysis orchestrator; only the builder lets them propagate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("AI call timed out after {0:?}")]
    Timeout(Duration),

    #[error("AI transport failure: {0}")]
    Transport(String),

    #[error("AI service returned empty response")]
    EmptyResponse,
}

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("Model gateway failure: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Model returned no usable structured output")]
    UnusableModelOutput,

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {field}: {reason}")]
    InvalidConfigValueError { field: String, reason: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

pub type Result<T> = std::result::Result<T, AdvisorError>;
