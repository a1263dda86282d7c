use thiserror::Error;

#[derive(Debug, Error)]
pub enum InkError {
    #[error("Missing required fields: {}", .missing.join(", "))]
    Validation { missing: Vec<String> },

    #[error("Image generation failed after {attempts} attempts")]
    GenerationFailed {
        attempts: usize,
        last_error: Option<String>,
    },

    #[error("Provider error: {message}")]
    Provider {
        message: String,
        details: Option<String>,
    },

    #[error("Configuration error: {}", .0.join("; "))]
    Configuration(Vec<String>),

    #[error("Rate limit exceeded: at most {limit} requests per hour")]
    RateLimited { limit: u32 },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl InkError {
    /// Auxiliary context shown next to the message, when there is any.
    pub fn details(&self) -> Option<String> {
        match self {
            InkError::GenerationFailed { last_error, .. } => last_error.clone(),
            InkError::Provider { details, .. } => details.clone(),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for InkError {
    fn from(err: serde_json::Error) -> Self {
        InkError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for InkError {
    fn from(err: std::io::Error) -> Self {
        InkError::Storage(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, InkError>;
