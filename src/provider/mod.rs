pub mod openai;

use crate::error::InkError;
use async_trait::async_trait;
use std::fmt;

pub use openai::OpenAiImageClient;

/// Why a single image call failed.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderFailure {
    /// The provider refused this prompt. Retried after rewriting it.
    ContentPolicy(String),
    /// Network trouble, rate limiting, server errors. Retried as is.
    Transient(String),
    /// Authentication problems and anything else unexpected. Never retried.
    Fatal {
        message: String,
        details: Option<String>,
    },
}

impl ProviderFailure {
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ProviderFailure::Fatal { .. })
    }
}

impl fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderFailure::ContentPolicy(msg) => write!(f, "Content policy violation: {}", msg),
            ProviderFailure::Transient(msg) => write!(f, "Transient provider error: {}", msg),
            ProviderFailure::Fatal { message, .. } => write!(f, "Provider error: {}", message),
        }
    }
}

impl From<ProviderFailure> for InkError {
    fn from(failure: ProviderFailure) -> Self {
        match failure {
            ProviderFailure::Fatal { message, details } => InkError::Provider { message, details },
            other => InkError::Provider {
                message: other.to_string(),
                details: None,
            },
        }
    }
}

/// A capability that turns one prompt into exactly one image URL per call.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        size: &str,
        quality: &str,
    ) -> std::result::Result<String, ProviderFailure>;

    fn name(&self) -> &str {
        "image-provider"
    }
}
