//! Tattoo concept generation: prompt construction, retrying multi-image
//! orchestration against an image provider, and the HTTP service around it.

pub mod catalog;
pub mod config;
pub mod error;
pub mod handler;
pub mod history;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod prompt;
pub mod provider;
pub mod rate_limit;
#[cfg(feature = "server")]
pub mod server;

pub use config::{GenerationConfig, HistoryConfig, ProviderConfig, ServerConfig, Settings};
pub use error::{InkError, Result};
pub use handler::GenerationService;
pub use history::{HistoryManager, HistoryStore, InMemoryHistoryStore, JsonFileHistoryStore};
pub use models::*;
pub use orchestrator::{Orchestration, Orchestrator, RetryPolicy, Sleeper, TokioSleeper};
pub use prompt::{build_prompt, optimize_for_provider, PromptRewriter, RewriteRule};
pub use provider::{ImageProvider, OpenAiImageClient, ProviderFailure};
pub use rate_limit::RateLimiter;
