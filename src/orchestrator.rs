//! Sequential multi-image generation against a one-image-per-call provider.
//!
//! Each slot gets one initial attempt plus up to `max_retries` retries. A
//! content-policy rejection rewrites the working prompt before the retry, and
//! the rewritten prompt stays in effect for every later slot. A slot that runs
//! out of retries is dropped; only a run with zero images fails.

use crate::{
    config::GenerationConfig,
    error::{InkError, Result},
    models::GeneratedImage,
    prompt::PromptRewriter,
    provider::{ImageProvider, ProviderFailure},
};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

/// Suspends the current orchestration only.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: usize,
    pub policy_delay: Duration,
    pub transient_delay: Duration,
    pub inter_call_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::from(&GenerationConfig::default())
    }
}

impl From<&GenerationConfig> for RetryPolicy {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            policy_delay: config.policy_retry_delay,
            transient_delay: config.transient_retry_delay,
            inter_call_delay: config.inter_call_delay,
        }
    }
}

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct Orchestration {
    pub images: Vec<GeneratedImage>,
    /// Working prompt at the end of the run, rewrites included.
    pub prompt: String,
    pub attempts: usize,
}

#[derive(Clone)]
pub struct Orchestrator {
    provider: Arc<dyn ImageProvider>,
    sleeper: Arc<dyn Sleeper>,
    rewriter: PromptRewriter,
    policy: RetryPolicy,
    image_count: usize,
    image_size: String,
    image_quality: String,
}

struct RunState {
    working_prompt: String,
    attempts: usize,
    last_error: Option<String>,
}

impl Orchestrator {
    pub fn new(provider: Arc<dyn ImageProvider>, image_count: usize) -> Self {
        Self {
            provider,
            sleeper: Arc::new(TokioSleeper),
            rewriter: PromptRewriter::default(),
            policy: RetryPolicy::default(),
            image_count,
            image_size: "1024x1024".to_string(),
            image_quality: "standard".to_string(),
        }
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn with_rewriter(mut self, rewriter: PromptRewriter) -> Self {
        self.rewriter = rewriter;
        self
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_image_format(
        mut self,
        size: impl Into<String>,
        quality: impl Into<String>,
    ) -> Self {
        self.image_size = size.into();
        self.image_quality = quality.into();
        self
    }

    pub fn image_count(&self) -> usize {
        self.image_count
    }

    /// Runs every slot in order. Fails with `GenerationFailed` when no slot
    /// produced an image, or with `Provider` as soon as a non-retryable
    /// provider error shows up.
    pub async fn run(&self, prompt: String) -> Result<Orchestration> {
        let generated_at = Utc::now();
        let mut state = RunState {
            working_prompt: prompt,
            attempts: 0,
            last_error: None,
        };
        let mut images = Vec::with_capacity(self.image_count);

        for slot in 0..self.image_count {
            if slot > 0 {
                self.sleeper.sleep(self.policy.inter_call_delay).await;
            }

            match self.fill_slot(slot, &mut state).await? {
                Some(url) => {
                    log::debug!("Slot {}/{} produced an image", slot + 1, self.image_count);
                    images.push(GeneratedImage::new(
                        generated_at,
                        slot,
                        images.len() + 1,
                        url,
                        &self.image_size,
                        &self.image_quality,
                    ));
                }
                None => log::warn!(
                    "Slot {}/{} dropped after {} retries",
                    slot + 1,
                    self.image_count,
                    self.policy.max_retries
                ),
            }
        }

        log::info!(
            "Generated {}/{} images in {} provider calls",
            images.len(),
            self.image_count,
            state.attempts
        );

        if images.is_empty() {
            return Err(InkError::GenerationFailed {
                attempts: state.attempts,
                last_error: state.last_error,
            });
        }

        Ok(Orchestration {
            images,
            prompt: state.working_prompt,
            attempts: state.attempts,
        })
    }

    async fn fill_slot(&self, slot: usize, state: &mut RunState) -> Result<Option<String>> {
        for attempt in 0..=self.policy.max_retries {
            state.attempts += 1;
            log::debug!(
                "Slot {} attempt {} via {}",
                slot + 1,
                attempt + 1,
                self.provider.name()
            );

            let failure = match self
                .provider
                .generate(&state.working_prompt, &self.image_size, &self.image_quality)
                .await
            {
                Ok(url) if !url.trim().is_empty() => return Ok(Some(url)),
                Ok(_) => ProviderFailure::Transient("provider returned an empty image URL".into()),
                Err(failure) => failure,
            };

            if !failure.is_retryable() {
                log::error!("Slot {} aborted: {}", slot + 1, failure);
                return Err(failure.into());
            }

            log::warn!("Slot {} attempt {} failed: {}", slot + 1, attempt + 1, failure);
            state.last_error = Some(failure.to_string());

            if attempt == self.policy.max_retries {
                break;
            }

            match failure {
                ProviderFailure::ContentPolicy(_) => {
                    state.working_prompt = self.rewriter.rewrite(&state.working_prompt);
                    self.sleeper.sleep(self.policy.policy_delay).await;
                }
                _ => self.sleeper.sleep(self.policy.transient_delay).await,
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    pub const STUB_URL: &str = "https://images.example.com/generated.png";

    /// Replays scripted outcomes, then keeps answering with `fallback`.
    pub struct ScriptedProvider {
        script: Mutex<VecDeque<std::result::Result<String, ProviderFailure>>>,
        fallback: std::result::Result<String, ProviderFailure>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedProvider {
        pub fn always_ok() -> Self {
            Self::new(Vec::new(), Ok(STUB_URL.to_string()))
        }

        pub fn always_failing(failure: ProviderFailure) -> Self {
            Self::new(Vec::new(), Err(failure))
        }

        pub fn new(
            script: Vec<std::result::Result<String, ProviderFailure>>,
            fallback: std::result::Result<String, ProviderFailure>,
        ) -> Self {
            Self {
                script: Mutex::new(script.into()),
                fallback,
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }

        pub fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ImageProvider for ScriptedProvider {
        async fn generate(
            &self,
            prompt: &str,
            _size: &str,
            _quality: &str,
        ) -> std::result::Result<String, ProviderFailure> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            let next = self.script.lock().unwrap().pop_front();
            next.unwrap_or_else(|| self.fallback.clone())
        }
    }

    #[derive(Default)]
    pub struct RecordingSleeper {
        pub naps: Mutex<Vec<Duration>>,
    }

    impl RecordingSleeper {
        pub fn naps(&self) -> Vec<Duration> {
            self.naps.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.naps.lock().unwrap().push(duration);
        }
    }
}
