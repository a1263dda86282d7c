use crate::{
    config::Settings,
    error::Result,
    logger,
    models::{GenerationResult, RawDesignRequest},
    orchestrator::{Orchestrator, RetryPolicy, Sleeper},
    prompt::{build_prompt, optimize_for_provider, PromptRewriter},
    provider::{ImageProvider, OpenAiImageClient},
    rate_limit::RateLimiter,
};
use std::sync::Arc;

/// Validates design requests and turns them into generation results.
#[derive(Clone)]
pub struct GenerationService {
    orchestrator: Orchestrator,
    rate_limiter: Option<Arc<RateLimiter>>,
    max_prompt_length: usize,
}

impl GenerationService {
    /// Validates the settings and wires the OpenAI-compatible client.
    pub fn new(settings: &Settings) -> Result<Self> {
        settings.validate()?;
        let client = OpenAiImageClient::new(&settings.provider)?;
        Self::with_provider(settings, Arc::new(client))
    }

    pub fn with_provider(settings: &Settings, provider: Arc<dyn ImageProvider>) -> Result<Self> {
        settings.validate()?;

        let generation = &settings.generation;
        let orchestrator = Orchestrator::new(provider, generation.max_images_per_request)
            .with_policy(RetryPolicy::from(generation))
            .with_image_format(&settings.provider.image_size, &settings.provider.image_quality);

        let rate_limiter = generation
            .enable_rate_limiting
            .then(|| Arc::new(RateLimiter::per_hour(generation.max_requests_per_hour)));

        Ok(Self {
            orchestrator,
            rate_limiter,
            max_prompt_length: generation.max_prompt_length,
        })
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.orchestrator = self.orchestrator.with_sleeper(sleeper);
        self
    }

    pub fn with_rewriter(mut self, rewriter: PromptRewriter) -> Self {
        self.orchestrator = self.orchestrator.with_rewriter(rewriter);
        self
    }

    pub fn images_per_request(&self) -> usize {
        self.orchestrator.image_count()
    }

    pub async fn handle(&self, raw: RawDesignRequest) -> Result<GenerationResult> {
        let request = raw.validate()?;

        if let Some(limiter) = &self.rate_limiter {
            limiter.acquire()?;
        }

        let _timer = logger::timer("tattoo generation");
        log::info!(
            "Generating designs: style={}, location={}, theme={}",
            request.style,
            request.location,
            request.theme
        );

        let prompt = optimize_for_provider(&build_prompt(&request), self.max_prompt_length);
        let run = self.orchestrator.run(prompt).await?;

        Ok(GenerationResult::new(run.prompt, run.images, request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GenerationConfig, ProviderConfig};
    use crate::error::InkError;
    use crate::models::{ColorPreference, DesignRequest};
    use crate::orchestrator::testing::{RecordingSleeper, ScriptedProvider, STUB_URL};
    use crate::provider::ProviderFailure;

    fn settings(max_images: usize) -> Settings {
        Settings::new()
            .with_provider(ProviderConfig::new().with_api_key("sk-test"))
            .with_generation(
                GenerationConfig::new()
                    .with_max_images(max_images)
                    .without_delays(),
            )
    }

    fn service(settings: &Settings, provider: Arc<ScriptedProvider>) -> GenerationService {
        GenerationService::with_provider(settings, provider)
            .unwrap()
            .with_sleeper(Arc::new(RecordingSleeper::default()))
    }

    fn wrist_request() -> DesignRequest {
        DesignRequest::new("line art", "small", "wrist", "nature")
            .with_color(ColorPreference::Black)
            .with_mood("calm")
    }

    #[tokio::test]
    async fn missing_theme_is_rejected_before_any_provider_call() {
        let provider = Arc::new(ScriptedProvider::always_ok());
        let service = service(&settings(3), provider.clone());

        let mut raw = RawDesignRequest::from(wrist_request());
        raw.theme = None;

        match service.handle(raw).await {
            Err(InkError::Validation { missing }) => assert_eq!(missing, vec!["theme"]),
            other => panic!("expected validation error, got {:?}", other),
        }
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn end_to_end_wrist_request() {
        let provider = Arc::new(ScriptedProvider::always_ok());
        let settings = settings(3);
        let service = service(&settings, provider.clone());

        let request = wrist_request();
        let result = service
            .handle(RawDesignRequest::from(request.clone()))
            .await
            .unwrap();

        assert_eq!(result.images.len(), service.images_per_request());
        assert_eq!(result.images.len(), 3);
        assert!(result.images.iter().all(|image| image.url == STUB_URL));
        assert!(result.images.iter().all(|image| image.size == "1024x1024"));
        assert_eq!(result.request, request);
        assert!(result.prompt.contains("wrist area"));
        assert_eq!(provider.prompts()[0], result.prompt);
    }

    #[tokio::test]
    async fn policy_rejection_retries_with_a_different_prompt() {
        let provider = Arc::new(ScriptedProvider::new(
            vec![Err(ProviderFailure::ContentPolicy(
                "Your request was rejected by our safety system".to_string(),
            ))],
            Ok(STUB_URL.to_string()),
        ));
        let service = service(&settings(1), provider.clone());

        let result = service
            .handle(RawDesignRequest::from(wrist_request()))
            .await
            .unwrap();

        let prompts = provider.prompts();
        assert_eq!(prompts.len(), 2);
        assert_eq!(prompts[0], build_prompt(&wrist_request()));
        assert_ne!(prompts[1], prompts[0]);
        assert!(!prompts[1].contains("wrist"));
        assert_eq!(result.prompt, prompts[1]);
        assert_eq!(result.images.len(), 1);
    }

    #[tokio::test]
    async fn invalid_settings_never_reach_the_provider() {
        let provider = Arc::new(ScriptedProvider::always_ok());
        let bad = settings(9);
        match GenerationService::with_provider(&bad, provider.clone()) {
            Err(InkError::Configuration(problems)) => {
                assert!(problems[0].starts_with("MAX_IMAGES_PER_REQUEST"))
            }
            Err(other) => panic!("expected configuration error, got {:?}", other),
            Ok(_) => panic!("expected configuration error"),
        }
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn zero_images_is_a_generation_failure() {
        let provider = Arc::new(ScriptedProvider::always_failing(ProviderFailure::Transient(
            "timeout".to_string(),
        )));
        let service = service(&settings(2), provider);
        let result = service.handle(RawDesignRequest::from(wrist_request())).await;
        assert!(matches!(result, Err(InkError::GenerationFailed { .. })));
    }

    #[tokio::test]
    async fn hourly_limit_applies_across_requests() {
        let provider = Arc::new(ScriptedProvider::always_ok());
        let mut settings = settings(1);
        settings.generation = settings.generation.with_rate_limit(1, true);
        let service = service(&settings, provider.clone());

        assert!(service.handle(RawDesignRequest::from(wrist_request())).await.is_ok());
        let second = service.handle(RawDesignRequest::from(wrist_request())).await;
        assert!(matches!(second, Err(InkError::RateLimited { limit: 1 })));
        assert_eq!(provider.calls(), 1);
    }
}
