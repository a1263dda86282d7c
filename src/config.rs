use crate::error::{InkError, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const MAX_IMAGES_LIMIT: usize = 5;

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_key: String,
    pub model: String,
    pub image_size: String,
    pub image_quality: String,
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub max_images_per_request: usize,
    pub max_requests_per_hour: u32,
    pub enable_rate_limiting: bool,
    pub max_retries: usize,
    pub policy_retry_delay: Duration,
    pub transient_retry_delay: Duration,
    pub inter_call_delay: Duration,
    pub max_prompt_length: usize,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct HistoryConfig {
    pub file_path: Option<PathBuf>,
    pub limit: usize,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub provider: ProviderConfig,
    pub generation: GenerationConfig,
    pub server: ServerConfig,
    pub history: HistoryConfig,
    /// Values that were present in the environment but could not be parsed.
    parse_errors: Vec<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            api_key: String::new(),
            model: "dall-e-3".to_string(),
            image_size: "1024x1024".to_string(),
            image_quality: "standard".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_millis(30_000),
        }
    }
}

impl ProviderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
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

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        GenerationConfig {
            max_images_per_request: 3,
            max_requests_per_hour: 10,
            enable_rate_limiting: true,
            max_retries: 2,
            policy_retry_delay: Duration::from_millis(2_000),
            transient_retry_delay: Duration::from_millis(3_000),
            inter_call_delay: Duration::from_millis(2_000),
            max_prompt_length: 4_000,
        }
    }
}

impl GenerationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_images(mut self, max_images: usize) -> Self {
        self.max_images_per_request = max_images;
        self
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_delays(mut self, policy: Duration, transient: Duration) -> Self {
        self.policy_retry_delay = policy;
        self.transient_retry_delay = transient;
        self
    }

    pub fn with_inter_call_delay(mut self, delay: Duration) -> Self {
        self.inter_call_delay = delay;
        self
    }

    pub fn with_rate_limit(mut self, max_requests_per_hour: u32, enabled: bool) -> Self {
        self.max_requests_per_hour = max_requests_per_hour;
        self.enable_rate_limiting = enabled;
        self
    }

    /// Zero delays everywhere, handy for tests and local stubs.
    pub fn without_delays(self) -> Self {
        self.with_retry_delays(Duration::ZERO, Duration::ZERO)
            .with_inter_call_delay(Duration::ZERO)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        HistoryConfig {
            file_path: None,
            limit: 50,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            provider: ProviderConfig::default(),
            generation: GenerationConfig::default(),
            server: ServerConfig::default(),
            history: HistoryConfig::default(),
            parse_errors: Vec::new(),
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from any key lookup. Missing keys fall back to defaults;
    /// present but malformed values are kept as problems for `validate`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut parse_errors = Vec::new();
        let defaults = Settings::default();

        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let mut number = |key: &str, default: u64| -> u64 {
            parse_value(&lookup, key, default, &mut parse_errors)
        };

        let timeout_ms = number("API_TIMEOUT", 30_000);
        let max_images = number("MAX_IMAGES_PER_REQUEST", 3);
        let max_requests = number("MAX_REQUESTS_PER_HOUR", 10);
        let max_retries = number("GENERATION_MAX_RETRIES", 2);
        let policy_ms = number("POLICY_RETRY_DELAY_MS", 2_000);
        let transient_ms = number("TRANSIENT_RETRY_DELAY_MS", 3_000);
        let inter_call_ms = number("INTER_CALL_DELAY_MS", 2_000);
        let max_prompt_length = number("MAX_PROMPT_LENGTH", 4_000);
        let port = number("PORT", 3000);
        let history_limit = number("HISTORY_LIMIT", 50);

        let enable_rate_limiting = match lookup("ENABLE_RATE_LIMITING") {
            None => true,
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "true" => true,
                "false" => false,
                _ => {
                    parse_errors.push(format!(
                        "ENABLE_RATE_LIMITING must be true or false (got {:?})",
                        raw
                    ));
                    true
                }
            },
        };

        if port > u16::MAX as u64 {
            parse_errors.push(format!("PORT must be at most {}", u16::MAX));
        }

        Settings {
            provider: ProviderConfig {
                api_key: text("OPENAI_API_KEY", ""),
                model: text("OPENAI_MODEL", &defaults.provider.model),
                image_size: text("OPENAI_IMAGE_SIZE", &defaults.provider.image_size),
                image_quality: text("OPENAI_IMAGE_QUALITY", &defaults.provider.image_quality),
                base_url: text("OPENAI_BASE_URL", &defaults.provider.base_url),
                timeout: Duration::from_millis(timeout_ms),
            },
            generation: GenerationConfig {
                max_images_per_request: max_images as usize,
                max_requests_per_hour: max_requests.min(u32::MAX as u64) as u32,
                enable_rate_limiting,
                max_retries: max_retries as usize,
                policy_retry_delay: Duration::from_millis(policy_ms),
                transient_retry_delay: Duration::from_millis(transient_ms),
                inter_call_delay: Duration::from_millis(inter_call_ms),
                max_prompt_length: max_prompt_length as usize,
            },
            server: ServerConfig {
                host: text("HOST", &defaults.server.host),
                port: port.min(u16::MAX as u64) as u16,
            },
            history: HistoryConfig {
                file_path: lookup("HISTORY_FILE")
                    .filter(|path| !path.trim().is_empty())
                    .map(PathBuf::from),
                limit: history_limit as usize,
            },
            parse_errors,
        }
    }

    pub fn with_provider(mut self, config: ProviderConfig) -> Self {
        self.provider = config;
        self
    }

    pub fn with_generation(mut self, config: GenerationConfig) -> Self {
        self.generation = config;
        self
    }

    pub fn with_server(mut self, host: impl Into<String>, port: u16) -> Self {
        self.server = ServerConfig {
            host: host.into(),
            port,
        };
        self
    }

    pub fn with_history_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.history.file_path = Some(path.into());
        self
    }

    /// Every problem with the settings, in a stable order. Empty when valid.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = self.parse_errors.clone();

        if self.provider.api_key.trim().is_empty() {
            problems.push("OPENAI_API_KEY is not set".to_string());
        }

        let max_images = self.generation.max_images_per_request;
        if !(1..=MAX_IMAGES_LIMIT).contains(&max_images) {
            problems.push(format!(
                "MAX_IMAGES_PER_REQUEST must be between 1 and {} (got {})",
                MAX_IMAGES_LIMIT, max_images
            ));
        }

        if self.generation.max_requests_per_hour < 1 {
            problems.push("MAX_REQUESTS_PER_HOUR must be at least 1".to_string());
        }

        if self.generation.max_prompt_length == 0 {
            problems.push("MAX_PROMPT_LENGTH must be greater than 0".to_string());
        }

        if self.history.limit == 0 {
            problems.push("HISTORY_LIMIT must be greater than 0".to_string());
        }

        problems
    }

    pub fn validate(&self) -> Result<()> {
        let problems = self.problems();
        if problems.is_empty() {
            Ok(())
        } else {
            Err(InkError::Configuration(problems))
        }
    }
}

fn parse_value<F, T>(lookup: &F, key: &str, default: T, errors: &mut Vec<String>) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                errors.push(format!("{} has an invalid value: {:?}", key, raw));
                default
            }
        },
        None => default,
    }
}
