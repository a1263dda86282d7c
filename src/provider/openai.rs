use super::{ImageProvider, ProviderFailure};
use crate::{
    config::ProviderConfig,
    error::{InkError, Result},
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct ImageGenerationPayload<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u32,
    size: &'a str,
    quality: &'a str,
}

#[derive(Debug, Deserialize)]
struct ImageGenerationResponse {
    #[serde(default)]
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    code: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

/// Client for OpenAI-compatible `/images/generations` endpoints. Always asks
/// for a single image.
#[derive(Clone)]
pub struct OpenAiImageClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiImageClient {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(InkError::Configuration(vec![
                "OPENAI_API_KEY is not set".to_string()
            ]));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| InkError::Configuration(vec![format!("HTTP client: {}", e)]))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/images/generations", self.base_url)
    }
}

#[async_trait]
impl ImageProvider for OpenAiImageClient {
    async fn generate(
        &self,
        prompt: &str,
        size: &str,
        quality: &str,
    ) -> std::result::Result<String, ProviderFailure> {
        let payload = ImageGenerationPayload {
            model: &self.model,
            prompt,
            n: 1,
            size,
            quality,
        };

        log::debug!(
            "Requesting image from {} (model: {}, size: {}, quality: {})",
            self.base_url,
            self.model,
            size,
            quality
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderFailure::Transient(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(classify_failure(status, &body));
        }

        let parsed: ImageGenerationResponse =
            serde_json::from_str(&body).map_err(|e| ProviderFailure::Fatal {
                message: "Unexpected response from image provider".to_string(),
                details: Some(e.to_string()),
            })?;

        parsed
            .data
            .into_iter()
            .find_map(|image| image.url.filter(|url| !url.is_empty()))
            .ok_or_else(|| ProviderFailure::Transient("response contained no image URL".into()))
    }

    fn name(&self) -> &str {
        &self.model
    }
}

fn classify_transport_error(err: reqwest::Error) -> ProviderFailure {
    if err.is_timeout() || err.is_connect() || err.is_request() {
        ProviderFailure::Transient(err.to_string())
    } else {
        ProviderFailure::Fatal {
            message: "Could not reach image provider".to_string(),
            details: Some(err.to_string()),
        }
    }
}

/// Maps a non-success HTTP answer to a failure kind.
pub(crate) fn classify_failure(status: StatusCode, body: &str) -> ProviderFailure {
    let error = serde_json::from_str::<ErrorEnvelope>(body).ok().map(|e| e.error);
    let message = error
        .as_ref()
        .map(|e| e.message.clone())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("HTTP {}", status));

    let is_policy = error.as_ref().map_or(false, |e| {
        e.code.as_deref() == Some("content_policy_violation")
            || (e.kind.as_deref() == Some("image_generation_user_error")
                && mentions_policy(&e.message))
    }) || (status == StatusCode::BAD_REQUEST && mentions_policy(&message));

    if is_policy {
        return ProviderFailure::ContentPolicy(message);
    }

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderFailure::Fatal {
            message: "Image provider rejected the API key".to_string(),
            details: Some(message),
        },
        StatusCode::REQUEST_TIMEOUT | StatusCode::CONFLICT | StatusCode::TOO_MANY_REQUESTS => {
            ProviderFailure::Transient(message)
        }
        s if s.is_server_error() => ProviderFailure::Transient(message),
        _ => ProviderFailure::Fatal {
            message: "Image provider returned an error".to_string(),
            details: Some(message),
        },
    }
}

fn mentions_policy(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("content policy") || lower.contains("safety system")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn policy_code_is_recognized() {
        let body = json!({
            "error": {
                "message": "Your request was rejected as a result of our safety system.",
                "type": "invalid_request_error",
                "code": "content_policy_violation"
            }
        })
        .to_string();
        assert!(matches!(
            classify_failure(StatusCode::BAD_REQUEST, &body),
            ProviderFailure::ContentPolicy(_)
        ));
    }

    #[test]
    fn policy_wording_without_code_is_recognized() {
        let body = r#"{"error":{"message":"This request may violate our content policy."}}"#;
        assert!(matches!(
            classify_failure(StatusCode::BAD_REQUEST, body),
            ProviderFailure::ContentPolicy(_)
        ));
    }

    #[test]
    fn auth_failures_are_fatal_with_details() {
        let body = r#"{"error":{"message":"Incorrect API key provided","code":"invalid_api_key"}}"#;
        match classify_failure(StatusCode::UNAUTHORIZED, body) {
            ProviderFailure::Fatal { details, .. } => {
                assert_eq!(details.as_deref(), Some("Incorrect API key provided"))
            }
            other => panic!("expected fatal failure, got {:?}", other),
        }
    }

    #[test]
    fn rate_limits_and_server_errors_are_transient() {
        assert!(matches!(
            classify_failure(StatusCode::TOO_MANY_REQUESTS, "{}"),
            ProviderFailure::Transient(_)
        ));
        assert!(matches!(
            classify_failure(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>"),
            ProviderFailure::Transient(_)
        ));
    }

    #[test]
    fn other_client_errors_are_fatal() {
        let body = r#"{"error":{"message":"Invalid size","code":"invalid_value"}}"#;
        let failure = classify_failure(StatusCode::BAD_REQUEST, body);
        assert!(!failure.is_retryable());
    }

    #[test]
    fn client_requires_api_key() {
        let config = ProviderConfig::new();
        assert!(matches!(
            OpenAiImageClient::new(&config),
            Err(InkError::Configuration(_))
        ));
        let client = OpenAiImageClient::new(
            &ProviderConfig::new()
                .with_api_key("sk-test")
                .with_base_url("http://localhost:9999/v1/"),
        )
        .unwrap();
        assert_eq!(client.endpoint(), "http://localhost:9999/v1/images/generations");
    }
}
