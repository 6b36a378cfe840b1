//! OpenAI-compatible provider implementation.
//!
//! Works with: OpenAI, OpenRouter, Anthropic (via proxy), Ollama, vLLM,
//! Together AI, Fireworks AI, and any OpenAI-compatible endpoint.
//!
//! The pipeline hands in a tier; this provider maps it to the concrete
//! model configured for that tier and reports the token usage the
//! endpoint returned, which feeds the shared daily budget.

use adjutant_config::{AppConfig, TierModels};
use adjutant_core::error::ProviderError;
use adjutant_core::provider::{ModelCompletion, ModelProvider};
use adjutant_core::tier::ModelTier;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

/// An OpenAI-compatible LLM provider with a per-tier model mapping.
#[derive(Debug)]
pub struct OpenAiCompatProvider {
    name: String,
    base_url: String,
    api_key: String,
    models: TierModels,
    client: reqwest::Client,
}

impl OpenAiCompatProvider {
    /// Create a new OpenAI-compatible provider.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        models: TierModels,
        timeout_secs: u64,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        Ok(Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            models,
            client,
        })
    }

    /// Create an OpenRouter provider (convenience constructor).
    pub fn openrouter(api_key: impl Into<String>, models: TierModels) -> Result<Self, ProviderError> {
        Self::new("openrouter", "https://openrouter.ai/api/v1", api_key, models, 30)
    }

    /// Build a provider from the loaded application config.
    ///
    /// Fails with `NotConfigured` when no API key is present — that is a
    /// startup error, not a per-request one.
    pub fn from_config(config: &AppConfig) -> Result<Self, ProviderError> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                ProviderError::NotConfigured(
                    "no API key set (config api_key or ADJUTANT_API_KEY)".into(),
                )
            })?;

        Self::new(
            "openrouter",
            config.base_url.clone(),
            api_key,
            config.tiers.clone(),
            config.request_timeout_secs,
        )
    }

    /// The concrete model id serving a tier.
    fn model_for(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Cheap => &self.models.cheap,
            ModelTier::Mid => &self.models.mid,
            ModelTier::Premium => &self.models.premium,
        }
    }
}

#[async_trait]
impl ModelProvider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(
        &self,
        tier: ModelTier,
        system_context: &str,
        question: &str,
    ) -> std::result::Result<ModelCompletion, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);
        let model = self.model_for(tier);

        let body = serde_json::json!({
            "model": model,
            "messages": [
                { "role": "system", "content": system_context },
                { "role": "user", "content": question },
            ],
            "stream": false,
        });

        debug!(provider = %self.name, %model, %tier, "Sending completion request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(e.to_string())
                } else {
                    ProviderError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(ProviderError::RateLimited {
                retry_after_secs: 5,
            });
        }

        if status == 401 || status == 403 {
            return Err(ProviderError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Provider returned error");
            return Err(ProviderError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_response: ApiResponse =
            response.json().await.map_err(|e| ProviderError::ApiError {
                status_code: 200,
                message: format!("Failed to parse response: {e}"),
            })?;

        let choice =
            api_response
                .choices
                .into_iter()
                .next()
                .ok_or_else(|| ProviderError::ApiError {
                    status_code: 200,
                    message: "No choices in response".into(),
                })?;

        let usage = api_response.usage.unwrap_or_default();

        Ok(ModelCompletion {
            text: choice.message.content.unwrap_or_default(),
            input_tokens: usage.prompt_tokens,
            output_tokens: usage.completion_tokens,
        })
    }
}

// --- OpenAI API types (internal) ---

#[derive(Debug, Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openrouter_constructor() {
        let provider =
            OpenAiCompatProvider::openrouter("sk-test", TierModels::default()).unwrap();
        assert_eq!(provider.name(), "openrouter");
        assert!(provider.base_url.contains("openrouter.ai"));
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let provider = OpenAiCompatProvider::new(
            "local",
            "http://localhost:11434/v1/",
            "unused",
            TierModels::default(),
            30,
        )
        .unwrap();
        assert_eq!(provider.base_url, "http://localhost:11434/v1");
    }

    #[test]
    fn tier_maps_to_configured_model() {
        let models = TierModels {
            cheap: "cheap-model".into(),
            mid: "mid-model".into(),
            premium: "premium-model".into(),
        };
        let provider =
            OpenAiCompatProvider::new("test", "http://x", "k", models, 30).unwrap();

        assert_eq!(provider.model_for(ModelTier::Cheap), "cheap-model");
        assert_eq!(provider.model_for(ModelTier::Mid), "mid-model");
        assert_eq!(provider.model_for(ModelTier::Premium), "premium-model");
    }

    #[test]
    fn from_config_requires_an_api_key() {
        let config = AppConfig::default();
        let err = OpenAiCompatProvider::from_config(&config).unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured(_)));

        let config = AppConfig {
            api_key: Some("sk-test".into()),
            ..Default::default()
        };
        assert!(OpenAiCompatProvider::from_config(&config).is_ok());
    }

    #[test]
    fn parse_completion_response() {
        let data = r#"{
            "model": "openai/gpt-4o-mini",
            "choices": [{"message": {"role": "assistant", "content": "Hello"}}],
            "usage": {"prompt_tokens": 120, "completion_tokens": 8, "total_tokens": 128}
        }"#;
        let parsed: ApiResponse = serde_json::from_str(data).unwrap();
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some("Hello")
        );
        assert_eq!(parsed.usage.unwrap().prompt_tokens, 120);
    }

    #[test]
    fn missing_usage_defaults_to_zero() {
        let data = r#"{"choices": [{"message": {"content": "hi"}}]}"#;
        let parsed: ApiResponse = serde_json::from_str(data).unwrap();
        let usage = parsed.usage.unwrap_or_default();
        assert_eq!(usage.prompt_tokens, 0);
        assert_eq!(usage.completion_tokens, 0);
    }
}
