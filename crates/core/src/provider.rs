//! External collaborator traits — the LLM provider and the raw-context
//! source.
//!
//! Both are consumed as opaque services: the pipeline calls `complete()` or
//! `fetch_raw_context()` without knowing which backend is wired in — pure
//! polymorphism, easy to stub in tests.

use crate::context_data::RawContextData;
use crate::error::{ProviderError, UpstreamError};
use crate::tier::ModelTier;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A completed model invocation: generated text plus the token usage the
/// provider reported for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelCompletion {
    pub text: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// The text-completion service contract.
///
/// The pipeline picks the tier; the implementation maps it to a concrete
/// model. Usage must be reported even on partial success where the backend
/// allows it — token counts feed the shared daily budget.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// A human-readable name for this provider (e.g., "openrouter").
    fn name(&self) -> &str;

    /// Generate an answer to `question` given the assembled `system_context`.
    async fn complete(
        &self,
        tier: ModelTier,
        system_context: &str,
        question: &str,
    ) -> std::result::Result<ModelCompletion, ProviderError>;
}

/// Supplier of the current operational state.
///
/// May partially fail per-domain; partial failures surface as missing
/// fields on [`RawContextData`], not as an error. `Err` means the fetch
/// produced nothing usable at all.
#[async_trait]
pub trait ContextSource: Send + Sync {
    async fn fetch_raw_context(&self) -> std::result::Result<RawContextData, UpstreamError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoProvider;

    #[async_trait]
    impl ModelProvider for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }

        async fn complete(
            &self,
            _tier: ModelTier,
            _system_context: &str,
            question: &str,
        ) -> std::result::Result<ModelCompletion, ProviderError> {
            Ok(ModelCompletion {
                text: format!("echo: {question}"),
                input_tokens: 10,
                output_tokens: 5,
            })
        }
    }

    #[tokio::test]
    async fn provider_trait_is_object_safe() {
        let provider: Box<dyn ModelProvider> = Box::new(EchoProvider);
        let completion = provider
            .complete(ModelTier::Cheap, "ctx", "hello")
            .await
            .unwrap();
        assert_eq!(completion.text, "echo: hello");
        assert_eq!(completion.input_tokens, 10);
    }
}
