//! Factory for creating LLM providers.

use std::sync::Arc;

use docket_core::config::{LlmProvider, LlmProviderConfig};
use docket_core::error::DocketResult;
use docket_core::traits::{Llm, LlmConfig};

use crate::anthropic::AnthropicLlm;
use crate::openai::OpenAIProvider;

/// Factory for creating LLM providers.
pub struct LlmFactory;

impl LlmFactory {
    /// Create an LLM provider from the given configuration.
    pub fn create(provider: LlmProvider, config: LlmConfig) -> DocketResult<Arc<dyn Llm>> {
        tracing::debug!(%provider, model = %config.model, "Creating LLM provider");
        match provider {
            LlmProvider::OpenAI => {
                let llm = OpenAIProvider::new(config)?;
                Ok(Arc::new(llm))
            }
            LlmProvider::Anthropic => {
                let llm = AnthropicLlm::new(config)?;
                Ok(Arc::new(llm))
            }
        }
    }

    /// Create a provider from a loaded `[llm]` config section.
    pub fn from_config(config: &LlmProviderConfig) -> DocketResult<Arc<dyn Llm>> {
        Self::create(config.provider, config.config.clone())
    }

    /// Create an OpenAI LLM provider with default configuration.
    pub fn openai() -> DocketResult<Arc<dyn Llm>> {
        Self::create(LlmProvider::OpenAI, LlmConfig::default())
    }

    /// Create an OpenAI LLM provider with a specific model.
    pub fn openai_with_model(model: impl Into<String>) -> DocketResult<Arc<dyn Llm>> {
        let config = LlmConfig {
            model: model.into(),
            ..Default::default()
        };
        Self::create(LlmProvider::OpenAI, config)
    }

    /// Create an Anthropic LLM provider with default configuration.
    pub fn anthropic() -> DocketResult<Arc<dyn Llm>> {
        Self::create(LlmProvider::Anthropic, LlmConfig::default())
    }

    /// Create an Anthropic LLM provider with a specific model.
    pub fn anthropic_with_model(model: impl Into<String>) -> DocketResult<Arc<dyn Llm>> {
        let config = LlmConfig {
            model: model.into(),
            ..Default::default()
        };
        Self::create(LlmProvider::Anthropic, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyed(model: &str) -> LlmConfig {
        LlmConfig {
            model: model.to_string(),
            api_key: Some("test-key".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_each_provider() {
        let openai = LlmFactory::create(LlmProvider::OpenAI, keyed("gpt-4o-mini")).unwrap();
        assert_eq!(openai.model_name(), "gpt-4o-mini");

        let anthropic = LlmFactory::create(LlmProvider::Anthropic, keyed("")).unwrap();
        assert_eq!(anthropic.model_name(), crate::anthropic::DEFAULT_ANTHROPIC_MODEL);
    }

    #[test]
    fn test_from_config_uses_section_provider() {
        let config = LlmProviderConfig {
            provider: LlmProvider::Anthropic,
            config: keyed("claude-3-haiku-20240307"),
        };
        let llm = LlmFactory::from_config(&config).unwrap();
        assert_eq!(llm.model_name(), "claude-3-haiku-20240307");
    }
}
