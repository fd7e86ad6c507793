//! docket-llm - Completion providers for docket.
//!
//! This crate provides the LLM providers that back the docket similarity
//! oracle. Each provider implements [`docket_core::Llm`].
//!
//! # Supported Providers
//!
//! - **OpenAI** (feature: `openai`) - GPT-4o, o-series, etc.
//! - **Anthropic** - Claude 3.5, Claude 3, etc.
//!
//! # Example
//!
//! ```ignore
//! use docket_llm::LlmFactory;
//!
//! let llm = LlmFactory::openai_with_model("gpt-4o-mini")?;
//! let llm = LlmFactory::anthropic_with_model("claude-3-5-sonnet-20240620")?;
//! ```

mod anthropic;
mod factory;
mod openai;

pub use anthropic::AnthropicLlm;
pub use factory::LlmFactory;
pub use openai::OpenAIProvider;

// Re-export core types for convenience
pub use docket_core::config::LlmProvider;
pub use docket_core::traits::{GenerationOptions, Llm, LlmConfig, LlmResponse, TokenUsage};
