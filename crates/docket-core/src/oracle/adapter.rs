//! Similarity oracle backed by an LLM completion provider.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::parse::{parse_assessment, Assessment};
use super::prompts::comparison_prompt;
use crate::error::{DocketError, DocketResult};
use crate::traits::{GenerationOptions, Llm, SimilarityOracle, SimilarityVerdict};

/// Oracle adapter settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Upper bound on a single oracle call. Default: 30
    pub timeout_secs: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

/// Parsed oracle answer together with the text it came from.
#[derive(Debug, Clone)]
pub struct OracleAnswer {
    pub assessment: Assessment,
    pub raw: String,
}

/// [`SimilarityOracle`] that asks an LLM whether two summaries match.
///
/// Each comparison is one completion request at temperature 0. There is no
/// retry and no caching.
pub struct LlmOracle {
    llm: Arc<dyn Llm>,
    timeout: Duration,
}

impl LlmOracle {
    /// Create an oracle over the given provider.
    pub fn new(llm: Arc<dyn Llm>, config: &OracleConfig) -> Self {
        Self {
            llm,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Override the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Name of the model answering comparisons.
    pub fn model_name(&self) -> &str {
        self.llm.model_name()
    }

    /// Ask the provider about two summaries and parse its answer.
    pub async fn assess(&self, text_a: &str, text_b: &str) -> DocketResult<OracleAnswer> {
        let prompt = comparison_prompt(text_a, text_b);
        let options = GenerationOptions {
            temperature: Some(0.0),
            ..Default::default()
        };

        let raw = tokio::time::timeout(self.timeout, self.llm.complete(&prompt, Some(options)))
            .await
            .map_err(|_| DocketError::oracle_timeout(self.timeout))??;

        let assessment = parse_assessment(&raw);
        debug!(
            model = self.llm.model_name(),
            said_yes = assessment.said_yes,
            score = assessment.score,
            "Oracle answered"
        );

        Ok(OracleAnswer { assessment, raw })
    }
}

#[async_trait]
impl SimilarityOracle for LlmOracle {
    async fn compare(
        &self,
        text_a: &str,
        text_b: &str,
        threshold: f32,
    ) -> DocketResult<SimilarityVerdict> {
        let answer = self.assess(text_a, text_b).await?;
        Ok(answer.assessment.verdict(threshold))
    }
}
