//! Similarity oracle trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::DocketResult;

/// Outcome of comparing two ticket summaries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityVerdict {
    /// True only when the oracle said YES and the score met the threshold.
    pub is_duplicate: bool,
    /// Parsed similarity score in [0, 1]; 0.0 when none could be parsed.
    pub score: f32,
}

impl SimilarityVerdict {
    /// A verdict that keeps the two tickets apart.
    pub fn distinct(score: f32) -> Self {
        Self {
            is_duplicate: false,
            score,
        }
    }

    /// A verdict that merges the candidate into the parent.
    pub fn duplicate(score: f32) -> Self {
        Self {
            is_duplicate: true,
            score,
        }
    }
}

/// Semantic comparison capability used by the grouping engine.
///
/// Implementations make at most one external call per `compare` and keep no
/// state between calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SimilarityOracle: Send + Sync {
    /// Decide whether `text_a` and `text_b` describe the same issue.
    async fn compare(
        &self,
        text_a: &str,
        text_b: &str,
        threshold: f32,
    ) -> DocketResult<SimilarityVerdict>;
}
