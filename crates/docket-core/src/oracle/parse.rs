//! Lenient parsing of free-text oracle answers.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::traits::SimilarityVerdict;

// One digit, a point, one or two fractional digits: "0.82", "1.0".
static SCORE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-1]\.\d{1,2}").unwrap());

/// What the oracle said, before any threshold is applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    /// The answer contained "YES" (any case).
    pub said_yes: bool,
    /// First score found in the answer, 0.0 when none.
    pub score: f32,
}

impl Assessment {
    /// Apply the threshold policy.
    ///
    /// A YES with no parseable score has score 0.0 and so never passes a
    /// positive threshold.
    pub fn verdict(&self, threshold: f32) -> SimilarityVerdict {
        SimilarityVerdict {
            is_duplicate: self.said_yes && self.score >= threshold,
            score: self.score,
        }
    }
}

/// Parse a verdict and score out of the oracle's answer.
pub fn parse_assessment(answer: &str) -> Assessment {
    let said_yes = answer.to_uppercase().contains("YES");
    let score = SCORE_PATTERN
        .find(answer)
        .and_then(|m| m.as_str().parse::<f32>().ok())
        .unwrap_or(0.0);

    Assessment { said_yes, score }
}
