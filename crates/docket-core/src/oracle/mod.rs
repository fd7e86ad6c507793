//! Similarity oracle adapter.
//!
//! Turns a general-purpose completion provider into a [`SimilarityOracle`]:
//! builds the comparison prompt, bounds the call with a timeout, and parses
//! the free-text answer into a verdict.
//!
//! [`SimilarityOracle`]: crate::traits::SimilarityOracle

mod adapter;
mod parse;
mod prompts;

pub use adapter::{LlmOracle, OracleAnswer, OracleConfig};
pub use parse::{parse_assessment, Assessment};
pub use prompts::comparison_prompt;
