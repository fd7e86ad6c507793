//! Core traits for docket providers.

mod llm;
mod oracle;

pub use llm::*;
pub use oracle::*;
