//! docket-core - Core library for docket.
//!
//! This crate provides the ticket types, the similarity oracle adapter, and
//! the duplicate-grouping engine that picks one parent ticket per incident
//! out of a support desk export.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use docket_core::{import::load_path, DedupConfig, DuplicateDetector, LlmOracle, OracleConfig};
//!
//! let batch = load_path("tickets.csv")?;
//! let oracle = LlmOracle::new(llm, &OracleConfig::default());
//! let detector = DuplicateDetector::new(Arc::new(oracle), DedupConfig::default())?;
//!
//! let outcome = detector.detect(&batch.tickets).await?;
//! for link in &outcome.links {
//!     println!("{} -> {}", link.child_id, link.parent_id);
//! }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod import;
pub mod oracle;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use config::{DocketConfig, LlmProvider, LlmProviderConfig};
pub use engine::{
    detect_duplicates, DedupConfig, DedupOutcome, DedupStats, DuplicateDetector, DuplicateLink,
    OracleErrorPolicy, PartitionFailure,
};
pub use error::{DocketError, DocketResult, ErrorCode};
pub use import::{LoadReport, RejectedRow, TicketBatch};
pub use oracle::{LlmOracle, OracleConfig};
pub use traits::{Llm, LlmConfig, SimilarityOracle, SimilarityVerdict};
pub use types::{GroupKey, Message, MessageRole, Ticket};
