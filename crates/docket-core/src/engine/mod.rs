//! Duplicate-grouping engine.
//!
//! A run anchors a trailing window on the newest ticket, partitions the
//! recent tickets by `(customer_name, type, sub_type)`, and walks each
//! partition in time order asking the oracle whether each ticket repeats the
//! partition's running parent.

mod config;
mod detector;
mod outcome;
mod partition;
mod window;

pub use config::{DedupConfig, OracleErrorPolicy};
pub use detector::{detect_duplicates, DuplicateDetector};
pub use outcome::{DedupOutcome, DedupStats, DuplicateLink, PartitionFailure};
