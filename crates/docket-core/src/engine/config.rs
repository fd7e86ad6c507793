//! Configuration for the duplicate-grouping engine.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// What the engine does when an oracle call fails inside a partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OracleErrorPolicy {
    /// Fail the whole run with the wrapped oracle error.
    #[default]
    Abort,
    /// Record the partition as failed and keep processing the others.
    SkipPartition,
}

/// Configuration for duplicate detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    /// Trailing window, anchored to the newest ticket in the batch.
    /// Default: 10 minutes
    pub time_window_minutes: i64,

    /// Minimum oracle score for a YES verdict to count as duplicate.
    /// Range: 0.0-1.0. Default: 0.75
    pub similarity_threshold: f32,

    /// Partitions processed at the same time. Comparisons inside one
    /// partition always run in sequence. Default: 1
    pub max_concurrent_partitions: usize,

    /// Oracle failure handling. Default: abort
    pub on_oracle_error: OracleErrorPolicy,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            time_window_minutes: 10,
            similarity_threshold: 0.75,
            max_concurrent_partitions: 1,
            on_oracle_error: OracleErrorPolicy::Abort,
        }
    }
}

impl DedupConfig {
    /// Create config with a custom window and threshold.
    pub fn new(time_window_minutes: i64, similarity_threshold: f32) -> Self {
        Self {
            time_window_minutes,
            similarity_threshold,
            ..Default::default()
        }
    }

    /// Set the partition concurrency.
    pub fn with_concurrency(mut self, partitions: usize) -> Self {
        self.max_concurrent_partitions = partitions;
        self
    }

    /// Set the oracle failure policy.
    pub fn with_error_policy(mut self, policy: OracleErrorPolicy) -> Self {
        self.on_oracle_error = policy;
        self
    }

    /// The window as a chrono duration.
    ///
    /// Saturates at `TimeDelta::MAX` for minute counts chrono cannot
    /// represent; `validate` rejects those.
    pub fn time_window(&self) -> chrono::Duration {
        chrono::Duration::try_minutes(self.time_window_minutes).unwrap_or(chrono::Duration::MAX)
    }

    /// Validate configuration values are in valid ranges.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.time_window_minutes <= 0 {
            return Err("time_window_minutes must be at least 1");
        }
        if chrono::Duration::try_minutes(self.time_window_minutes).is_none() {
            return Err("time_window_minutes is too large");
        }
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err("similarity_threshold must be between 0.0 and 1.0");
        }
        if self.max_concurrent_partitions == 0 {
            return Err("max_concurrent_partitions must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DedupConfig::default();
        assert_eq!(config.time_window(), chrono::Duration::minutes(10));
        assert!((config.similarity_threshold - 0.75).abs() < f32::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        assert!(DedupConfig::new(10, 1.5).validate().is_err());
        assert!(DedupConfig::new(0, 0.5).validate().is_err());
        assert!(DedupConfig::default().with_concurrency(0).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unrepresentable_window() {
        let config = DedupConfig::new(i64::MAX, 0.75);
        assert_eq!(config.validate(), Err("time_window_minutes is too large"));
        assert_eq!(config.time_window(), chrono::Duration::MAX);
    }

    #[test]
    fn test_policy_parses_snake_case() {
        assert_eq!(
            "skip_partition".parse::<OracleErrorPolicy>().unwrap(),
            OracleErrorPolicy::SkipPartition
        );
        assert_eq!(OracleErrorPolicy::Abort.to_string(), "abort");
    }
}
