//! Duplicate-grouping engine.

use std::collections::HashSet;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use super::config::{DedupConfig, OracleErrorPolicy};
use super::outcome::{DedupOutcome, DedupStats, DuplicateLink, PartitionFailure};
use super::partition::{partition, resolve_partition, Link};
use super::window::split_window;
use crate::error::{DocketError, DocketResult};
use crate::traits::SimilarityOracle;
use crate::types::Ticket;

/// Groups a ticket batch into parents and children using a similarity oracle.
///
/// The detector holds no per-run state; every call to [`detect`] works only
/// from the batch it is given.
///
/// [`detect`]: DuplicateDetector::detect
pub struct DuplicateDetector {
    oracle: Arc<dyn SimilarityOracle>,
    config: DedupConfig,
}

impl DuplicateDetector {
    /// Create a detector over an already-constructed oracle.
    pub fn new(oracle: Arc<dyn SimilarityOracle>, config: DedupConfig) -> DocketResult<Self> {
        config
            .validate()
            .map_err(|e| DocketError::Configuration(e.to_string()))?;
        Ok(Self { oracle, config })
    }

    /// Create a detector with the default window and threshold.
    pub fn with_defaults(oracle: Arc<dyn SimilarityOracle>) -> Self {
        Self {
            oracle,
            config: DedupConfig::default(),
        }
    }

    /// Get the engine configuration.
    pub fn config(&self) -> &DedupConfig {
        &self.config
    }

    /// Detect duplicates in `tickets`.
    pub async fn detect(&self, tickets: &[Ticket]) -> DocketResult<DedupOutcome> {
        group_tickets(self.oracle.as_ref(), tickets, &self.config).await
    }
}

/// Detect duplicates with an explicit window and threshold.
///
/// Partitions run one after another and any oracle failure aborts the run.
pub async fn detect_duplicates(
    oracle: &dyn SimilarityOracle,
    tickets: &[Ticket],
    time_window: chrono::Duration,
    similarity_threshold: f32,
) -> DocketResult<DedupOutcome> {
    let config = DedupConfig {
        time_window_minutes: time_window.num_minutes(),
        similarity_threshold,
        ..Default::default()
    };
    run(oracle, tickets, time_window, &config).await
}

async fn group_tickets(
    oracle: &dyn SimilarityOracle,
    tickets: &[Ticket],
    config: &DedupConfig,
) -> DocketResult<DedupOutcome> {
    run(oracle, tickets, config.time_window(), config).await
}

async fn run(
    oracle: &dyn SimilarityOracle,
    tickets: &[Ticket],
    time_window: chrono::Duration,
    config: &DedupConfig,
) -> DocketResult<DedupOutcome> {
    if !(0.0..=1.0).contains(&config.similarity_threshold) {
        return Err(DocketError::Configuration(
            "similarity_threshold must be between 0.0 and 1.0".to_string(),
        ));
    }
    if time_window <= chrono::Duration::zero() {
        return Err(DocketError::Configuration(
            "time window must be positive".to_string(),
        ));
    }
    ensure_unique_ids(tickets)?;

    let windowed = split_window(tickets, time_window);
    let groups = partition(&windowed.recent);

    info!(
        total = tickets.len(),
        windowed = windowed.recent.len(),
        partitions = groups.len(),
        threshold = config.similarity_threshold,
        "Detecting duplicates"
    );

    let threshold = config.similarity_threshold;
    let mut resolved = stream::iter(groups.iter())
        .map(|(key, members)| async move {
            let result = resolve_partition(key, members, oracle, threshold).await;
            (key, members, result)
        })
        .buffered(config.max_concurrent_partitions.max(1));

    let mut parent_indices: HashSet<usize> = HashSet::new();
    let mut links: Vec<Link> = Vec::new();
    let mut failed_partitions = Vec::new();
    let mut oracle_calls = 0;

    while let Some((key, members, result)) = resolved.next().await {
        match result {
            Ok(partition) => {
                debug!(
                    partition = %key,
                    members = members.len(),
                    parents = partition.parents.len(),
                    children = partition.links.len(),
                    "Partition resolved"
                );
                oracle_calls += partition.oracle_calls;
                parent_indices.extend(partition.parents);
                links.extend(partition.links);
            }
            Err(e) => match config.on_oracle_error {
                OracleErrorPolicy::Abort => return Err(e),
                OracleErrorPolicy::SkipPartition => {
                    warn!(partition = %key, error = %e, "Skipping partition after oracle failure");
                    failed_partitions.push(PartitionFailure {
                        key: key.clone(),
                        ticket_ids: members.iter().map(|m| m.ticket.ticket_id.clone()).collect(),
                        error: e.to_string(),
                    });
                }
            },
        }
    }
    drop(resolved);

    links.sort_by_key(|l| l.child);
    let links: Vec<DuplicateLink> = links
        .into_iter()
        .map(|l| DuplicateLink {
            child_id: tickets[l.child].ticket_id.clone(),
            parent_id: tickets[l.parent].ticket_id.clone(),
            score: l.score,
        })
        .collect();

    let parents: Vec<Ticket> = tickets
        .iter()
        .enumerate()
        .filter(|(i, _)| parent_indices.contains(i))
        .map(|(_, t)| t.clone())
        .collect();
    let excluded: Vec<Ticket> = windowed
        .excluded
        .iter()
        .map(|&i| tickets[i].clone())
        .collect();

    let stats = DedupStats {
        total: tickets.len(),
        windowed: windowed.recent.len(),
        excluded: excluded.len(),
        partitions: groups.len(),
        oracle_calls,
        parents: parents.len(),
        children: links.len(),
    };

    info!(
        parents = stats.parents,
        children = stats.children,
        excluded = stats.excluded,
        oracle_calls = stats.oracle_calls,
        failed_partitions = failed_partitions.len(),
        "Duplicate detection complete"
    );

    Ok(DedupOutcome {
        window_anchor: windowed.anchor,
        parents,
        links,
        excluded,
        failed_partitions,
        stats,
    })
}

fn ensure_unique_ids(tickets: &[Ticket]) -> DocketResult<()> {
    let mut seen = HashSet::with_capacity(tickets.len());
    for ticket in tickets {
        if !seen.insert(ticket.ticket_id.as_str()) {
            return Err(DocketError::duplicate_ticket_id(&ticket.ticket_id));
        }
    }
    Ok(())
}
