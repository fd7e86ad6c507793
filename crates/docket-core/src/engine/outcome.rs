//! Result types returned by the grouping engine.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{GroupKey, Ticket};

/// A child ticket and the parent it was attributed to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateLink {
    pub child_id: String,
    pub parent_id: String,
    /// Oracle score for the pair.
    pub score: f32,
}

/// A partition that was dropped after an oracle failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartitionFailure {
    pub key: GroupKey,
    /// Tickets of the partition, none of which appear in the outputs.
    pub ticket_ids: Vec<String>,
    /// Rendered error.
    pub error: String,
}

/// Counters for a single run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupStats {
    /// Tickets in the input batch.
    pub total: usize,
    /// Tickets inside the window.
    pub windowed: usize,
    /// Tickets older than the window.
    pub excluded: usize,
    /// Partitions formed from the windowed tickets.
    pub partitions: usize,
    /// Oracle calls made.
    pub oracle_calls: usize,
    /// Parent tickets emitted.
    pub parents: usize,
    /// Child tickets mapped to a parent.
    pub children: usize,
}

/// Deduplicated tickets plus the child-to-parent mapping.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DedupOutcome {
    /// Newest `date_entered` in the batch, which the window is measured from.
    pub window_anchor: Option<DateTime<Utc>>,
    /// Parent tickets, in input order.
    pub parents: Vec<Ticket>,
    /// Child-to-parent links, ordered by the child's input position.
    pub links: Vec<DuplicateLink>,
    /// Tickets outside the window; neither parents nor children.
    pub excluded: Vec<Ticket>,
    /// Partitions skipped because the oracle failed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_partitions: Vec<PartitionFailure>,
    pub stats: DedupStats,
}

impl DedupOutcome {
    /// Child id to parent id.
    pub fn mapping(&self) -> HashMap<&str, &str> {
        self.links
            .iter()
            .map(|l| (l.child_id.as_str(), l.parent_id.as_str()))
            .collect()
    }

    /// Ids of the parent tickets, in input order.
    pub fn parent_ids(&self) -> Vec<&str> {
        self.parents.iter().map(|t| t.ticket_id.as_str()).collect()
    }

    /// Parent id for a child, if the ticket was mapped.
    pub fn parent_of(&self, child_id: &str) -> Option<&str> {
        self.links
            .iter()
            .find(|l| l.child_id == child_id)
            .map(|l| l.parent_id.as_str())
    }

    /// True when at least one child was mapped to a parent.
    pub fn has_duplicates(&self) -> bool {
        !self.links.is_empty()
    }
}
