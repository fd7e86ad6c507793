//! Partitioning and the per-partition running-parent fold.

use std::collections::BTreeMap;

use tracing::debug;

use super::window::Member;
use crate::error::{DocketError, DocketResult};
use crate::traits::SimilarityOracle;
use crate::types::GroupKey;

/// A child attributed to a parent, by input index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub child: usize,
    pub parent: usize,
    pub score: f32,
}

/// Result of resolving one partition.
#[derive(Debug, Default)]
pub struct PartitionResult {
    /// Input indices of the partition's parents.
    pub parents: Vec<usize>,
    /// Child-to-parent links found in the partition.
    pub links: Vec<Link>,
    /// Oracle calls made.
    pub oracle_calls: usize,
}

/// Group members by `(customer_name, type, sub_type)`.
///
/// Each group is sorted ascending by `date_entered`; the sort is stable, so
/// ties keep input order. Groups come back in key order.
pub fn partition<'a>(members: &[Member<'a>]) -> BTreeMap<GroupKey, Vec<Member<'a>>> {
    let mut groups: BTreeMap<GroupKey, Vec<Member<'a>>> = BTreeMap::new();
    for member in members {
        groups
            .entry(member.ticket.group_key())
            .or_default()
            .push(*member);
    }

    for group in groups.values_mut() {
        group.sort_by_key(|m| m.ticket.date_entered);
    }

    groups
}

/// Resolve parents and children for one time-ordered partition.
///
/// The earliest ticket is the running parent. Each later ticket is compared
/// against the running parent only: a duplicate becomes its child, anything
/// else becomes a parent and takes over as the running parent.
pub async fn resolve_partition(
    key: &GroupKey,
    members: &[Member<'_>],
    oracle: &dyn SimilarityOracle,
    threshold: f32,
) -> DocketResult<PartitionResult> {
    let mut result = PartitionResult::default();

    let Some((first, rest)) = members.split_first() else {
        return Ok(result);
    };

    let mut running_parent = *first;
    result.parents.push(first.index);

    for candidate in rest {
        let verdict = oracle
            .compare(
                &running_parent.ticket.summary,
                &candidate.ticket.summary,
                threshold,
            )
            .await
            .map_err(|e| {
                DocketError::oracle_call(
                    key.to_string(),
                    &running_parent.ticket.ticket_id,
                    &candidate.ticket.ticket_id,
                    e,
                )
            })?;
        result.oracle_calls += 1;

        if verdict.is_duplicate {
            debug!(
                partition = %key,
                child = %candidate.ticket.ticket_id,
                parent = %running_parent.ticket.ticket_id,
                score = verdict.score,
                "Linked duplicate"
            );
            result.links.push(Link {
                child: candidate.index,
                parent: running_parent.index,
                score: verdict.score,
            });
        } else {
            debug!(
                partition = %key,
                ticket = %candidate.ticket.ticket_id,
                score = verdict.score,
                "Promoted to parent"
            );
            result.parents.push(candidate.index);
            running_parent = *candidate;
        }
    }

    Ok(result)
}
