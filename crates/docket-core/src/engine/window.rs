//! Time window anchored to the newest ticket in a batch.

use chrono::{DateTime, Duration, Utc};

use crate::types::Ticket;

/// A ticket together with its position in the input batch.
#[derive(Debug, Clone, Copy)]
pub struct Member<'a> {
    pub index: usize,
    pub ticket: &'a Ticket,
}

/// A batch split by the trailing window.
#[derive(Debug)]
pub struct Windowed<'a> {
    /// Latest `date_entered` in the batch; `None` for an empty batch.
    pub anchor: Option<DateTime<Utc>>,
    /// Tickets with `date_entered >= anchor - window`, in input order.
    pub recent: Vec<Member<'a>>,
    /// Input indices of tickets older than the window.
    pub excluded: Vec<usize>,
}

/// Split `tickets` into the recent slice and the excluded remainder.
///
/// The anchor is the batch maximum, not wall-clock time, so the same batch
/// always yields the same split.
pub fn split_window(tickets: &[Ticket], window: Duration) -> Windowed<'_> {
    let anchor = tickets.iter().map(|t| t.date_entered).max();

    let Some(now) = anchor else {
        return Windowed {
            anchor: None,
            recent: Vec::new(),
            excluded: Vec::new(),
        };
    };

    // A window reaching past the earliest representable instant covers everything.
    let cutoff = now.checked_sub_signed(window);
    let mut recent = Vec::with_capacity(tickets.len());
    let mut excluded = Vec::new();

    for (index, ticket) in tickets.iter().enumerate() {
        if cutoff.map_or(true, |cutoff| ticket.date_entered >= cutoff) {
            recent.push(Member { index, ticket });
        } else {
            excluded.push(index);
        }
    }

    Windowed {
        anchor,
        recent,
        excluded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ticket(id: &str, minute: u32) -> Ticket {
        Ticket::new(id, "summary", Utc.with_ymd_and_hms(2024, 5, 1, 9, minute, 0).unwrap())
    }

    #[test]
    fn test_anchor_is_batch_maximum() {
        let tickets = vec![ticket("a", 20), ticket("b", 45), ticket("c", 30)];
        let windowed = split_window(&tickets, Duration::minutes(10));

        assert_eq!(windowed.anchor, Some(tickets[1].date_entered));
        let ids: Vec<_> = windowed.recent.iter().map(|m| m.ticket.ticket_id.as_str()).collect();
        assert_eq!(ids, vec!["b"]);
        assert_eq!(windowed.excluded, vec![0, 2]);
    }

    #[test]
    fn test_cutoff_is_inclusive() {
        let tickets = vec![ticket("a", 0), ticket("b", 10)];
        let windowed = split_window(&tickets, Duration::minutes(10));
        assert_eq!(windowed.recent.len(), 2);
        assert!(windowed.excluded.is_empty());
    }

    #[test]
    fn test_oversized_window_keeps_everything() {
        let tickets = vec![
            Ticket::new("ancient", "summary", Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap()),
            ticket("b", 10),
        ];
        let windowed = split_window(&tickets, Duration::MAX);
        assert_eq!(windowed.recent.len(), 2);
        assert!(windowed.excluded.is_empty());
    }

    #[test]
    fn test_empty_batch() {
        let windowed = split_window(&[], Duration::minutes(10));
        assert!(windowed.anchor.is_none());
        assert!(windowed.recent.is_empty());
    }
}
