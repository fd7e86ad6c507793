//! Loaded batches and the row-to-ticket conversion shared by all formats.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::timestamp::parse_timestamp;
use crate::error::{DocketError, DocketResult};
use crate::types::{Ticket, REQUIRED_COLUMNS};

/// A row that was read but could not become a ticket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectedRow {
    /// 1-based data row (CSV) or line (JSON Lines).
    pub row: usize,
    /// Ticket id, when the row had one.
    pub ticket_id: Option<String>,
    pub reason: String,
}

/// Statistics from a load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadReport {
    /// Data rows read.
    pub total_rows: usize,
    /// Rows that became tickets.
    pub loaded: usize,
    /// Rows left out, with the reason.
    pub rejected: Vec<RejectedRow>,
}

impl LoadReport {
    /// Check if every row was loaded.
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Tickets read from one export.
#[derive(Debug, Clone, Default)]
pub struct TicketBatch {
    /// Column names in source order.
    pub columns: Vec<String>,
    /// Tickets in source order.
    pub tickets: Vec<Ticket>,
    pub report: LoadReport,
}

impl TicketBatch {
    /// Find a ticket by id.
    pub fn get(&self, ticket_id: &str) -> Option<&Ticket> {
        self.tickets.iter().find(|t| t.ticket_id == ticket_id)
    }

    /// Columns outside the required set, in source order.
    pub fn extra_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .map(String::as_str)
            .filter(|c| !REQUIRED_COLUMNS.contains(c))
            .collect()
    }
}

/// Fail with `MalformedInput` unless every required column is present.
pub(crate) fn check_required_columns<'a, I>(columns: I) -> DocketResult<()>
where
    I: IntoIterator<Item = &'a str> + Clone,
{
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|required| !columns.clone().into_iter().any(|c| c == *required))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DocketError::malformed_input(missing))
    }
}

/// Accumulates rows into a [`TicketBatch`].
#[derive(Debug, Default)]
pub(crate) struct BatchBuilder {
    batch: TicketBatch,
}

impl BatchBuilder {
    pub(crate) fn new(columns: Vec<String>) -> Self {
        Self {
            batch: TicketBatch {
                columns,
                ..Default::default()
            },
        }
    }

    /// Convert one row of column values into a ticket.
    ///
    /// Missing grouping or summary cells become empty strings. A row whose
    /// `date_entered` cannot be parsed is rejected.
    pub(crate) fn push_row(&mut self, row: usize, mut values: BTreeMap<String, String>) {
        self.batch.report.total_rows += 1;

        let mut take = |column: &str| values.remove(column).unwrap_or_default();
        let ticket_id = take("ticket_id").trim().to_string();
        let summary = take("summary");
        let customer_name = take("customer_name");
        let ticket_type = take("type");
        let sub_type = take("sub_type");
        let raw_date = take("date_entered");

        let Some(date_entered) = parse_timestamp(&raw_date) else {
            let reason = DocketError::unparseable_timestamp(&ticket_id, &raw_date).to_string();
            tracing::warn!(row, ticket_id = %ticket_id, value = %raw_date, "Rejected row");
            self.reject(row, Some(ticket_id), reason);
            return;
        };

        self.batch.tickets.push(Ticket {
            ticket_id,
            summary,
            customer_name,
            ticket_type,
            sub_type,
            date_entered,
            date_entered_text: Some(raw_date),
            extra: values,
        });
        self.batch.report.loaded += 1;
    }

    /// Record a row that could not be read into column values at all.
    pub(crate) fn push_unreadable(&mut self, row: usize, reason: String) {
        self.batch.report.total_rows += 1;
        self.reject(row, None, reason);
    }

    fn reject(&mut self, row: usize, ticket_id: Option<String>, reason: String) {
        self.batch.report.rejected.push(RejectedRow {
            row,
            ticket_id: ticket_id.filter(|id| !id.is_empty()),
            reason,
        });
    }

    pub(crate) fn finish(self) -> TicketBatch {
        self.batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_check_required_columns_reports_all_missing() {
        let err = check_required_columns(["ticket_id", "summary", "type"]).unwrap_err();
        match err {
            DocketError::MalformedInput { missing, .. } => {
                assert_eq!(missing, vec!["customer_name", "sub_type", "date_entered"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_push_row_keeps_extras_and_blanks() {
        let mut builder = BatchBuilder::new(vec![]);
        builder.push_row(
            1,
            row(&[
                ("ticket_id", " 101 "),
                ("summary", "Outlook crashes"),
                ("type", "Software"),
                ("date_entered", "2024-05-01 09:00:00"),
                ("board", "Service"),
            ]),
        );
        let batch = builder.finish();

        let ticket = &batch.tickets[0];
        assert_eq!(ticket.ticket_id, "101");
        assert_eq!(ticket.customer_name, "");
        assert_eq!(ticket.sub_type, "");
        assert_eq!(ticket.extra.get("board").map(String::as_str), Some("Service"));
        assert_eq!(ticket.date_entered_text.as_deref(), Some("2024-05-01 09:00:00"));
        assert!(batch.report.is_clean());
    }

    #[test]
    fn test_push_row_rejects_bad_timestamp() {
        let mut builder = BatchBuilder::new(vec![]);
        builder.push_row(3, row(&[("ticket_id", "9"), ("date_entered", "soon")]));
        let batch = builder.finish();

        assert!(batch.tickets.is_empty());
        assert_eq!(batch.report.total_rows, 1);
        assert_eq!(batch.report.rejected[0].row, 3);
        assert_eq!(batch.report.rejected[0].ticket_id.as_deref(), Some("9"));
        assert!(batch.report.rejected[0].reason.contains("soon"));
    }
}
