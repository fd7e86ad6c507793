//! Ticket record and grouping key types.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Columns every ticket export must provide.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "ticket_id",
    "summary",
    "customer_name",
    "type",
    "sub_type",
    "date_entered",
];

/// A support ticket from an export.
///
/// Tickets are immutable inputs: the engine classifies them as parents or
/// children but never changes their fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    /// Opaque identifier, unique within a batch.
    pub ticket_id: String,
    /// Free-text summary compared by the similarity oracle.
    pub summary: String,
    /// Customer the ticket was raised for.
    pub customer_name: String,
    /// Ticket category (the `type` column).
    #[serde(rename = "type")]
    pub ticket_type: String,
    /// Ticket sub-category.
    pub sub_type: String,
    /// When the ticket was entered.
    pub date_entered: DateTime<Utc>,
    /// The `date_entered` cell as it appeared in the export, if loaded from one.
    #[serde(skip)]
    pub date_entered_text: Option<String>,
    /// Columns outside the required set, carried through unchanged.
    #[serde(flatten, default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl Ticket {
    /// Create a ticket with empty grouping fields.
    pub fn new(
        ticket_id: impl Into<String>,
        summary: impl Into<String>,
        date_entered: DateTime<Utc>,
    ) -> Self {
        Self {
            ticket_id: ticket_id.into(),
            summary: summary.into(),
            customer_name: String::new(),
            ticket_type: String::new(),
            sub_type: String::new(),
            date_entered,
            date_entered_text: None,
            extra: BTreeMap::new(),
        }
    }

    /// Set the customer name.
    pub fn with_customer(mut self, customer_name: impl Into<String>) -> Self {
        self.customer_name = customer_name.into();
        self
    }

    /// Set the type and sub-type.
    pub fn with_category(
        mut self,
        ticket_type: impl Into<String>,
        sub_type: impl Into<String>,
    ) -> Self {
        self.ticket_type = ticket_type.into();
        self.sub_type = sub_type.into();
        self
    }

    /// Attach an extra column value.
    pub fn with_extra(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(column.into(), value.into());
        self
    }

    /// The composite key this ticket is partitioned by.
    pub fn group_key(&self) -> GroupKey {
        GroupKey {
            customer_name: self.customer_name.clone(),
            ticket_type: self.ticket_type.clone(),
            sub_type: self.sub_type.clone(),
        }
    }
}

/// Composite partition key `(customer_name, type, sub_type)`.
///
/// Matching is exact: no case folding or trimming.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupKey {
    pub customer_name: String,
    #[serde(rename = "type")]
    pub ticket_type: String,
    pub sub_type: String,
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.customer_name, self.ticket_type, self.sub_type
        )
    }
}
