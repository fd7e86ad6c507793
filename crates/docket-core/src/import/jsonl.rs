//! JSON Lines ticket exports.
//!
//! One JSON object per line. Lines that are not objects are recorded as
//! rejected rows and do not abort the load.

use std::collections::BTreeMap;
use std::io::BufRead;

use serde_json::Value;

use super::batch::{check_required_columns, BatchBuilder, TicketBatch};
use crate::error::DocketResult;

/// Load tickets from JSON Lines.
///
/// Columns are the union of keys across all lines, in first-seen order.
/// Numbers and booleans are kept as their JSON text; `null` is an empty cell.
pub fn load_jsonl<R: BufRead>(reader: R) -> DocketResult<TicketBatch> {
    let mut columns: Vec<String> = Vec::new();
    let mut rows: Vec<(usize, Result<BTreeMap<String, String>, String>)> = Vec::new();

    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let parsed = match serde_json::from_str::<Value>(line) {
            Ok(Value::Object(map)) => {
                for key in map.keys() {
                    if !columns.iter().any(|c| c == key) {
                        columns.push(key.clone());
                    }
                }
                Ok(map
                    .into_iter()
                    .map(|(key, value)| (key, cell_text(value)))
                    .collect())
            }
            Ok(_) => Err(format!("Line {} is not a JSON object", n + 1)),
            Err(e) => Err(format!("Parse error at line {}: {}", n + 1, e)),
        };
        rows.push((n + 1, parsed));
    }

    check_required_columns(columns.iter().map(String::as_str))?;

    let mut builder = BatchBuilder::new(columns);
    for (line, row) in rows {
        match row {
            Ok(values) => builder.push_row(line, values),
            Err(reason) => {
                tracing::warn!(line, reason = %reason, "Rejected line");
                builder.push_unreadable(line, reason);
            }
        }
    }

    Ok(builder.finish())
}

fn cell_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DocketError;

    #[test]
    fn test_numeric_ids_become_strings() {
        let data = r#"{"ticket_id": 512, "summary": "Disk full", "customer_name": "Acme", "type": "Server", "sub_type": "Storage", "date_entered": "2024-05-01T09:00:00Z", "priority": 2}
{"ticket_id": 513, "summary": "Disk full on SQL01", "customer_name": null, "type": "Server", "sub_type": "Storage", "date_entered": "2024-05-01T09:01:00Z"}
"#;
        let batch = load_jsonl(data.as_bytes()).unwrap();

        assert_eq!(batch.tickets.len(), 2);
        assert_eq!(batch.tickets[0].ticket_id, "512");
        assert_eq!(batch.tickets[0].extra.get("priority").map(String::as_str), Some("2"));
        assert_eq!(batch.tickets[1].customer_name, "");
    }

    #[test]
    fn test_columns_keep_first_seen_order() {
        let data = r#"{"ticket_id": "1", "zone": "EU", "summary": "x", "customer_name": "c", "type": "t", "sub_type": "s", "date_entered": "2024-05-01"}
{"ticket_id": "2", "summary": "y", "customer_name": "c", "type": "t", "sub_type": "s", "date_entered": "2024-05-01", "agent": "kim"}
"#;
        let batch = load_jsonl(data.as_bytes()).unwrap();
        assert_eq!(
            batch.columns,
            vec![
                "ticket_id",
                "zone",
                "summary",
                "customer_name",
                "type",
                "sub_type",
                "date_entered",
                "agent"
            ]
        );
        assert_eq!(batch.extra_columns(), vec!["zone", "agent"]);
    }

    #[test]
    fn test_bad_lines_are_rejected_not_fatal() {
        let data = r#"{"ticket_id": "a", "summary": "x", "customer_name": "c", "type": "t", "sub_type": "s", "date_entered": "2024-05-01"}
not json
[1, 2]
"#;
        let batch = load_jsonl(data.as_bytes()).unwrap();

        assert_eq!(batch.tickets.len(), 1);
        assert_eq!(batch.report.total_rows, 3);
        let rows: Vec<_> = batch.report.rejected.iter().map(|r| r.row).collect();
        assert_eq!(rows, vec![2, 3]);
    }

    #[test]
    fn test_missing_column_across_all_lines() {
        let data = r#"{"ticket_id": "a", "summary": "x", "type": "t", "sub_type": "s", "date_entered": "2024-05-01"}"#;
        let err = load_jsonl(data.as_bytes()).unwrap_err();
        assert!(matches!(err, DocketError::MalformedInput { .. }));
    }
}
