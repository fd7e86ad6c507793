//! CSV ticket exports.

use std::collections::BTreeMap;
use std::io::Read;

use super::batch::{check_required_columns, BatchBuilder, TicketBatch};
use crate::error::DocketResult;

/// Load tickets from a CSV export with a header row.
///
/// Short rows are padded with empty cells. Fails with `MalformedInput` when
/// the header lacks a required column, before any row is read.
pub fn load_csv<R: Read>(reader: R) -> DocketResult<TicketBatch> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    check_required_columns(columns.iter().map(String::as_str))?;

    let mut builder = BatchBuilder::new(columns.clone());
    for (n, record) in reader.records().enumerate() {
        let record = record?;
        let values: BTreeMap<String, String> = columns
            .iter()
            .cloned()
            .zip(record.iter().map(str::to_string).chain(std::iter::repeat(String::new())))
            .collect();
        builder.push_row(n + 1, values);
    }

    let batch = builder.finish();
    tracing::debug!(
        rows = batch.report.total_rows,
        loaded = batch.report.loaded,
        rejected = batch.report.rejected.len(),
        "Loaded CSV export"
    );
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DocketError;

    #[test]
    fn test_load_csv_reads_tickets_in_order() {
        let data = "\
ticket_id,summary,customer_name,type,sub_type,date_entered,board
1001,VPN down,Acme,Network,Outage,2024-05-01 09:00:00,Service
1002,\"VPN down, again\",Acme,Network,Outage,2024-05-01 09:02:00,Service
";
        let batch = load_csv(data.as_bytes()).unwrap();

        assert_eq!(batch.tickets.len(), 2);
        assert_eq!(batch.tickets[1].summary, "VPN down, again");
        assert_eq!(batch.extra_columns(), vec!["board"]);
        assert_eq!(batch.get("1001").unwrap().ticket_type, "Network");
    }

    #[test]
    fn test_missing_column_is_malformed_input() {
        let data = "ticket_id,summary,customer_name,type,date_entered\n1,a,b,c,2024-05-01\n";
        let err = load_csv(data.as_bytes()).unwrap_err();
        assert!(matches!(err, DocketError::MalformedInput { ref missing, .. } if missing == &["sub_type"]));
    }

    #[test]
    fn test_short_rows_and_bad_dates() {
        let data = "\
ticket_id,summary,customer_name,type,sub_type,date_entered
1,Printer jam,Acme,Hardware,Printer,2024-05-01 09:00:00
2,Printer jam,Acme,Hardware,Printer,not a date
3,Short row
";
        let batch = load_csv(data.as_bytes()).unwrap();

        assert_eq!(batch.tickets.len(), 1);
        assert_eq!(batch.report.total_rows, 3);
        assert_eq!(batch.report.rejected.len(), 2);
        assert_eq!(batch.report.rejected[0].row, 2);
    }

    #[test]
    fn test_empty_input_is_malformed() {
        assert!(matches!(
            load_csv("".as_bytes()),
            Err(DocketError::MalformedInput { .. })
        ));
    }
}
