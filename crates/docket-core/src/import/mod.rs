//! Loading ticket exports.
//!
//! Supports CSV with a header row and JSON Lines. Both formats share the same
//! rules: a required column missing from the whole export is fatal, an empty
//! cell is an empty string, and a row with an unreadable `date_entered` is
//! left out and listed in the [`LoadReport`].
//!
//! # Example
//!
//! ```ignore
//! use docket_core::import::load_path;
//!
//! let batch = load_path("tickets.csv")?;
//! println!("Loaded {}/{}", batch.report.loaded, batch.report.total_rows);
//! ```

mod batch;
pub mod csv;
pub mod jsonl;
mod timestamp;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub use batch::{LoadReport, RejectedRow, TicketBatch};
pub use self::csv::load_csv;
pub use jsonl::load_jsonl;
pub use timestamp::parse_timestamp;

use crate::error::{DocketError, DocketResult};

/// Load an export, choosing the format from the file extension.
pub fn load_path(path: impl AsRef<Path>) -> DocketResult<TicketBatch> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let file = File::open(path)?;
    match ext.as_deref() {
        Some("csv") => load_csv(BufReader::new(file)),
        Some("jsonl" | "ndjson") => load_jsonl(BufReader::new(file)),
        _ => Err(DocketError::validation_with_suggestion(
            format!("Unsupported export format: {}", path.display()),
            "Use a .csv or .jsonl file",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_path_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".CSV").tempfile().unwrap();
        writeln!(file, "ticket_id,summary,customer_name,type,sub_type,date_entered").unwrap();
        writeln!(file, "1,Mail down,Acme,Email,Outage,2024-05-01 09:00:00").unwrap();

        let batch = load_path(file.path()).unwrap();
        assert_eq!(batch.tickets.len(), 1);
    }

    #[test]
    fn test_load_path_rejects_unknown_extension() {
        let file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        assert!(matches!(
            load_path(file.path()),
            Err(DocketError::Validation { .. })
        ));
    }
}
