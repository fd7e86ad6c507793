//! Rendering of dedup results and ticket previews.

use std::collections::BTreeMap;
use std::fmt::Write;

use anyhow::Result;
use docket_core::oracle::OracleAnswer;
use docket_core::{DedupOutcome, Ticket, TicketBatch};

use crate::cli::OutputFormat;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const NO_DUPLICATES: &str = "No duplicates detected in the selected time window.";

/// Render a dedup outcome in the requested format.
pub fn render_outcome(outcome: &DedupOutcome, columns: &[String], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(outcome)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(outcome)? + "\n"),
        OutputFormat::Csv => render_csv(outcome, columns),
    }
}

fn render_text(outcome: &DedupOutcome) -> String {
    let mut out = String::new();

    if let Some(anchor) = outcome.window_anchor {
        let _ = writeln!(out, "Window anchored at {}", anchor.format(TIMESTAMP_FORMAT));
    }

    let _ = writeln!(out, "Parent tickets ({}):", outcome.parents.len());
    for ticket in &outcome.parents {
        let _ = writeln!(out, "  {}", ticket_line(ticket));
    }
    out.push('\n');

    if outcome.has_duplicates() {
        let _ = writeln!(out, "Duplicates ({}):", outcome.links.len());
        for link in &outcome.links {
            let _ = writeln!(
                out,
                "  {} -> {} (score {:.2})",
                link.child_id, link.parent_id, link.score
            );
        }
    } else {
        let _ = writeln!(out, "{}", NO_DUPLICATES);
    }

    if !outcome.excluded.is_empty() {
        let _ = writeln!(
            out,
            "\n{} ticket(s) outside the time window were not considered.",
            outcome.excluded.len()
        );
    }

    for failure in &outcome.failed_partitions {
        let _ = writeln!(
            out,
            "\nSkipped group {} ({} tickets): {}",
            failure.key,
            failure.ticket_ids.len(),
            failure.error
        );
    }

    let stats = &outcome.stats;
    let _ = writeln!(
        out,
        "\n{} tickets, {} in window, {} groups, {} oracle calls",
        stats.total, stats.windowed, stats.partitions, stats.oracle_calls
    );
    out
}

/// Parent rows in the export's column layout, plus a `duplicate_ids`
/// column holding the children of each parent separated by `;`.
/// `date_entered` is written back as it appeared in the export.
fn render_csv(outcome: &DedupOutcome, columns: &[String]) -> Result<String> {
    let mut children: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for link in &outcome.links {
        children
            .entry(link.parent_id.as_str())
            .or_default()
            .push(link.child_id.as_str());
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    let mut header: Vec<&str> = columns.iter().map(String::as_str).collect();
    header.push("duplicate_ids");
    writer.write_record(&header)?;

    for ticket in &outcome.parents {
        let mut record: Vec<String> = columns.iter().map(|c| cell(ticket, c)).collect();
        record.push(
            children
                .get(ticket.ticket_id.as_str())
                .map(|ids| ids.join(";"))
                .unwrap_or_default(),
        );
        writer.write_record(&record)?;
    }

    Ok(String::from_utf8(writer.into_inner()?)?)
}

/// Value of a named column for a ticket.
fn cell(ticket: &Ticket, column: &str) -> String {
    match column {
        "ticket_id" => ticket.ticket_id.clone(),
        "summary" => ticket.summary.clone(),
        "customer_name" => ticket.customer_name.clone(),
        "type" => ticket.ticket_type.clone(),
        "sub_type" => ticket.sub_type.clone(),
        "date_entered" => ticket
            .date_entered_text
            .clone()
            .unwrap_or_else(|| ticket.date_entered.format(TIMESTAMP_FORMAT).to_string()),
        other => ticket.extra.get(other).cloned().unwrap_or_default(),
    }
}

fn ticket_line(ticket: &Ticket) -> String {
    format!(
        "{:<10} {}  {:<40} {}",
        ticket.ticket_id,
        ticket.date_entered.format(TIMESTAMP_FORMAT),
        ticket.group_key().to_string(),
        ticket.summary
    )
}

/// Preview of a loaded export.
pub fn render_batch(batch: &TicketBatch, limit: usize) -> String {
    let mut out = String::new();
    let report = &batch.report;

    let _ = writeln!(out, "Columns: {}", batch.columns.join(", "));
    let _ = writeln!(
        out,
        "Rows: {} read, {} loaded, {} rejected\n",
        report.total_rows,
        report.loaded,
        report.rejected.len()
    );

    for ticket in batch.tickets.iter().take(limit) {
        let _ = writeln!(out, "  {}", ticket_line(ticket));
    }
    if batch.tickets.len() > limit {
        let _ = writeln!(out, "  ... {} more", batch.tickets.len() - limit);
    }

    if !report.is_clean() {
        let _ = writeln!(out, "\nRejected rows:");
        for row in &report.rejected {
            let id = row.ticket_id.as_deref().unwrap_or("-");
            let _ = writeln!(out, "  row {} ({}): {}", row.row, id, row.reason);
        }
    }
    out
}

/// Result of a single `compare` call.
pub fn render_comparison(a: &Ticket, b: &Ticket, answer: &OracleAnswer, threshold: f32) -> String {
    let mut out = String::new();
    let verdict = answer.assessment.verdict(threshold);

    let _ = writeln!(out, "A: {}", ticket_line(a));
    let _ = writeln!(out, "B: {}", ticket_line(b));
    if a.group_key() != b.group_key() {
        let _ = writeln!(
            out,
            "note: the tickets are in different groups, so dedup never compares them"
        );
    }
    let _ = writeln!(
        out,
        "\nVerdict: {} (score {:.2}, threshold {:.2})",
        if verdict.is_duplicate { "duplicate" } else { "distinct" },
        verdict.score,
        threshold
    );
    let _ = writeln!(out, "Oracle answer: {}", answer.raw);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use docket_core::oracle::parse_assessment;
    use docket_core::{DedupStats, DuplicateLink};

    fn ticket(id: &str, summary: &str) -> Ticket {
        Ticket::new(id, summary, Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap())
            .with_customer("Acme")
            .with_category("Network", "Outage")
            .with_extra("status", "New")
    }

    fn outcome_with_link() -> DedupOutcome {
        DedupOutcome {
            window_anchor: Some(Utc.with_ymd_and_hms(2024, 5, 1, 9, 5, 0).unwrap()),
            parents: vec![ticket("t0", "VPN down, users locked out"), ticket("t2", "Switch rebooting")],
            links: vec![DuplicateLink {
                child_id: "t1".to_string(),
                parent_id: "t0".to_string(),
                score: 0.9,
            }],
            stats: DedupStats {
                total: 3,
                windowed: 3,
                partitions: 1,
                oracle_calls: 2,
                parents: 2,
                children: 1,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_text_lists_links() {
        let text = render_text(&outcome_with_link());
        assert!(text.contains("Parent tickets (2):"));
        assert!(text.contains("t1 -> t0 (score 0.90)"));
        assert!(!text.contains(NO_DUPLICATES));
    }

    #[test]
    fn test_text_without_duplicates() {
        let mut outcome = outcome_with_link();
        outcome.links.clear();
        let text = render_text(&outcome);
        assert!(text.contains(NO_DUPLICATES));
    }

    #[test]
    fn test_csv_keeps_column_layout() {
        let columns: Vec<String> = [
            "ticket_id",
            "summary",
            "customer_name",
            "type",
            "sub_type",
            "date_entered",
            "status",
        ]
        .iter()
        .map(|c| c.to_string())
        .collect();

        let csv = render_csv(&outcome_with_link(), &columns).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "ticket_id,summary,customer_name,type,sub_type,date_entered,status,duplicate_ids"
        );
        assert_eq!(
            lines[1],
            "t0,\"VPN down, users locked out\",Acme,Network,Outage,2024-05-01 09:00:00,New,t1"
        );
        assert_eq!(lines[2], "t2,Switch rebooting,Acme,Network,Outage,2024-05-01 09:00:00,New,");
    }

    #[test]
    fn test_csv_writes_source_date_text() {
        let mut outcome = outcome_with_link();
        outcome.parents[0].date_entered_text = Some("2024-05-01T11:00:00.250+02:00".to_string());
        let columns = vec!["ticket_id".to_string(), "date_entered".to_string()];

        let csv = render_csv(&outcome, &columns).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[1], "t0,2024-05-01T11:00:00.250+02:00,t1");
        assert_eq!(lines[2], "t2,2024-05-01 09:00:00,");
    }

    #[test]
    fn test_json_is_the_serialized_outcome() {
        let json = render_outcome(&outcome_with_link(), &[], OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["links"][0]["child_id"], "t1");
        assert_eq!(value["parents"][0]["type"], "Network");
        assert_eq!(value["stats"]["oracle_calls"], 2);
    }

    #[test]
    fn test_comparison_shows_raw_answer() {
        let answer = OracleAnswer {
            assessment: parse_assessment("YES, same outage. 0.88"),
            raw: "YES, same outage. 0.88".to_string(),
        };
        let text = render_comparison(&ticket("a", "VPN down"), &ticket("b", "VPN is down"), &answer, 0.75);
        assert!(text.contains("Verdict: duplicate (score 0.88, threshold 0.75)"));
        assert!(text.contains("Oracle answer: YES, same outage. 0.88"));
        assert!(!text.contains("different groups"));
    }
}
