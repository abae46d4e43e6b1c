use crate::models::{ArtifactData, IssuerAuditSummary, RunData, RunIdentifier, StashIssuers};
use crate::pipeline::{PipelineReport, RunOutcome};
use crate::utils::formatting::{format_coverage_period, format_run_time, format_size, group_thousands};
use super::table::Table;

const NOT_AVAILABLE: &str = "n/a";

const RUN_COLUMNS: [&str; 9] = [
    "Run ID",
    "Run Time",
    "Filter",
    "Filter Layers",
    "Enrolled Issuers",
    "Stash",
    "Known Revoked",
    "Known Not Revoked",
    "Period Covered",
];

const SUMMARY_COLUMNS: [&str; 6] = [
    "Issuer",
    "Enrolled",
    "Number of Failed CRLs",
    "Number of Recovered CRLs",
    "Number of Updated CRLs",
    "Number of CRLs",
];

fn or_na<T>(value: Option<T>, f: impl FnOnce(T) -> String) -> String {
    value.map(f).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

pub fn format_stash(run: &RunData) -> String {
    match &run.stash {
        Some(stash) => {
            let issuers = match stash.issuers {
                StashIssuers::Counted(n) => group_thousands(n),
                StashIssuers::NotReported => NOT_AVAILABLE.to_string(),
            };
            format!("{} ({} issuers)", format_size(stash.size_bytes), issuers)
        }
        None => NOT_AVAILABLE.to_string(),
    }
}

pub fn run_row(run: &RunData) -> Vec<String> {
    vec![
        run.run_id.to_string(),
        format_run_time(&run.timestamp),
        format_size(run.filter_size_bytes),
        run.filter_layers.to_string(),
        or_na(run.enrolled_issuer_count(), |n| group_thousands(n as u64)),
        format_stash(run),
        or_na(run.known_revoked, group_thousands),
        or_na(run.known_not_revoked, group_thousands),
        or_na(run.coverage_period, format_coverage_period),
    ]
}

/// The "Recent Run Data" table, newest run first. Failed runs keep their row.
pub fn run_table(report: &PipelineReport) -> Table {
    let mut table = Table::new("Recent Run Data", &RUN_COLUMNS);
    for outcome in report.newest_first() {
        match outcome {
            RunOutcome::Complete(run) => table.add_row(run_row(run)),
            RunOutcome::Failed { run_id, error, .. } => {
                let mut row = vec![run_id.to_string()];
                row.resize(RUN_COLUMNS.len(), NOT_AVAILABLE.to_string());
                table.add_row(row);
                table.add_note(format!("{}: {}", run_id, error));
            }
        }
    }
    table
}

/// Per-issuer outcome counts for one run.
pub fn crl_summary_table(run: &RunData, summaries: &[IssuerAuditSummary]) -> Table {
    let mut table = Table::new(
        format!("{} CRL Audit Entries by Issuer/Status", run.run_id),
        &SUMMARY_COLUMNS,
    );
    for summary in summaries {
        table.add_row(vec![
            summary.issuer_subject.clone(),
            summary.enrollment.to_string(),
            summary.num_failed.to_string(),
            summary.num_recovered.to_string(),
            summary.num_updated.to_string(),
            summary.num_total.to_string(),
        ]);
    }
    match &run.audit_entries {
        ArtifactData::Missing => table.add_note(format!("{} published no CRL audit", run.run_id)),
        ArtifactData::Unreadable(reason) => {
            table.add_note(format!("{} CRL audit unavailable: {}", run.run_id, reason))
        }
        ArtifactData::Loaded(_) => {}
    }
    table
}

/// URL-level details for one issuer, or `None` when nothing is worth showing.
pub fn issuer_detail_table(summary: &IssuerAuditSummary, verbose: bool) -> Option<Table> {
    let mut table = Table::new(
        format!("{} CRLs - {}", summary.issuer_subject, summary.enrollment),
        &["URL", "Statuses", "Details"],
    );
    for group in summary.detail_groups(verbose) {
        let statuses = serde_json::to_string(&group.statuses()).unwrap_or_default();
        let details = serde_json::to_string(&group.entries).unwrap_or_default();
        table.add_row(vec![group.url.clone(), statuses, details]);
    }
    (!table.is_empty()).then_some(table)
}

pub fn failed_run_note(run_id: &RunIdentifier, error: &str) -> String {
    format!("{}: no CRL audit, run could not be aggregated ({})", run_id, error)
}
