use std::path::Path;
use tracing::info;

use crate::audit::utils::atomic_write;
use crate::errors::StatusError;
use super::table::{escape_html, Table};

const STYLE: &str = "body { font-family: monospace; }\n\
table { border-collapse: collapse; margin: 1em 0; }\n\
caption { font-weight: bold; text-align: left; }\n\
th, td { border: 1px solid #999; padding: 2px 6px; vertical-align: top; }\n\
td { word-break: break-all; max-width: 60em; }\n\
.note { color: #a60; }\n";

/// One run's section of the detail report.
pub struct RunDetails {
    pub heading: String,
    /// Shown in place of issuer tables when the run has no audit to show.
    pub note: Option<String>,
    pub issuer_tables: Vec<Table>,
}

/// Render the CRL detail report: per-run issuer tables, then the summary tables.
pub fn render_detail_report(runs: &[RunDetails], summary_tables: &[Table]) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str("<title>CRL Audit Details</title>\n");
    out.push_str(&format!("<style>\n{}</style>\n", STYLE));
    out.push_str("</head>\n<body>\n");

    for run in runs {
        out.push_str(&format!("<h2>{}</h2>\n", escape_html(&run.heading)));
        if let Some(note) = &run.note {
            out.push_str(&format!("<p class=\"note\">{}</p>\n", escape_html(note)));
        }
        for table in &run.issuer_tables {
            out.push_str(&table.render_html());
        }
    }

    out.push_str("<h2>Summary Tables</h2>\n");
    for table in summary_tables {
        out.push_str(&table.render_html());
    }

    out.push_str("</body>\n</html>\n");
    out
}

pub async fn write_detail_report(
    path: &Path,
    runs: &[RunDetails],
    summary_tables: &[Table],
) -> Result<(), StatusError> {
    info!(path = %path.display(), "Writing CRL details");
    atomic_write(path, &render_detail_report(runs, summary_tables)).await
}
