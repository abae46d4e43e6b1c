use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{IssuerAuditSummary, RunData, RunIdentifier};
use crate::pipeline::{PipelineReport, RunOutcome};

/// A run that could not be aggregated.
#[derive(Debug, Serialize)]
pub struct RunFailure<'a> {
    pub run_id: &'a RunIdentifier,
    pub error_type: &'static str,
    pub error: &'a str,
}

#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    /// Complete runs, newest first.
    pub runs: Vec<&'a RunData>,
    /// Failed runs, newest first.
    pub failures: Vec<RunFailure<'a>>,
    /// Per-issuer summaries keyed by run identifier. Empty unless CRL reporting is on.
    pub crl_summaries: BTreeMap<&'a str, &'a [IssuerAuditSummary]>,
}

impl<'a> JsonReport<'a> {
    pub fn new(report: &'a PipelineReport) -> Self {
        let mut runs = Vec::new();
        let mut failures = Vec::new();
        for outcome in report.newest_first() {
            match outcome {
                RunOutcome::Complete(data) => runs.push(data),
                RunOutcome::Failed { run_id, error_type, error } => failures.push(RunFailure {
                    run_id,
                    error_type: *error_type,
                    error,
                }),
            }
        }
        Self {
            runs,
            failures,
            crl_summaries: BTreeMap::new(),
        }
    }

    /// Attach the summaries of every complete run.
    pub fn with_summaries(mut self, summaries: &'a [(&'a RunOutcome, Vec<IssuerAuditSummary>)]) -> Self {
        self.crl_summaries = summaries
            .iter()
            .filter(|(outcome, _)| outcome.data().is_some())
            .map(|(outcome, issuers)| (outcome.run_id().as_str(), issuers.as_slice()))
            .collect();
        self
    }

    pub fn render(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
