use serde::Serialize;
use tracing::{error, info};

use crate::audit::cache::LocalAuditCache;
use crate::errors::StatusError;
use crate::models::{RunData, RunIdentifier};
use crate::storage::ObjectStoreGateway;
use super::aggregator::RunDataAggregator;
use super::resolver::resolve_run_identifiers;

/// Result of aggregating one run. Failed runs stay in the report.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    Complete(RunData),
    Failed {
        run_id: RunIdentifier,
        error_type: &'static str,
        error: String,
    },
}

impl RunOutcome {
    pub fn run_id(&self) -> &RunIdentifier {
        match self {
            RunOutcome::Complete(data) => &data.run_id,
            RunOutcome::Failed { run_id, .. } => run_id,
        }
    }

    pub fn data(&self) -> Option<&RunData> {
        match self {
            RunOutcome::Complete(data) => Some(data),
            RunOutcome::Failed { .. } => None,
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct PipelineReport {
    /// Oldest first, in aggregation order.
    pub outcomes: Vec<RunOutcome>,
}

impl PipelineReport {
    /// Outcomes in presentation order, newest run first.
    pub fn newest_first(&self) -> impl Iterator<Item = &RunOutcome> {
        self.outcomes.iter().rev()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.data().is_none()).count()
    }
}

/// Resolve the most recent `count` runs and aggregate each of them, oldest first.
///
/// Only a failed directory listing aborts the report; a run that cannot be
/// aggregated is recorded as [`RunOutcome::Failed`].
pub async fn run_pipeline(
    gateway: &dyn ObjectStoreGateway,
    cache: &LocalAuditCache,
    count: usize,
) -> Result<PipelineReport, StatusError> {
    let listing = gateway.list_directories().await?;
    let run_ids = resolve_run_identifiers(&listing, count);
    info!(
        bucket = gateway.base_url(),
        listed = listing.len(),
        resolved = run_ids.len(),
        "Resolved run identifiers"
    );

    let mut aggregator = RunDataAggregator::new(gateway, cache);
    let mut report = PipelineReport::default();

    for run_id in run_ids {
        let outcome = match aggregator.aggregate(&run_id).await {
            Ok(data) => RunOutcome::Complete(data),
            Err(e) => {
                let classification = e.classify();
                error!(
                    run_id = %run_id,
                    error_type = classification.error_type,
                    error = %e,
                    "Run aggregation failed"
                );
                RunOutcome::Failed {
                    run_id,
                    error_type: classification.error_type,
                    error: e.to_string(),
                }
            }
        };
        report.outcomes.push(outcome);
    }

    Ok(report)
}
