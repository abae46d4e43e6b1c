use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::{debug, info};

use crate::audit::cache::{AuditArtifact, LocalAuditCache};
use crate::errors::StatusError;
use crate::models::{AuditLog, EnrollmentRecord, RunData, RunIdentifier, RunStats, Stash, StashIssuers};
use crate::storage::ObjectStoreGateway;

const STATS_PATH: &str = "mlbf/stats.json";
const FILTER_PATH: &str = "mlbf/filter";
const STASH_PATH: &str = "mlbf/filter.stash";
const TIMESTAMP_PATH: &str = "timestamp";

/// Builds [`RunData`] for runs visited in ascending order.
///
/// The aggregator remembers the timestamp of the last run it aggregated so it can
/// report each run's coverage period. Create a fresh aggregator per report.
pub struct RunDataAggregator<'a> {
    gateway: &'a dyn ObjectStoreGateway,
    cache: &'a LocalAuditCache,
    previous_timestamp: Option<DateTime<Utc>>,
}

impl<'a> RunDataAggregator<'a> {
    pub fn new(gateway: &'a dyn ObjectStoreGateway, cache: &'a LocalAuditCache) -> Self {
        Self {
            gateway,
            cache,
            previous_timestamp: None,
        }
    }

    pub fn previous_timestamp(&self) -> Option<DateTime<Utc>> {
        self.previous_timestamp
    }

    pub async fn aggregate(&mut self, run_id: &RunIdentifier) -> Result<RunData, StatusError> {
        info!(run_id = %run_id, "Aggregating run");

        let stats_path = run_id.artifact_path(STATS_PATH);
        let stats_text = self.gateway.get_object_text(&stats_path).await?;
        let stats: RunStats =
            serde_json::from_str(&stats_text).map_err(|e| StatusError::parse(&stats_path, e))?;

        let filter_layers = stats.mlbf_layers.ok_or_else(|| StatusError::MissingField {
            path: stats_path.clone(),
            field: "mlbf_layers",
        })?;

        let filter_size_bytes = match stats.mlbf_filesize {
            Some(size) => size,
            None => {
                debug!(run_id = %run_id, "No mlbf_filesize in stats, reading filter metadata");
                self.gateway
                    .get_object_metadata(&run_id.artifact_path(FILTER_PATH))
                    .await?
                    .size
            }
        };

        let stash = self.load_stash(run_id, &stats).await?;

        let timestamp_path = run_id.artifact_path(TIMESTAMP_PATH);
        let timestamp_text = self.gateway.get_object_text(&timestamp_path).await?;
        let timestamp = parse_timestamp(&timestamp_path, &timestamp_text)?;
        let coverage_period = self.previous_timestamp.map(|previous| timestamp - previous);
        self.previous_timestamp = Some(timestamp);

        let audit_entries = self
            .cache
            .load::<AuditLog>(self.gateway, run_id, AuditArtifact::CrlAudit)
            .await
            .map(AuditLog::into_entries);
        let enrollment = self
            .cache
            .load::<Vec<EnrollmentRecord>>(self.gateway, run_id, AuditArtifact::Enrollment)
            .await;

        Ok(RunData {
            run_id: run_id.clone(),
            filter_size_bytes,
            filter_layers,
            stash,
            known_revoked: stats.knownrevoked,
            known_not_revoked: stats.knownnotrevoked,
            timestamp,
            coverage_period,
            audit_entries,
            enrollment,
        })
    }

    async fn load_stash(
        &self,
        run_id: &RunIdentifier,
        stats: &RunStats,
    ) -> Result<Option<Stash>, StatusError> {
        if let Some(size_bytes) = stats.stash_filesize {
            let issuers = stats
                .stash_num_issuers
                .map(StashIssuers::Counted)
                .unwrap_or(StashIssuers::NotReported);
            return Ok(Some(Stash { size_bytes, issuers }));
        }

        match self
            .gateway
            .get_object_metadata(&run_id.artifact_path(STASH_PATH))
            .await
        {
            Ok(meta) => Ok(Some(Stash {
                size_bytes: meta.size,
                issuers: StashIssuers::NotReported,
            })),
            Err(e) if e.is_not_found() => {
                debug!(run_id = %run_id, "Run has no stash");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

/// Parse the plain-text timestamp a run publishes. The wall-clock value is
/// taken as UTC; an explicit offset, if present, is dropped.
pub fn parse_timestamp(path: &str, text: &str) -> Result<DateTime<Utc>, StatusError> {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.naive_local().and_utc());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc());
        }
    }

    Err(StatusError::parse(path, format!("unrecognized timestamp {:?}", text)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_iso_timestamp() {
        let ts = parse_timestamp("t", "2023-01-02T06:30:00\n").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2023, 1, 2, 6, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_space_separated_with_fraction() {
        let ts = parse_timestamp("t", "2023-01-02 06:30:00.250000").unwrap();
        assert_eq!(ts.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn test_offset_is_replaced_not_converted() {
        let ts = parse_timestamp("t", "2023-01-02T06:30:00+02:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2023, 1, 2, 6, 30, 0).unwrap());
    }

    #[test]
    fn test_date_only() {
        let ts = parse_timestamp("t", "2023-01-02").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2023, 1, 2, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_garbage_is_parse_error() {
        let err = parse_timestamp("20230101-1/timestamp", "yesterday").unwrap_err();
        assert!(matches!(err, StatusError::Parse { .. }));
        assert!(err.to_string().contains("20230101-1/timestamp"));
    }
}
