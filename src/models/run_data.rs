use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::audit::{AuditEntry, EnrollmentRecord};
use super::run::RunIdentifier;

/// The `mlbf/stats.json` document. Older runs predate some of the fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStats {
    pub mlbf_layers: Option<u64>,
    pub mlbf_filesize: Option<u64>,
    pub stash_filesize: Option<u64>,
    pub stash_num_issuers: Option<u64>,
    pub knownrevoked: Option<u64>,
    pub knownnotrevoked: Option<u64>,
}

/// Object metadata as reported by the store. GCS encodes `size` as a decimal string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectMetadata {
    #[serde(deserialize_with = "u64_from_string_or_number")]
    pub size: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub updated: Option<String>,
}

fn u64_from_string_or_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Size {
        Number(u64),
        Text(String),
    }

    match Size::deserialize(deserializer)? {
        Size::Number(n) => Ok(n),
        Size::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// How many issuers a stash covers. Only `stats.json` reports a count; a stash
/// sized from object metadata has no count available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StashIssuers {
    Counted(u64),
    NotReported,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stash {
    pub size_bytes: u64,
    pub issuers: StashIssuers,
}

/// An optional per-run artifact after an attempted load.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum ArtifactData<T> {
    Loaded(T),
    /// The run never published this artifact.
    Missing,
    /// The artifact exists but could not be fetched or decoded.
    Unreadable(String),
}

impl<T> ArtifactData<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            ArtifactData::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> ArtifactData<U> {
        match self {
            ArtifactData::Loaded(value) => ArtifactData::Loaded(f(value)),
            ArtifactData::Missing => ArtifactData::Missing,
            ArtifactData::Unreadable(reason) => ArtifactData::Unreadable(reason),
        }
    }
}

/// Everything the report shows about one run. Built once per invocation.
#[derive(Debug, Clone, Serialize)]
pub struct RunData {
    pub run_id: RunIdentifier,
    pub filter_size_bytes: u64,
    pub filter_layers: u64,
    pub stash: Option<Stash>,
    pub known_revoked: Option<u64>,
    pub known_not_revoked: Option<u64>,
    pub timestamp: DateTime<Utc>,
    #[serde(serialize_with = "serialize_coverage")]
    pub coverage_period: Option<Duration>,
    #[serde(skip_serializing)]
    pub audit_entries: ArtifactData<Vec<AuditEntry>>,
    #[serde(skip_serializing)]
    pub enrollment: ArtifactData<Vec<EnrollmentRecord>>,
}

impl RunData {
    pub fn stash_size_bytes(&self) -> Option<u64> {
        self.stash.as_ref().map(|s| s.size_bytes)
    }

    /// Number of enrolled issuers, when the run published an enrollment list.
    pub fn enrolled_issuer_count(&self) -> Option<usize> {
        self.enrollment
            .loaded()
            .map(|records| records.iter().filter(|r| r.enrolled).count())
    }
}

fn serialize_coverage<S>(period: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match period {
        Some(d) => serializer.serialize_some(&d.num_seconds()),
        None => serializer.serialize_none(),
    }
}
