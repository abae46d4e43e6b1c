use serde::Serialize;
use std::fmt;

use super::audit::AuditEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnrollmentVerdict {
    Enrolled,
    NotEnrolled,
    NotFound,
    Unknown,
}

impl EnrollmentVerdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enrolled => "✅",
            Self::NotEnrolled => "❌",
            Self::NotFound => "Not Found",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for EnrollmentVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of all fetch attempts for one CRL URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CrlOutcome {
    /// Succeeded on the first and only attempt.
    Updated,
    /// Succeeded after at least one earlier attempt.
    Recovered,
    Failed,
}

/// The fetch history of one CRL URL, in encounter order.
#[derive(Debug, Clone, Serialize)]
pub struct UrlGroup {
    pub url: String,
    pub entries: Vec<AuditEntry>,
    pub outcome: CrlOutcome,
}

impl UrlGroup {
    pub fn statuses(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.kind.as_str()).collect()
    }

    /// Single-attempt successes carry nothing worth showing in the details.
    pub fn is_trivial(&self) -> bool {
        self.outcome == CrlOutcome::Updated && self.entries.len() == 1
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IssuerAuditSummary {
    pub issuer_subject: String,
    pub enrollment: EnrollmentVerdict,
    pub num_failed: usize,
    pub num_recovered: usize,
    pub num_updated: usize,
    pub num_total: usize,
    #[serde(skip_serializing)]
    pub url_groups: Vec<UrlGroup>,
}

impl IssuerAuditSummary {
    /// URL groups for the detail view; trivial groups only when `verbose`.
    pub fn detail_groups(&self, verbose: bool) -> impl Iterator<Item = &UrlGroup> {
        self.url_groups
            .iter()
            .filter(move |g| verbose || !g.is_trivial())
    }
}
