use std::collections::HashMap;

use crate::models::{
    ArtifactData, AuditEntry, CrlOutcome, EnrollmentRecord, EnrollmentVerdict,
    IssuerAuditSummary, RunData, UrlGroup,
};

/// Per-issuer CRL outcome summaries for a run, in first-seen issuer order.
/// A run without a readable audit log yields no summaries.
pub fn classify(run: &RunData) -> Vec<IssuerAuditSummary> {
    match run.audit_entries.loaded() {
        Some(entries) => classify_entries(entries, &run.enrollment),
        None => Vec::new(),
    }
}

pub fn classify_entries(
    entries: &[AuditEntry],
    enrollment: &ArtifactData<Vec<EnrollmentRecord>>,
) -> Vec<IssuerAuditSummary> {
    let enrollment = enrollment.loaded().map(Vec::as_slice);

    group_by_issuer(entries)
        .into_iter()
        .map(|issuer| summarize_issuer(issuer, enrollment))
        .collect()
}

/// Enrollment verdict for an issuer. `None` means the run has no enrollment data.
pub fn resolve_enrollment(
    pub_key_hash: &str,
    enrollment: Option<&[EnrollmentRecord]>,
) -> EnrollmentVerdict {
    let Some(records) = enrollment else {
        return EnrollmentVerdict::Unknown;
    };
    match records.iter().find(|r| r.pub_key_hash == pub_key_hash) {
        Some(record) if record.enrolled => EnrollmentVerdict::Enrolled,
        Some(_) => EnrollmentVerdict::NotEnrolled,
        None => EnrollmentVerdict::NotFound,
    }
}

struct IssuerEntries<'a> {
    subject: &'a str,
    pub_key_hash: &'a str,
    entries: Vec<&'a AuditEntry>,
}

fn group_by_issuer(entries: &[AuditEntry]) -> Vec<IssuerEntries<'_>> {
    let mut issuers: Vec<IssuerEntries<'_>> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for entry in entries.iter().filter(|e| e.is_important()) {
        let slot = *index.entry(entry.issuer_subject.as_str()).or_insert_with(|| {
            issuers.push(IssuerEntries {
                subject: &entry.issuer_subject,
                pub_key_hash: &entry.issuer_pub_key_hash,
                entries: Vec::new(),
            });
            issuers.len() - 1
        });
        issuers[slot].entries.push(entry);
    }

    issuers
}

fn group_by_url(entries: &[&AuditEntry]) -> Vec<UrlGroup> {
    let mut groups: Vec<(String, Vec<AuditEntry>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for entry in entries {
        let slot = *index.entry(entry.url.as_str()).or_insert_with(|| {
            groups.push((entry.url.clone(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push((*entry).clone());
    }

    groups
        .into_iter()
        .map(|(url, entries)| {
            let outcome = outcome_of(&entries);
            UrlGroup { url, entries, outcome }
        })
        .collect()
}

fn outcome_of(attempts: &[AuditEntry]) -> CrlOutcome {
    if !attempts.iter().any(AuditEntry::is_success) {
        CrlOutcome::Failed
    } else if attempts.len() == 1 {
        CrlOutcome::Updated
    } else {
        CrlOutcome::Recovered
    }
}

fn summarize_issuer(
    issuer: IssuerEntries<'_>,
    enrollment: Option<&[EnrollmentRecord]>,
) -> IssuerAuditSummary {
    let url_groups = group_by_url(&issuer.entries);
    let count = |outcome: CrlOutcome| url_groups.iter().filter(|g| g.outcome == outcome).count();

    IssuerAuditSummary {
        issuer_subject: issuer.subject.to_string(),
        enrollment: resolve_enrollment(issuer.pub_key_hash, enrollment),
        num_failed: count(CrlOutcome::Failed),
        num_recovered: count(CrlOutcome::Recovered),
        num_updated: count(CrlOutcome::Updated),
        num_total: url_groups.len(),
        url_groups,
    }
}
