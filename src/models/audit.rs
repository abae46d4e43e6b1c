use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Kind recorded for a CRL that was fetched and processed successfully.
pub const KIND_VALID_PROCESSED: &str = "Valid, Processed";
/// Kind recorded for a CRL with no entries; carries no diagnostic value.
pub const KIND_EMPTY_REVOCATION_LIST: &str = "Empty Revocation List";

/// The `crl-audit.json` document published by a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditLog {
    #[serde(rename = "Entries", default)]
    pub entries: Option<Vec<AuditEntry>>,
}

impl AuditLog {
    pub fn into_entries(self) -> Vec<AuditEntry> {
        self.entries.unwrap_or_default()
    }
}

/// One fetch attempt of one CRL, as recorded by the upstream auditor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    #[serde(rename = "IssuerSubject")]
    pub issuer_subject: String,
    /// Public key hash of the issuer; matched against the enrollment list.
    #[serde(rename = "Issuer")]
    pub issuer_pub_key_hash: String,
    #[serde(rename = "Url")]
    pub url: String,
    #[serde(rename = "Kind")]
    pub kind: String,
    /// Remaining auditor fields, kept verbatim for the detail report.
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl AuditEntry {
    pub fn is_success(&self) -> bool {
        self.kind == KIND_VALID_PROCESSED
    }

    pub fn is_important(&self) -> bool {
        self.kind != KIND_EMPTY_REVOCATION_LIST
    }
}

/// One record of the `enrolled.json` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrollmentRecord {
    #[serde(rename = "pubKeyHash")]
    pub pub_key_hash: String,
    pub enrolled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_log_parses_and_keeps_details() {
        let json = r#"{"Entries": [{
            "IssuerSubject": "CN=Example CA",
            "Issuer": "abc=",
            "Url": "http://crl.example.com/ca.crl",
            "Kind": "Failed",
            "Errors": ["connection reset"],
            "Age": "2h"
        }]}"#;
        let log: AuditLog = serde_json::from_str(json).unwrap();
        let entries = log.into_entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].issuer_pub_key_hash, "abc=");
        assert!(!entries[0].is_success());
        assert_eq!(entries[0].details["Age"], "2h");
        assert!(!entries[0].details.contains_key("Kind"));
    }

    #[test]
    fn test_null_entries_is_empty() {
        let log: AuditLog = serde_json::from_str(r#"{"Entries": null}"#).unwrap();
        assert!(log.into_entries().is_empty());
    }

    #[test]
    fn test_enrollment_ignores_extra_fields() {
        let json = r#"[{"pubKeyHash": "abc=", "enrolled": true, "subject": "CN=Example CA"}]"#;
        let records: Vec<EnrollmentRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records[0].pub_key_hash, "abc=");
        assert!(records[0].enrolled);
    }
}
