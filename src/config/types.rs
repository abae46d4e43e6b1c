use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::StatusError;

pub const PROD_BUCKET_URL: &str = "https://storage.googleapis.com/storage/v1/b/crlite-filters-prod/";
pub const STAGE_BUCKET_URL: &str = "https://storage.googleapis.com/storage/v1/b/crlite-filters-stage/";
pub const DEFAULT_AUDIT_DIR: &str = "~/.crlite_db/audits/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Optional YAML config file; every field falls back to a built-in default.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub bucket_url: Option<String>,
    pub stage_bucket_url: Option<String>,
    pub auditdb: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Prod,
    Stage,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prod => "prod",
            Self::Stage => "stage",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do with CRL audit data once runs are aggregated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrlReportOptions {
    /// Print per-issuer summary tables.
    pub summarize: bool,
    /// Write the HTML detail report here.
    pub details_path: Option<PathBuf>,
    /// Include single-attempt successes in the details.
    pub details_all: bool,
}

impl CrlReportOptions {
    pub fn enabled(&self) -> bool {
        self.summarize || self.details_path.is_some() || self.details_all
    }
}

/// Validated settings for one report invocation.
#[derive(Debug, Clone)]
pub struct StatusConfig {
    pub count: usize,
    pub bucket_url: String,
    pub environment: Environment,
    pub audit_dir: PathBuf,
    pub timeout: Duration,
    pub crl: CrlReportOptions,
    pub json_output: bool,
}

impl StatusConfig {
    /// Check everything that can be checked without touching the network.
    pub fn validate(mut self) -> Result<Self, StatusError> {
        if self.count == 0 {
            return Err(StatusError::Config("Run count must be a positive integer".into()));
        }
        if self.timeout.is_zero() {
            return Err(StatusError::Config("Request timeout must be greater than zero".into()));
        }

        self.bucket_url = normalize_bucket_url(&self.bucket_url)?;

        if self.audit_dir.as_os_str().is_empty() {
            return Err(StatusError::Config("Audit cache path must not be empty".into()));
        }
        if self.audit_dir.is_file() {
            return Err(StatusError::Config(format!(
                "Audit cache path {} is a file, not a directory",
                self.audit_dir.display()
            )));
        }

        Ok(self)
    }
}

/// Require an absolute http(s) URL and make sure it ends with `/` so relative
/// object paths join beneath it.
pub fn normalize_bucket_url(raw: &str) -> Result<String, StatusError> {
    let url = reqwest::Url::parse(raw.trim())
        .map_err(|e| StatusError::Config(format!("Invalid bucket URL {}: {}", raw, e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(StatusError::Config(format!(
            "Bucket URL must be http or https: {}",
            raw
        )));
    }
    let mut normalized = url.to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    Ok(normalized)
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_home(path: &str) -> Result<PathBuf, StatusError> {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest.trim_start_matches('/'),
        _ => return Ok(PathBuf::from(path)),
    };
    let home = dirs::home_dir()
        .ok_or_else(|| StatusError::Config(format!("Cannot expand {}: no home directory", path)))?;
    Ok(if rest.is_empty() { home } else { home.join(rest) })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> StatusConfig {
        StatusConfig {
            count: 2,
            bucket_url: PROD_BUCKET_URL.to_string(),
            environment: Environment::Prod,
            audit_dir: PathBuf::from("/tmp/crlite-status-test-audits"),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            crl: CrlReportOptions::default(),
            json_output: false,
        }
    }

    #[test]
    fn test_valid_config() {
        let validated = config().validate().unwrap();
        assert_eq!(validated.bucket_url, PROD_BUCKET_URL);
    }

    #[test]
    fn test_zero_count_rejected() {
        let err = StatusConfig { count: 0, ..config() }.validate().unwrap_err();
        assert!(matches!(err, StatusError::Config(_)));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = StatusConfig { timeout: Duration::ZERO, ..config() }.validate().unwrap_err();
        assert!(matches!(err, StatusError::Config(_)));
    }

    #[test]
    fn test_bucket_url_gets_trailing_slash() {
        assert_eq!(
            normalize_bucket_url("https://example.com/storage/v1/b/bucket").unwrap(),
            "https://example.com/storage/v1/b/bucket/"
        );
        assert!(normalize_bucket_url("ftp://example.com/").is_err());
        assert!(normalize_bucket_url("bucket").is_err());
    }

    #[test]
    fn test_audit_dir_that_is_a_file_rejected() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = StatusConfig { audit_dir: file.path().to_path_buf(), ..config() }
            .validate()
            .unwrap_err();
        assert!(matches!(err, StatusError::Config(_)));
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("/var/cache").unwrap(), PathBuf::from("/var/cache"));
        assert_eq!(expand_home("~user/x").unwrap(), PathBuf::from("~user/x"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/.crlite_db/audits/").unwrap(), home.join(".crlite_db/audits/"));
            assert_eq!(expand_home("~").unwrap(), home);
        }
    }

    #[test]
    fn test_crl_options_enabled_by_any_flag() {
        assert!(!CrlReportOptions::default().enabled());
        assert!(CrlReportOptions { details_all: true, ..Default::default() }.enabled());
        assert!(CrlReportOptions { details_path: Some("x.html".into()), ..Default::default() }.enabled());
    }
}
