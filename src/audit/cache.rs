use serde::de::DeserializeOwned;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::errors::StatusError;
use crate::models::{ArtifactData, RunIdentifier};
use crate::storage::ObjectStoreGateway;
use super::utils::temp_path;

/// Per-run artifacts worth keeping on disk between invocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditArtifact {
    CrlAudit,
    Enrollment,
}

impl AuditArtifact {
    pub fn remote_name(&self) -> &'static str {
        match self {
            Self::CrlAudit => "crl-audit.json",
            Self::Enrollment => "enrolled.json",
        }
    }
}

/// Local directory of downloaded audit artifacts, named `<run>-<artifact>`.
///
/// A run's artifacts never change once published, so anything already on disk
/// is used as-is and never re-fetched.
#[derive(Debug, Clone)]
pub struct LocalAuditCache {
    dir: PathBuf,
}

impl LocalAuditCache {
    /// Open the cache, creating the directory if needed.
    pub async fn open(dir: &Path) -> Result<Self, StatusError> {
        tokio::fs::create_dir_all(dir).await.map_err(|e| {
            StatusError::Config(format!(
                "Unusable audit cache directory {}: {}",
                dir.display(),
                e
            ))
        })?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn local_path(&self, run_id: &RunIdentifier, artifact: AuditArtifact) -> PathBuf {
        self.dir
            .join(format!("{}-{}", run_id, artifact.remote_name()))
    }

    /// Make sure the artifact is on disk, downloading it if absent, and return
    /// its local path. The file may still not exist afterwards if the run never
    /// published the artifact.
    pub async fn ensure_cached(
        &self,
        gateway: &dyn ObjectStoreGateway,
        run_id: &RunIdentifier,
        artifact: AuditArtifact,
    ) -> Result<PathBuf, StatusError> {
        let path = self.local_path(run_id, artifact);
        if tokio::fs::metadata(&path).await.is_ok_and(|m| m.is_file()) {
            debug!(path = %path.display(), "Audit cache hit");
            return Ok(path);
        }

        let remote = run_id.artifact_path(artifact.remote_name());
        let tmp = temp_path(&path);

        match gateway.get_object_file(&remote, &tmp).await {
            Ok(()) => {
                tokio::fs::rename(&tmp, &path).await?;
                debug!(path = %path.display(), "Audit artifact cached");
            }
            Err(e) => {
                let _ = tokio::fs::remove_file(&tmp).await;
                if !e.is_not_found() {
                    return Err(e);
                }
                debug!(run_id = %run_id, artifact = artifact.remote_name(), "Run did not publish artifact");
            }
        }

        Ok(path)
    }

    /// Ensure the artifact is cached and decode it. Absence and failures are
    /// reported in the returned [`ArtifactData`] rather than as errors.
    pub async fn load<T: DeserializeOwned>(
        &self,
        gateway: &dyn ObjectStoreGateway,
        run_id: &RunIdentifier,
        artifact: AuditArtifact,
    ) -> ArtifactData<T> {
        let path = match self.ensure_cached(gateway, run_id, artifact).await {
            Ok(path) => path,
            Err(e) => {
                warn!(run_id = %run_id, artifact = artifact.remote_name(), error = %e, "Could not fetch audit artifact");
                return ArtifactData::Unreadable(e.to_string());
            }
        };

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return ArtifactData::Missing,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not read cached artifact");
                return ArtifactData::Unreadable(e.to_string());
            }
        };

        match serde_json::from_str(&content) {
            Ok(value) => ArtifactData::Loaded(value),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Cached artifact is not valid JSON");
                ArtifactData::Unreadable(StatusError::parse(path.display().to_string(), e).to_string())
            }
        }
    }
}
