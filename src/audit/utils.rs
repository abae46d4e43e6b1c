use std::path::{Path, PathBuf};
use crate::errors::StatusError;

/// Sibling path a writer fills before renaming it over `path`. The process id
/// keeps concurrent invocations from sharing a temp file.
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(format!(".{}.tmp", std::process::id()));
    path.with_file_name(name)
}

/// Atomic file write: write to temp, then rename. The temp file is removed on failure.
pub async fn atomic_write(path: &Path, content: &str) -> Result<(), StatusError> {
    let tmp = temp_path(path);
    let written = match tokio::fs::write(&tmp, content).await {
        Ok(()) => tokio::fs::rename(&tmp, path).await,
        Err(e) => Err(e),
    };
    if let Err(e) = written {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(e.into());
    }
    Ok(())
}
