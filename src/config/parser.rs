use std::path::Path;
use crate::errors::StatusError;
use super::types::FileConfig;

/// Load the optional YAML config file.
pub async fn parse_config(path: &Path) -> Result<FileConfig, StatusError> {
    if !path.exists() {
        return Err(StatusError::Config(format!("Config file not found: {}", path.display())));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > 1_048_576 {
        return Err(StatusError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    parse_config_str(&content)
}

pub fn parse_config_str(content: &str) -> Result<FileConfig, StatusError> {
    if content.trim().is_empty() {
        return Ok(FileConfig::default());
    }
    let config: FileConfig = serde_yaml::from_str(content)
        .map_err(|e| StatusError::Config(format!("Invalid config file: {}", e)))?;

    if config.timeout_secs == Some(0) {
        return Err(StatusError::Config("timeout_secs must be greater than zero".into()));
    }

    Ok(config)
}
