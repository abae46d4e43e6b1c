use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatusError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{path} does not exist")]
    NotFound { path: String },

    #[error("HTTP {status} fetching {path}")]
    Http { path: String, status: u16 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Could not parse {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error("{path} is missing required field `{field}`")]
    MissingField { path: String, field: &'static str },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl StatusError {
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub fn parse(path: impl Into<String>, reason: impl ToString) -> Self {
        Self::Parse {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Map a reqwest failure on `path` onto the transport variants.
    pub fn from_reqwest(path: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(format!("{}: {}", path, err))
        } else if let Some(status) = err.status() {
            Self::Http {
                path: path.to_string(),
                status: status.as_u16(),
            }
        } else if err.is_decode() {
            Self::parse(path, err)
        } else {
            Self::Network(format!("{}: {}", path, err))
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
