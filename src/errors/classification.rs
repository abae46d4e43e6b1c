use super::types::StatusError;

/// Coarse failure categories that drive how the pipeline reacts to an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The object does not exist. Only fatal for mandatory artifacts.
    NotFound,
    /// Any other network or HTTP failure, timeouts included.
    Transport,
    /// A fetched artifact could not be decoded.
    Parse,
    /// Invalid invocation; detected before any network activity.
    Configuration,
    /// Local filesystem or internal failure.
    Local,
}

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub error_type: &'static str,
    pub kind: ErrorKind,
}

impl StatusError {
    /// Classify this error to determine its type and how the pipeline treats it.
    pub fn classify(&self) -> ErrorClassification {
        match self {
            StatusError::NotFound { .. } => ErrorClassification {
                error_type: "NotFoundError",
                kind: ErrorKind::NotFound,
            },

            StatusError::Http { .. } => ErrorClassification {
                error_type: "HttpError",
                kind: ErrorKind::Transport,
            },
            StatusError::Network(_) => ErrorClassification {
                error_type: "NetworkError",
                kind: ErrorKind::Transport,
            },
            StatusError::Timeout(_) => ErrorClassification {
                error_type: "TimeoutError",
                kind: ErrorKind::Transport,
            },

            StatusError::Parse { .. } => ErrorClassification {
                error_type: "ParseError",
                kind: ErrorKind::Parse,
            },
            StatusError::MissingField { .. } => ErrorClassification {
                error_type: "MissingFieldError",
                kind: ErrorKind::Parse,
            },
            StatusError::Json(_) => ErrorClassification {
                error_type: "JsonError",
                kind: ErrorKind::Parse,
            },

            StatusError::Config(_) => ErrorClassification {
                error_type: "ConfigError",
                kind: ErrorKind::Configuration,
            },
            StatusError::Yaml(_) => ErrorClassification {
                error_type: "YamlError",
                kind: ErrorKind::Configuration,
            },

            StatusError::Io(_) => ErrorClassification {
                error_type: "IoError",
                kind: ErrorKind::Local,
            },
            StatusError::Internal(_) => ErrorClassification {
                error_type: "InternalError",
                kind: ErrorKind::Local,
            },
        }
    }
}
