use crate::enums::backend_error::BackendError;
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RevlyzerError {
    // Configuration errors
    ConfigurationError {
        message: String,
        field: Option<String>,
        suggestion: Option<String>,
    },
    ConfigurationFileError {
        path: String,
        reason: String,
    },

    // Parser errors
    ParseError {
        content_type: String,
        line_number: Option<usize>,
        reason: String,
    },

    // Analysis errors
    AnalysisError {
        repository: String,
        revision: String,
        reason: String,
    },

    // Network/API errors
    NetworkError {
        operation: String,
        url: Option<String>,
        status_code: Option<u16>,
        reason: String,
    },

    // System errors
    SystemError {
        operation: String,
        reason: String,
    },
}

impl RevlyzerError {
    pub fn config_error(message: &str, field: Option<&str>, suggestion: Option<&str>) -> Self {
        Self::ConfigurationError {
            message: message.to_string(),
            field: field.map(|s| s.to_string()),
            suggestion: suggestion.map(|s| s.to_string()),
        }
    }

    pub fn parse_error(content_type: &str, line_number: Option<usize>, reason: &str) -> Self {
        Self::ParseError {
            content_type: content_type.to_string(),
            line_number,
            reason: reason.to_string(),
        }
    }

    pub fn analysis_error(repository: &str, revision: &str, reason: &str) -> Self {
        Self::AnalysisError {
            repository: repository.to_string(),
            revision: revision.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn system_error(operation: &str, reason: &str) -> Self {
        Self::SystemError {
            operation: operation.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::ConfigurationError { message, field, suggestion } => {
                let mut msg = format!("Configuration Error: {}", message);
                if let Some(field) = field {
                    msg.push_str(&format!(" (field: {})", field));
                }
                if let Some(suggestion) = suggestion {
                    msg.push_str(&format!("\n💡 Suggestion: {}", suggestion));
                }
                msg
            }
            Self::ConfigurationFileError { path, reason } => {
                format!("Configuration file error at '{}': {}\n💡 Check file permissions and syntax", path, reason)
            }
            Self::ParseError { content_type, line_number, reason } => {
                let mut msg = format!("Parse error in {}: {}", content_type, reason);
                if let Some(line) = line_number {
                    msg.push_str(&format!(" (line {})", line));
                }
                msg
            }
            Self::AnalysisError { repository, revision, reason } => {
                format!("Analysis error for '{}' at revision '{}': {}", repository, revision, reason)
            }
            Self::NetworkError { operation, url, status_code, reason } => {
                let mut msg = format!("Network error during {}: {}", operation, reason);
                if let Some(url) = url {
                    msg.push_str(&format!(" (URL: {})", url));
                }
                if let Some(code) = status_code {
                    msg.push_str(&format!(" (Status: {})", code));
                }
                msg.push_str("\n💡 Check that the analysis backend is reachable");
                msg
            }
            Self::SystemError { operation, reason } => {
                format!("System error during {}: {}", operation, reason)
            }
        }
    }
}

impl fmt::Display for RevlyzerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl StdError for RevlyzerError {}

/// Result type alias for revlyzer operations
pub type RevlyzerResult<T> = Result<T, RevlyzerError>;

impl From<std::io::Error> for RevlyzerError {
    fn from(error: std::io::Error) -> Self {
        RevlyzerError::SystemError {
            operation: "I/O operation".to_string(),
            reason: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for RevlyzerError {
    fn from(error: serde_json::Error) -> Self {
        RevlyzerError::ParseError {
            content_type: "JSON".to_string(),
            line_number: Some(error.line()),
            reason: error.to_string(),
        }
    }
}

impl From<toml::de::Error> for RevlyzerError {
    fn from(error: toml::de::Error) -> Self {
        RevlyzerError::ParseError {
            content_type: "TOML".to_string(),
            line_number: None,
            reason: error.message().to_string(),
        }
    }
}

impl From<reqwest::Error> for RevlyzerError {
    fn from(error: reqwest::Error) -> Self {
        RevlyzerError::NetworkError {
            operation: "HTTP request".to_string(),
            url: error.url().map(|u| u.to_string()),
            status_code: error.status().map(|s| s.as_u16()),
            reason: error.to_string(),
        }
    }
}

impl From<BackendError> for RevlyzerError {
    fn from(error: BackendError) -> Self {
        match error {
            BackendError::ApiError { status, message } => RevlyzerError::NetworkError {
                operation: "backend query".to_string(),
                url: None,
                status_code: Some(status),
                reason: message,
            },
            BackendError::NetworkError(reason) | BackendError::SerializationError(reason) => {
                RevlyzerError::NetworkError {
                    operation: "backend query".to_string(),
                    url: None,
                    status_code: None,
                    reason,
                }
            }
            BackendError::Timeout { seconds } => RevlyzerError::NetworkError {
                operation: "backend query".to_string(),
                url: None,
                status_code: None,
                reason: format!("timed out after {}s", seconds),
            },
        }
    }
}
