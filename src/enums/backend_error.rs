use std::error::Error;
use std::fmt;

#[derive(Debug, Clone)]
pub enum BackendError {
    ApiError { status: u16, message: String },
    NetworkError(String),
    SerializationError(String),
    Timeout { seconds: u64 },
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BackendError::ApiError { status, message } => {
                write!(f, "Backend API Error (HTTP {}): {}", status, message)
            }
            BackendError::NetworkError(msg) => write!(f, "Network Error: {}", msg),
            BackendError::SerializationError(msg) => write!(f, "Serialization Error: {}", msg),
            BackendError::Timeout { seconds } => {
                write!(f, "Backend request timed out after {}s", seconds)
            }
        }
    }
}

impl Error for BackendError {}
