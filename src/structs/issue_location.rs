use serde::{Deserialize, Serialize};

/// Sentinel file value when the backend never named one. This is a legal,
/// common value, never an error.
pub const UNKNOWN_FILE: &str = "unknown";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IssueLocation {
    pub file: String,
    pub line: Option<usize>,
    pub column: Option<usize>,
}

impl IssueLocation {
    pub fn new(file: Option<String>, line: Option<usize>, column: Option<usize>) -> Self {
        let file = match file {
            Some(f) if !f.trim().is_empty() => f.trim().to_string(),
            _ => UNKNOWN_FILE.to_string(),
        };
        Self { file, line, column }
    }

    pub fn unknown() -> Self {
        Self {
            file: UNKNOWN_FILE.to_string(),
            line: None,
            column: None,
        }
    }

    pub fn is_file_known(&self) -> bool {
        self.file != UNKNOWN_FILE
    }
}
