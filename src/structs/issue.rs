use crate::enums::category::Category;
use crate::enums::severity::Severity;
use crate::structs::issue_location::IssueLocation;
use serde::{Deserialize, Serialize};

/// A single finding. Created only by the response normalizer; once
/// fingerprinted, the collector annotates `support_count` and `confidence`
/// but never rewrites severity or category in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub category: Category,
    pub location: IssueLocation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_snippet: Option<String>,
    /// Combined parse + corroboration confidence, 0..=1.
    pub confidence: f64,
    /// Derived identity key. Equal fingerprints mean the same finding.
    pub fingerprint: String,
    /// Number of distinct iterations that (re-)observed this finding.
    pub support_count: usize,
}

impl Issue {
    pub fn short_label(&self) -> String {
        match self.location.line {
            Some(line) => format!("{}:{} {}", self.location.file, line, self.title),
            None => format!("{} {}", self.location.file, self.title),
        }
    }
}
