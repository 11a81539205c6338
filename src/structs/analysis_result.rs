use crate::enums::severity::Severity;
use crate::enums::termination_reason::TerminationReason;
use crate::structs::issue::Issue;
use crate::structs::iteration_record::IterationRecord;
use serde::{Deserialize, Serialize};

/// Collector output for one (repository, revision) pair. Produced once per
/// run and handed to the report layer; never persisted by the core itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub repository: String,
    pub revision: String,
    pub issues: Vec<Issue>,
    pub iterations: Vec<IterationRecord>,
    pub termination: TerminationReason,
    pub completed_at: chrono::DateTime<chrono::Utc>,
}

impl AnalysisResult {
    pub fn count_by_severity(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    pub fn total_rounds(&self) -> usize {
        self.iterations.len()
    }
}
