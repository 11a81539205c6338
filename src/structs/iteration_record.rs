use crate::structs::gap_estimate::GapEstimate;
use serde::{Deserialize, Serialize};

/// Bookkeeping for one collector round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IterationRecord {
    /// 1-based round index.
    pub index: usize,
    pub response_bytes: usize,
    pub parsed_count: usize,
    pub gap: GapEstimate,
    pub duration_ms: u64,
    /// Previously-unseen fingerprints this round contributed.
    pub new_fingerprints: usize,
    /// Set when the round failed outright (timeout, network, non-2xx).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IterationRecord {
    pub fn failed(index: usize, duration_ms: u64, gap: GapEstimate, error: String) -> Self {
        Self {
            index,
            response_bytes: 0,
            parsed_count: 0,
            gap,
            duration_ms,
            new_fingerprints: 0,
            error: Some(error),
        }
    }

    pub fn contributed_new(&self) -> bool {
        self.new_fingerprints > 0
    }
}
