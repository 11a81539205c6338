use serde::{Deserialize, Serialize};

/// Heuristic coverage estimate for one collector round. This is a
/// termination signal, not a precision/recall metric.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GapEstimate {
    /// 0..=1 estimate of how much of the analyzable surface has been covered.
    pub completeness: f64,
    pub total_gaps: usize,
    pub critical_gaps: usize,
}

impl GapEstimate {
    pub fn empty() -> Self {
        Self {
            completeness: 0.0,
            total_gaps: 0,
            critical_gaps: 0,
        }
    }
}
