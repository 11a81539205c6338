use serde::{Deserialize, Serialize};

/// Why a collector run stopped issuing rounds.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Eq, PartialEq)]
pub enum TerminationReason {
    #[serde(rename = "threshold-met")]
    ThresholdMet,
    #[serde(rename = "max-iterations")]
    MaxIterations,
    #[serde(rename = "plateau")]
    Plateau,
    #[serde(rename = "backend-exhausted-errors")]
    BackendExhaustedErrors,
}

impl TerminationReason {
    pub fn name(&self) -> &'static str {
        match self {
            TerminationReason::ThresholdMet => "threshold-met",
            TerminationReason::MaxIterations => "max-iterations",
            TerminationReason::Plateau => "plateau",
            TerminationReason::BackendExhaustedErrors => "backend-exhausted-errors",
        }
    }
}
