use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum Severity {
    #[serde(rename = "low")]
    Low,
    #[serde(rename = "medium")]
    Medium,
    #[serde(rename = "high")]
    High,
    #[serde(rename = "critical")]
    Critical,
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Medium
    }
}

impl Severity {
    /// Coerces arbitrary backend severity labels to the canonical enum.
    /// Unknown labels fall back to `Medium`.
    pub fn coerce(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "critical" | "blocker" | "crit" => Severity::Critical,
            "high" | "major" | "severe" => Severity::High,
            "medium" | "moderate" | "med" => Severity::Medium,
            "low" | "minor" | "info" | "informational" | "trivial" => Severity::Low,
            _ => Severity::Medium,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }

    /// Deduction weight used by the comparison quality score.
    pub fn weight(&self) -> f64 {
        match self {
            Severity::Critical => 5.0,
            Severity::High => 3.0,
            Severity::Medium => 1.0,
            Severity::Low => 0.5,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Severity::Critical => "🚨",
            Severity::High => "⚠️",
            Severity::Medium => "📋",
            Severity::Low => "💡",
        }
    }
}
