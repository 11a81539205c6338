use crate::helpers::config_helper::ConfigHelper;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CollectorConfig {
    /// Stop once the gap estimator reports at least this completeness (0..=1).
    #[serde(default = "ConfigHelper::default_completeness_threshold")]
    pub completeness_threshold: f64,

    /// Hard cap on rounds per revision, failed rounds included.
    #[serde(default = "ConfigHelper::default_max_iterations")]
    pub max_iterations: usize,

    /// Consecutive rounds without a new fingerprint before stopping.
    #[serde(default = "ConfigHelper::default_plateau_window")]
    pub plateau_window: usize,

    /// Per-round backend timeout in seconds.
    #[serde(default = "ConfigHelper::default_round_timeout_secs")]
    pub round_timeout_secs: u64,

    #[serde(default)]
    pub cache_results: bool,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            completeness_threshold: ConfigHelper::default_completeness_threshold(),
            max_iterations: ConfigHelper::default_max_iterations(),
            plateau_window: ConfigHelper::default_plateau_window(),
            round_timeout_secs: ConfigHelper::default_round_timeout_secs(),
            cache_results: false,
        }
    }
}

impl CollectorConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.completeness_threshold) {
            return Err(format!(
                "completeness_threshold must be within 0..=1, got {}",
                self.completeness_threshold
            ));
        }
        if self.max_iterations == 0 {
            return Err("max_iterations must be at least 1".to_string());
        }
        if self.plateau_window == 0 {
            return Err("plateau_window must be at least 1".to_string());
        }
        if self.round_timeout_secs == 0 {
            return Err("round_timeout_secs must be at least 1".to_string());
        }
        Ok(())
    }
}
