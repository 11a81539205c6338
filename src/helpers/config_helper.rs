pub struct ConfigHelper;

impl ConfigHelper {
    pub fn default_completeness_threshold() -> f64 {
        0.85
    }

    pub fn default_max_iterations() -> usize {
        10
    }

    pub fn default_plateau_window() -> usize {
        2
    }

    pub fn default_round_timeout_secs() -> u64 {
        120
    }

    pub fn default_backend_url() -> String {
        "http://localhost:8001".to_string()
    }
}
