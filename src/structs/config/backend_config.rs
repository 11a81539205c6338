use crate::helpers::config_helper::ConfigHelper;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BackendConfig {
    #[serde(default = "ConfigHelper::default_backend_url")]
    pub base_url: String,

    /// Ask the backend for its slower, more thorough analysis mode.
    #[serde(default)]
    pub deep_research: bool,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: ConfigHelper::default_backend_url(),
            deep_research: false,
        }
    }
}
