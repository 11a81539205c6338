use crate::structs::config::backend_config::BackendConfig;
use crate::structs::config::collector_config::CollectorConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub collector: CollectorConfig,
}
