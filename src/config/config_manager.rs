use crate::config::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME};
use crate::errors::{RevlyzerError, RevlyzerResult};
use crate::structs::config::config::Config;
use std::fs;
use std::path::PathBuf;

pub struct ConfigManager;

impl ConfigManager {
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    pub fn load() -> RevlyzerResult<Config> {
        let Some(path) = Self::config_path() else {
            return Ok(Config::default());
        };

        if path.exists() {
            log::info!("📋 Loading config from: {}", path.display());
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            return Ok(config);
        }

        Ok(Config::default())
    }

    pub fn validate_config(config: &Config) -> RevlyzerResult<()> {
        config.collector.validate().map_err(|reason| {
            RevlyzerError::config_error(&reason, Some("collector"), Some("Edit the [collector] section of config.toml"))
        })?;

        if config.backend.base_url.trim().is_empty() {
            return Err(RevlyzerError::config_error(
                "backend base_url must not be empty",
                Some("backend.base_url"),
                Some("Point it at your analysis backend, e.g. http://localhost:8001"),
            ));
        }

        Ok(())
    }

    pub fn create_sample_config() -> RevlyzerResult<PathBuf> {
        let path = Self::config_path().ok_or_else(|| {
            RevlyzerError::config_error("Could not determine home directory", None, None)
        })?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let sample_config = r#"# Revlyzer configuration

[backend]
# Analysis backend endpoint
base_url = "http://localhost:8001"
# Slower but more thorough backend mode
deep_research = false

[collector]
# Stop once estimated coverage reaches this fraction
completeness_threshold = 0.85
# Hard cap on analysis rounds per revision
max_iterations = 10
# Consecutive no-new-findings rounds before stopping
plateau_window = 2
# Per-round backend timeout in seconds
round_timeout_secs = 120
# Reuse results for a repository@revision already analyzed
cache_results = false
"#;

        fs::write(&path, sample_config)?;
        Ok(path)
    }
}
