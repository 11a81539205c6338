use crate::config::constants::{CACHE_DIR_NAME, CONFIG_DIR_NAME};
use crate::structs::analysis_result::AnalysisResult;
use crate::traits::analysis_cache::AnalysisCache;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

fn cache_key(repository: &str, revision: &str) -> String {
    format!("{}@{}", repository, revision)
}

/// Process-local cache for repeated runs inside a single invocation, such as
/// comparing a revision against one analyzed moments earlier.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, AnalysisResult>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AnalysisCache for MemoryCache {
    fn get(&self, repository: &str, revision: &str) -> Option<AnalysisResult> {
        match self.entries.lock() {
            Ok(entries) => entries.get(&cache_key(repository, revision)).cloned(),
            Err(_) => None,
        }
    }

    fn put(&self, result: &AnalysisResult) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(cache_key(&result.repository, &result.revision), result.clone());
        }
    }
}

/// Persists completed results as pretty-printed JSON under the user's cache
/// directory. Revisions are assumed immutable, so entries never expire.
pub struct FileCache {
    directory: PathBuf,
}

impl FileCache {
    pub fn new(directory: PathBuf) -> Self {
        Self { directory }
    }

    pub fn in_home_dir() -> Option<Self> {
        dirs::home_dir().map(|home| Self::new(home.join(CONFIG_DIR_NAME).join(CACHE_DIR_NAME)))
    }

    fn entry_path(&self, repository: &str, revision: &str) -> PathBuf {
        let sanitized: String = cache_key(repository, revision)
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
            .collect();
        self.directory.join(format!("{}.json", sanitized))
    }
}

impl AnalysisCache for FileCache {
    fn get(&self, repository: &str, revision: &str) -> Option<AnalysisResult> {
        let path = self.entry_path(repository, revision);
        let content = fs::read_to_string(&path).ok()?;
        match serde_json::from_str::<AnalysisResult>(&content) {
            Ok(result) => {
                log::info!("📦 Using cached analysis for {}@{}", repository, revision);
                Some(result)
            }
            Err(e) => {
                log::warn!("⚠️ Discarding unreadable cache entry {}: {}", path.display(), e);
                None
            }
        }
    }

    fn put(&self, result: &AnalysisResult) {
        if let Err(e) = fs::create_dir_all(&self.directory) {
            log::warn!("⚠️ Could not create cache directory: {}", e);
            return;
        }
        let path = self.entry_path(&result.repository, &result.revision);
        match serde_json::to_string_pretty(result) {
            Ok(json) => {
                if let Err(e) = fs::write(&path, json) {
                    log::warn!("⚠️ Could not write cache entry {}: {}", path.display(), e);
                }
            }
            Err(e) => log::warn!("⚠️ Could not serialize analysis result: {}", e),
        }
    }
}
