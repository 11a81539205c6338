/// Failed rounds tolerated back-to-back before the collector gives up.
pub const MAX_CONSECUTIVE_FAILURES: usize = 3;

/// Two issues with different fingerprints still count as the same finding
/// at or above this similarity.
pub const SIMILARITY_THRESHOLD: f64 = 0.7;

/// Baseline the comparison quality score deducts from.
pub const QUALITY_SCORE_BASELINE: f64 = 100.0;

/// Fixed issues earn back this fraction of their severity weight.
pub const FIXED_CREDIT_FACTOR: f64 = 0.5;

pub const CONFIG_DIR_NAME: &str = ".revlyzer";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const CACHE_DIR_NAME: &str = "cache";
