pub mod backends;
pub mod convergence_collector;
pub mod fingerprinter;
pub mod gap_estimator;
pub mod response_normalizer;
pub mod result_cache;
pub mod revision_matcher;
pub mod snippet_locator;
