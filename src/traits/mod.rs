pub mod analysis_backend;
pub mod analysis_cache;
pub mod location_resolver;
