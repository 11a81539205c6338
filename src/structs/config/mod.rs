pub mod backend_config;
pub mod collector_config;
pub mod config;
