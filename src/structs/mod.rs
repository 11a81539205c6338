pub mod analysis_result;
pub mod cli;
pub mod comparison_result;
pub mod config;
pub mod gap_estimate;
pub mod issue;
pub mod issue_location;
pub mod iteration_record;
pub mod normalized_response;
