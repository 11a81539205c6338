pub mod backend_error;
pub mod category;
pub mod commands;
pub mod raw_response;
pub mod response_format;
pub mod severity;
pub mod termination_reason;
