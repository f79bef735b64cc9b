pub mod error;
pub mod log_maintenance;
pub mod logger;
pub mod validation;
