pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliArgs, RunMode};

pub use adapters::{chromium::ChromiumSession, ntfy::NtfyNotifier, status_file::JsonStatusStore};
pub use config::toml_config::{CheckerConfig, NotifyPolicy};
pub use core::workflow::StockCheckWorkflow;
pub use utils::error::{CheckerError, Result};
