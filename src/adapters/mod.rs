// Adapters layer: concrete implementations of the ports for Chrome, ntfy,
// the local filesystem and crontab.

pub mod chromium;
pub mod cron;
pub mod ntfy;
pub mod status_file;
