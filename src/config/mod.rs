pub mod toml_config;

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "stock-checker")]
#[command(about = "Checks product stock for a delivery location and sends push alerts")]
pub struct CliArgs {
    /// Run in cron mode (headless, minimal output)
    #[arg(long)]
    pub cron: bool,

    /// Install the recurring crontab entry
    #[arg(long)]
    pub setup_cron: bool,

    /// Remove the crontab entry
    #[arg(long)]
    pub remove_cron: bool,

    /// Show the last stored stock status
    #[arg(long)]
    pub status: bool,

    /// Run the browser headless
    #[arg(long)]
    pub headless: bool,

    /// Custom log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(short, long, default_value = "stock-checker.toml")]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    SetupCron,
    RemoveCron,
    ShowStatus,
    Check { headless: bool, quiet: bool },
}

#[cfg(feature = "cli")]
impl CliArgs {
    /// First matching flag wins, in the order listed by `RunMode`.
    pub fn mode(&self) -> RunMode {
        if self.setup_cron {
            RunMode::SetupCron
        } else if self.remove_cron {
            RunMode::RemoveCron
        } else if self.status {
            RunMode::ShowStatus
        } else {
            RunMode::Check {
                headless: self.headless || self.cron,
                quiet: self.cron,
            }
        }
    }
}
