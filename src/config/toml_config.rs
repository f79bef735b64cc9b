use crate::domain::model::Priority;
use crate::utils::error::{CheckerError, Result};
use crate::utils::log_maintenance::DEFAULT_MAX_LOG_BYTES;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckerConfig {
    pub product: ProductConfig,
    pub notification: NotificationConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub selectors: SelectorConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductConfig {
    pub url: String,
    pub location_code: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyPolicy {
    /// Notify on every run that observes IN_STOCK.
    #[default]
    EveryInStock,
    /// Notify only when the stored status was not already IN_STOCK.
    OnTransition,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    pub topic: String,
    #[serde(default = "default_service_url")]
    pub service_url: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default = "default_tags")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub policy: NotifyPolicy,
    #[serde(default = "default_notify_timeout")]
    pub timeout_seconds: u64,
}

fn default_service_url() -> String {
    "https://ntfy.sh".to_string()
}

fn default_title() -> String {
    "Stock Alert".to_string()
}

fn default_tags() -> Vec<String> {
    vec!["shopping".to_string(), "stock".to_string()]
}

fn default_notify_timeout() -> u64 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub status_file: PathBuf,
    pub cron_log_file: PathBuf,
    pub cron_log_max_bytes: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            status_file: PathBuf::from("stock_status.json"),
            cron_log_file: PathBuf::from("log/stock-checker.log"),
            cron_log_max_bytes: DEFAULT_MAX_LOG_BYTES,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub headless: bool,
    pub user_agent: String,
    pub window_width: u32,
    pub window_height: u32,
    pub request_timeout_seconds: u64,
    /// Attach to an already running Chrome instead of launching one.
    pub remote_debugging_url: Option<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: false,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            window_width: 1920,
            window_height: 1080,
            request_timeout_seconds: 30,
            remote_debugging_url: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub page_load_timeout_seconds: u64,
    pub input_attempts: u32,
    pub input_interval_ms: u64,
    pub debounce_ms: u64,
    pub suggestion_timeout_seconds: u64,
    pub settle_ms: u64,
    pub poll_interval_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            page_load_timeout_seconds: 15,
            input_attempts: 10,
            input_interval_ms: 1000,
            debounce_ms: 2000,
            suggestion_timeout_seconds: 15,
            settle_ms: 3000,
            poll_interval_ms: 250,
        }
    }
}

impl TimingConfig {
    pub fn page_load_timeout(&self) -> Duration {
        Duration::from_secs(self.page_load_timeout_seconds)
    }

    pub fn input_interval(&self) -> Duration {
        Duration::from_millis(self.input_interval_ms)
    }

    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn suggestion_timeout(&self) -> Duration {
        Duration::from_secs(self.suggestion_timeout_seconds)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub landmark: String,
    pub location_input: String,
    pub suggestion: String,
    pub suggestion_label: String,
    pub stock_marker: String,
    pub sold_out_phrase: String,
    pub product_name: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            landmark: "#search".to_string(),
            location_input: "#search".to_string(),
            suggestion: "a.searchitem-name".to_string(),
            suggestion_label: "a.searchitem-name p.item-name".to_string(),
            stock_marker: "div.alert.alert-danger.mt-3".to_string(),
            sold_out_phrase: "Sold Out".to_string(),
            product_name: ".product-name".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub cron_expression: String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            cron_expression: "* * * * *".to_string(),
        }
    }
}

impl CheckerConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| CheckerError::ConfigError {
            message: format!("cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CheckerError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left
    /// in place so validation can report them.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| CheckerError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl Validate for CheckerConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("product.url", &self.product.url)?;
        validation::validate_location_code("product.location_code", &self.product.location_code)?;
        validation::validate_url("notification.service_url", &self.notification.service_url)?;
        validation::validate_topic("notification.topic", &self.notification.topic)?;
        validation::validate_positive_number(
            "notification.timeout_seconds",
            self.notification.timeout_seconds,
            1,
        )?;
        validation::validate_path(
            "storage.status_file",
            &self.storage.status_file.to_string_lossy(),
        )?;
        validation::validate_positive_number(
            "timing.input_attempts",
            u64::from(self.timing.input_attempts),
            1,
        )?;
        validation::validate_positive_number(
            "timing.poll_interval_ms",
            self.timing.poll_interval_ms,
            1,
        )?;
        validation::validate_non_empty_string("selectors.stock_marker", &self.selectors.stock_marker)?;
        validation::validate_non_empty_string(
            "selectors.sold_out_phrase",
            &self.selectors.sold_out_phrase,
        )?;
        if let Some(remote) = &self.browser.remote_debugging_url {
            validation::validate_non_empty_string("browser.remote_debugging_url", remote)?;
        }
        if self.schedule.cron_expression.split_whitespace().count() != 5 {
            return Err(CheckerError::InvalidConfigValue {
                field: "schedule.cron_expression".to_string(),
                value: self.schedule.cron_expression.clone(),
                reason: "Expected five cron fields".to_string(),
            });
        }
        Ok(())
    }
}
