use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckerError {
    #[error("Failed to load product page {url}: {reason}")]
    PageLoad { url: String, reason: String },

    #[error("Location input '{selector}' not interactable after {attempts} attempts")]
    InputNotInteractable { selector: String, attempts: u32 },

    #[error("Expected location {expected} but suggestion shows '{found}'")]
    LocationMismatch { expected: String, found: String },

    #[error("Location suggestion '{selector}' did not appear")]
    SuggestionNotFound { selector: String },

    #[error("Page did not settle while waiting for '{selector}'")]
    ClassificationTimeout { selector: String },

    #[error("Unexpected error: {message}")]
    Unexpected { message: String },

    #[error("Failed to start browser session: {message}")]
    BrowserLaunch { message: String },

    #[error("Browser command failed: {message}")]
    Browser { message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfig { field: String },

    #[error("Schedule management failed: {message}")]
    Schedule { message: String },
}

impl From<chromiumoxide::error::CdpError> for CheckerError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        CheckerError::Browser {
            message: err.to_string(),
        }
    }
}

impl CheckerError {
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            CheckerError::PageLoad { .. } => {
                "Check network connectivity and that the product URL is still valid"
            }
            CheckerError::InputNotInteractable { .. } | CheckerError::SuggestionNotFound { .. } => {
                "The page layout may have changed; review the [selectors] section"
            }
            CheckerError::LocationMismatch { .. } => {
                "Verify product.location_code is a deliverable location"
            }
            CheckerError::ClassificationTimeout { .. } => {
                "Increase timing.page_load_timeout_seconds or retry later"
            }
            CheckerError::BrowserLaunch { .. } => {
                "Make sure Chrome/Chromium is installed and on PATH, or set browser.remote_debugging_url"
            }
            CheckerError::ConfigError { .. }
            | CheckerError::InvalidConfigValue { .. }
            | CheckerError::MissingConfig { .. } => "Fix the configuration file and run again",
            CheckerError::Schedule { .. } => "Make sure crontab is available on this system",
            _ => "Re-run with --verbose for more detail",
        }
    }
}

pub type Result<T> = std::result::Result<T, CheckerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatch_message_names_both_locations() {
        let err = CheckerError::LocationMismatch {
            expected: "641014".to_string(),
            found: "560001 - Bengaluru".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("641014"));
        assert!(message.contains("560001 - Bengaluru"));
    }

    #[test]
    fn test_browser_launch_suggests_install() {
        let err = CheckerError::BrowserLaunch {
            message: "no executable".to_string(),
        };
        assert!(err.recovery_suggestion().contains("Chrome"));
    }
}
