use crate::config::toml_config::BrowserConfig;
use crate::domain::model::ElementState;
use crate::domain::ports::PageSession;
use crate::utils::error::{CheckerError, Result};
use async_trait::async_trait;
use chromiumoxide::{Browser, Page};
use futures::StreamExt;
use serde_json::Value;
use std::time::Duration;
use tokio::task::JoinHandle;

/// A single Chrome tab driven over CDP.
pub struct ChromiumSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    closed: bool,
}

impl ChromiumSession {
    /// Launches Chrome (or attaches to `remote_debugging_url` /
    /// `CHROMIUM_REMOTE_DEBUGGING_URL`) and opens a blank tab.
    pub async fn launch(config: &BrowserConfig, headless: bool) -> Result<Self> {
        let remote_url = config
            .remote_debugging_url
            .clone()
            .or_else(|| std::env::var("CHROMIUM_REMOTE_DEBUGGING_URL").ok());

        let (browser, mut handler) = if let Some(url) = remote_url {
            tracing::info!("Connecting to remote Chrome instance at: {}", url);
            Browser::connect(url)
                .await
                .map_err(|e| CheckerError::BrowserLaunch {
                    message: format!("failed to connect to remote Chrome: {}", e),
                })?
        } else {
            let mut builder = chromiumoxide::BrowserConfig::builder()
                .no_sandbox()
                .window_size(config.window_width, config.window_height)
                .request_timeout(Duration::from_secs(config.request_timeout_seconds))
                .arg("--disable-gpu")
                .arg("--disable-dev-shm-usage");
            if !headless {
                builder = builder.with_head();
            }
            let browser_config = builder
                .build()
                .map_err(|message| CheckerError::BrowserLaunch { message })?;

            Browser::launch(browser_config)
                .await
                .map_err(|e| CheckerError::BrowserLaunch {
                    message: e.to_string(),
                })?
        };

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| CheckerError::BrowserLaunch {
                message: e.to_string(),
            })?;
        page.set_user_agent(config.user_agent.as_str()).await?;

        tracing::info!("✓ Chrome session started (headless: {})", headless);
        Ok(Self {
            browser,
            page,
            handler,
            closed: false,
        })
    }
}

/// Builds a script that snapshots the first element matching `selector`, or
/// yields `null`.
fn element_state_script(selector: &str) -> Result<String> {
    let selector = serde_json::to_string(selector)?;
    Ok(format!(
        r#"(() => {{
    const el = document.querySelector({selector});
    if (!el) return null;
    const style = window.getComputedStyle(el);
    const rect = el.getBoundingClientRect();
    return {{
        text: (el.innerText || el.textContent || "").toString(),
        visible: style.display !== "none" && style.visibility !== "hidden" && rect.width > 0 && rect.height > 0,
        enabled: !el.disabled,
    }};
}})()"#
    ))
}

/// JS `null` comes back from CDP with no `value` at all.
fn element_from_value(value: Option<&Value>) -> Result<Option<ElementState>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
    }
}

fn clear_field_script(selector: &str) -> Result<String> {
    let selector = serde_json::to_string(selector)?;
    Ok(format!(
        r#"(() => {{
    const el = document.querySelector({selector});
    if (!el) return false;
    el.value = "";
    el.dispatchEvent(new Event("input", {{ bubbles: true }}));
    return true;
}})()"#
    ))
}

#[async_trait]
impl PageSession for ChromiumSession {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.page.goto(url).await?;
        Ok(())
    }

    async fn find(&self, selector: &str) -> Result<Option<ElementState>> {
        let result = self.page.evaluate(element_state_script(selector)?).await?;
        element_from_value(result.value())
    }

    async fn clear_and_type(&self, selector: &str, text: &str) -> Result<()> {
        let cleared: bool = self
            .page
            .evaluate(clear_field_script(selector)?)
            .await?
            .into_value()?;
        if !cleared {
            return Err(CheckerError::Browser {
                message: format!("no element matches '{}'", selector),
            });
        }

        let element = self.page.find_element(selector).await?;
        element.click().await?;
        element.type_str(text).await?;
        Ok(())
    }

    async fn click(&self, selector: &str) -> Result<()> {
        self.page.find_element(selector).await?.click().await?;
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let outcome = self.browser.close().await;
        if let Err(e) = self.browser.wait().await {
            tracing::debug!("Waiting for browser exit failed: {}", e);
        }
        self.handler.abort();
        outcome?;
        Ok(())
    }
}
