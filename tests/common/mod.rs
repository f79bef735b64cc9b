#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Arc, Mutex};
use stock_checker::domain::model::{ElementState, NotificationRequest};
use stock_checker::domain::ports::{Notifier, PageSession};
use stock_checker::{CheckerConfig, CheckerError, Result};

pub const PRODUCT_URL: &str = "https://shop.example.com/en/product/whey-protein";
pub const LOCATION: &str = "641014";

pub fn test_config(status_file: &Path, policy: &str) -> CheckerConfig {
    let status_file = status_file.to_string_lossy().replace('\\', "/");
    let toml_content = format!(
        r#"
[product]
url = "{PRODUCT_URL}"
location_code = "{LOCATION}"

[notification]
topic = "stock-alerts"
policy = "{policy}"

[storage]
status_file = "{status_file}"

[timing]
page_load_timeout_seconds = 1
input_attempts = 3
input_interval_ms = 5
debounce_ms = 0
suggestion_timeout_seconds = 1
settle_ms = 0
poll_interval_ms = 5
"#
    );
    CheckerConfig::from_toml_str(&toml_content).unwrap()
}

pub fn element(text: &str) -> ElementState {
    ElementState {
        text: text.to_string(),
        visible: true,
        enabled: true,
    }
}

#[derive(Default)]
struct PageState {
    elements: HashMap<String, ElementState>,
    after_type: HashMap<String, ElementState>,
    after_click: HashMap<String, ElementState>,
    navigation_error: Option<String>,
    failing_lookups: HashSet<String>,
    navigations: Vec<String>,
    typed: Vec<(String, String)>,
    clicks: Vec<String>,
    close_count: usize,
}

/// Scripted page: elements can appear after typing or after a click.
/// Clones share state so a test can inspect the page after handing it over.
#[derive(Clone, Default)]
pub struct FakePage {
    state: Arc<Mutex<PageState>>,
}

impl FakePage {
    pub fn new() -> Self {
        Self::default()
    }

    /// A product page where typing the location reveals one suggestion and
    /// clicking it loads the product view.
    pub fn product_page(suggestion_label: &str) -> Self {
        Self::new()
            .with("#search", element(""))
            .with("body", element(""))
            .after_typing("a.searchitem-name", element(suggestion_label))
            .after_typing("a.searchitem-name p.item-name", element(suggestion_label))
    }

    pub fn with(self, selector: &str, state: ElementState) -> Self {
        self.lock().elements.insert(selector.to_string(), state);
        self
    }

    pub fn after_typing(self, selector: &str, state: ElementState) -> Self {
        self.lock().after_type.insert(selector.to_string(), state);
        self
    }

    pub fn after_click(self, selector: &str, state: ElementState) -> Self {
        self.lock().after_click.insert(selector.to_string(), state);
        self
    }

    pub fn failing_navigation(self, message: &str) -> Self {
        self.lock().navigation_error = Some(message.to_string());
        self
    }

    pub fn failing_lookup(self, selector: &str) -> Self {
        self.lock().failing_lookups.insert(selector.to_string());
        self
    }

    pub fn close_count(&self) -> usize {
        self.lock().close_count
    }

    pub fn clicks(&self) -> Vec<String> {
        self.lock().clicks.clone()
    }

    pub fn typed(&self) -> Vec<(String, String)> {
        self.lock().typed.clone()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.lock().navigations.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PageState> {
        self.state.lock().unwrap()
    }
}

#[async_trait]
impl PageSession for FakePage {
    async fn navigate(&self, url: &str) -> Result<()> {
        let mut state = self.lock();
        state.navigations.push(url.to_string());
        match &state.navigation_error {
            Some(message) => Err(CheckerError::Browser {
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    async fn find(&self, selector: &str) -> Result<Option<ElementState>> {
        let state = self.lock();
        if state.failing_lookups.contains(selector) {
            return Err(CheckerError::Browser {
                message: format!("lookup of {} failed", selector),
            });
        }
        Ok(state.elements.get(selector).cloned())
    }

    async fn clear_and_type(&self, selector: &str, text: &str) -> Result<()> {
        let mut state = self.lock();
        state.typed.push((selector.to_string(), text.to_string()));
        let revealed: Vec<_> = state.after_type.drain().collect();
        state.elements.extend(revealed);
        Ok(())
    }

    async fn click(&self, selector: &str) -> Result<()> {
        let mut state = self.lock();
        state.clicks.push(selector.to_string());
        let revealed: Vec<_> = state.after_click.drain().collect();
        state.elements.extend(revealed);
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.lock().close_count += 1;
        Ok(())
    }
}

#[derive(Clone)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<NotificationRequest>>>,
    deliver: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            deliver: true,
        }
    }

    pub fn undeliverable() -> Self {
        Self {
            deliver: false,
            ..Self::new()
        }
    }

    pub fn sent(&self) -> Vec<NotificationRequest> {
        self.sent.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    async fn send(&self, request: &NotificationRequest) -> bool {
        self.sent.lock().unwrap().push(request.clone());
        self.deliver
    }
}
