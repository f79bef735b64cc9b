use crate::config::toml_config::{CheckerConfig, NotifyPolicy};
use crate::core::classify::{classify, extract_display_name};
use crate::domain::model::{
    CheckResult, CheckStep, ElementState, MarkerProbe, NotificationRequest, StatusRecord,
    StockStatus,
};
use crate::domain::ports::{Notifier, PageSession, StatusStore};
use crate::utils::error::{CheckerError, Result};
use std::time::Duration;
use tokio::time::{sleep, Instant};

const FALLBACK_PRODUCT_NAME: &str = "Product";

/// One end-to-end stock determination for a single product and location.
pub struct StockCheckWorkflow<N: Notifier, S: StatusStore> {
    config: CheckerConfig,
    notifier: N,
    store: S,
}

struct Classification {
    status: StockStatus,
    product_name: Option<String>,
}

fn failed_at(
    step: CheckStep,
    error: CheckerError,
    previous_status: Option<StockStatus>,
) -> CheckResult {
    tracing::error!("✗ Step '{}' failed: {}", step, error);
    tracing::debug!("Suggestion: {}", error.recovery_suggestion());
    CheckResult::failed(step, error.to_string(), previous_status)
}

impl<N: Notifier, S: StatusStore> StockCheckWorkflow<N, S> {
    pub fn new(config: CheckerConfig, notifier: N, store: S) -> Self {
        Self {
            config,
            notifier,
            store,
        }
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Runs every step against `session` and closes it exactly once,
    /// whichever step stopped the run.
    pub async fn run<P: PageSession>(&self, mut session: P) -> CheckResult {
        tracing::info!(
            "🚀 Starting stock check for {} (location {})",
            self.config.product.url,
            self.config.product.location_code
        );

        let previous = self.store.load().await;
        let previous_status = previous.as_ref().map(|record| record.status);

        let result = self.run_steps(&session, previous_status).await;

        match session.close().await {
            Ok(()) => tracing::info!("🧹 Browser closed"),
            Err(e) => tracing::error!("⚠️ Error during cleanup: {}", e),
        }

        result
    }

    async fn run_steps<P: PageSession>(
        &self,
        session: &P,
        previous_status: Option<StockStatus>,
    ) -> CheckResult {
        if let Err(e) = self.load_page(session).await {
            return failed_at(CheckStep::LoadPage, e, previous_status);
        }
        if let Err(e) = self.submit_location(session).await {
            return failed_at(CheckStep::SubmitLocation, e, previous_status);
        }
        if let Err(e) = self.confirm_location(session).await {
            return failed_at(CheckStep::ConfirmLocation, e, previous_status);
        }
        let classification = match self.classify_page(session).await {
            Ok(classification) => classification,
            Err(e) => return failed_at(CheckStep::Classify, e, previous_status),
        };

        let mut result = CheckResult::classified(classification.status, previous_status);
        result.product_name = classification.product_name;

        if result.status == StockStatus::InStock && self.should_notify(previous_status) {
            let name = result
                .product_name
                .as_deref()
                .unwrap_or(FALLBACK_PRODUCT_NAME);
            let request = self.build_notification(name);
            result.notification_sent = true;
            result.notification_delivered = self.notifier.send(&request).await;
        } else if result.status == StockStatus::InStock {
            tracing::info!("🔕 Already notified for IN_STOCK, skipping alert");
        }

        self.log_status_change(previous_status, result.status);
        tracing::info!("🎯 FINAL RESULT: {}", result.status);

        self.store
            .save(&StatusRecord::now(
                result.status,
                &self.config.product.location_code,
                &self.config.product.url,
            ))
            .await;

        result
    }

    async fn load_page<P: PageSession>(&self, session: &P) -> Result<()> {
        let url = &self.config.product.url;
        let timeout = self.config.timing.page_load_timeout();
        tracing::info!("🌐 Navigating to: {}", url);

        match tokio::time::timeout(timeout, session.navigate(url)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                return Err(CheckerError::PageLoad {
                    url: url.clone(),
                    reason: e.to_string(),
                })
            }
            Err(_) => {
                return Err(CheckerError::PageLoad {
                    url: url.clone(),
                    reason: format!("navigation timed out after {:?}", timeout),
                })
            }
        }

        let landmark = &self.config.selectors.landmark;
        if self.wait_for(session, landmark, timeout, |_| true).await.is_none() {
            return Err(CheckerError::PageLoad {
                url: url.clone(),
                reason: format!("'{}' did not appear within {:?}", landmark, timeout),
            });
        }

        tracing::info!("✓ Product page loaded");
        Ok(())
    }

    async fn submit_location<P: PageSession>(&self, session: &P) -> Result<()> {
        let selector = &self.config.selectors.location_input;
        let attempts = self.config.timing.input_attempts;
        let code = &self.config.product.location_code;
        tracing::info!("🔍 Looking for location input...");

        let mut ready = false;
        for attempt in 1..=attempts {
            match session.find(selector).await {
                Ok(Some(state)) if state.is_interactable() => {
                    ready = true;
                    break;
                }
                Ok(_) => tracing::debug!("Location input not ready (attempt {})", attempt),
                Err(e) => tracing::debug!("Location input lookup failed (attempt {}): {}", attempt, e),
            }
            if attempt < attempts {
                sleep(self.config.timing.input_interval()).await;
            }
        }
        if !ready {
            return Err(CheckerError::InputNotInteractable {
                selector: selector.clone(),
                attempts,
            });
        }

        session.clear_and_type(selector, code).await?;
        tracing::info!("✓ Entered location code: {}", code);

        // Suggestions are produced by a debounced search with no observable
        // "search finished" signal.
        tracing::info!("⏳ Waiting for search results (debouncing)...");
        sleep(self.config.timing.debounce_delay()).await;
        Ok(())
    }

    async fn confirm_location<P: PageSession>(&self, session: &P) -> Result<()> {
        let selectors = &self.config.selectors;
        let code = &self.config.product.location_code;
        tracing::info!("🔍 Looking for location in suggestions...");

        let suggestion = self
            .wait_for(
                session,
                &selectors.suggestion,
                self.config.timing.suggestion_timeout(),
                ElementState::is_interactable,
            )
            .await
            .ok_or_else(|| CheckerError::SuggestionNotFound {
                selector: selectors.suggestion.clone(),
            })?;

        let label = match session.find(&selectors.suggestion_label).await? {
            Some(label) => label.text,
            None => suggestion.text,
        };
        let label = label.trim().to_string();

        if !label.contains(code.as_str()) {
            return Err(CheckerError::LocationMismatch {
                expected: code.clone(),
                found: label,
            });
        }

        tracing::info!("✓ Found location option: {}", label);
        session.click(&selectors.suggestion).await?;
        tracing::info!("✓ Selected location option");
        Ok(())
    }

    async fn classify_page<P: PageSession>(&self, session: &P) -> Result<Classification> {
        let selectors = &self.config.selectors;
        tracing::info!("⏳ Waiting for page to settle...");
        sleep(self.config.timing.settle_delay()).await;

        if self
            .wait_for(session, "body", self.config.timing.page_load_timeout(), |_| true)
            .await
            .is_none()
        {
            return Err(CheckerError::ClassificationTimeout {
                selector: "body".to_string(),
            });
        }

        let probe = match session.find(&selectors.stock_marker).await {
            Ok(None) => MarkerProbe::Absent,
            Ok(Some(state)) => MarkerProbe::Present {
                text: state.text,
                visible: state.visible,
            },
            Err(e) => MarkerProbe::Failed(e.to_string()),
        };

        let status = classify(&probe, &selectors.sold_out_phrase);
        let mut product_name = None;
        match (&probe, status) {
            (MarkerProbe::Failed(reason), _) => {
                return Err(CheckerError::Unexpected {
                    message: format!("stock marker lookup failed: {}", reason),
                })
            }
            (_, StockStatus::SoldOut) => tracing::info!("❌ Product Status: SOLD OUT"),
            (_, StockStatus::InStock) => {
                tracing::info!("✅ Product Status: IN STOCK");
                product_name = self.read_product_name(session).await;
            }
            (MarkerProbe::Present { text, .. }, _) => {
                tracing::warn!("⚠️ Found alert but unexpected content: {}", text.trim())
            }
            _ => {}
        }

        Ok(Classification {
            status,
            product_name,
        })
    }

    async fn read_product_name<P: PageSession>(&self, session: &P) -> Option<String> {
        match session.find(&self.config.selectors.product_name).await {
            Ok(Some(state)) => Some(extract_display_name(state.text.trim()).trim().to_string()),
            Ok(None) => {
                tracing::warn!("Product name element not found");
                None
            }
            Err(e) => {
                tracing::warn!("Could not read product name: {}", e);
                None
            }
        }
    }

    fn should_notify(&self, previous_status: Option<StockStatus>) -> bool {
        match self.config.notification.policy {
            NotifyPolicy::EveryInStock => true,
            NotifyPolicy::OnTransition => previous_status != Some(StockStatus::InStock),
        }
    }

    fn build_notification(&self, product_name: &str) -> NotificationRequest {
        let notification = &self.config.notification;
        NotificationRequest {
            topic: notification.topic.clone(),
            title: notification.title.clone(),
            message: format!(
                "🚨 {} is IN STOCK! Check now: {}",
                product_name, self.config.product.url
            ),
            priority: notification.priority,
            tags: notification.tags.iter().cloned().collect(),
        }
    }

    fn log_status_change(&self, previous: Option<StockStatus>, current: StockStatus) {
        match previous {
            Some(prev) if prev == StockStatus::SoldOut && current == StockStatus::InStock => {
                tracing::info!("🚨 STOCK ALERT: Product is now IN STOCK! 🚨")
            }
            Some(prev) if prev != current => {
                tracing::info!("📊 Status changed from {} to {}", prev, current)
            }
            None => tracing::info!("📊 First recorded status: {}", current),
            _ => {}
        }
    }

    /// Polls `selector` until `ready` holds or `timeout` elapses. Lookup
    /// errors count as "not yet".
    async fn wait_for<P: PageSession>(
        &self,
        session: &P,
        selector: &str,
        timeout: Duration,
        ready: impl Fn(&ElementState) -> bool,
    ) -> Option<ElementState> {
        let deadline = Instant::now() + timeout;
        loop {
            match session.find(selector).await {
                Ok(Some(state)) if ready(&state) => return Some(state),
                Ok(_) => {}
                Err(e) => tracing::debug!("Lookup of '{}' failed: {}", selector, e),
            }
            if Instant::now() >= deadline {
                return None;
            }
            sleep(self.config.timing.poll_interval()).await;
        }
    }
}
