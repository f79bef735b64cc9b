use crate::config::toml_config::NotificationConfig;
use crate::domain::model::NotificationRequest;
use crate::domain::ports::Notifier;
use crate::utils::error::Result;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Publishes to an ntfy-compatible endpoint: `POST {base_url}/{topic}`.
#[derive(Debug, Clone)]
pub struct NtfyNotifier {
    client: Client,
    base_url: String,
}

impl NtfyNotifier {
    pub fn new(config: &NotificationConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            base_url: config.service_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn publish(&self, request: &NotificationRequest) -> Result<StatusCode> {
        let url = format!("{}/{}", self.base_url, request.topic);
        tracing::debug!("Publishing notification to: {}", url);

        let response = self
            .client
            .post(&url)
            .header("Title", &request.title)
            .header("Content-Type", "text/plain; charset=utf-8")
            .header("X-Priority", request.priority.as_str())
            .header("X-Tags", request.tags_header())
            .body(request.message.clone().into_bytes())
            .send()
            .await?;

        Ok(response.status())
    }
}

impl Notifier for NtfyNotifier {
    async fn send(&self, request: &NotificationRequest) -> bool {
        match self.publish(request).await {
            Ok(StatusCode::OK) => {
                tracing::info!("📱 Notification sent to {}", request.topic);
                true
            }
            Ok(status) => {
                tracing::error!("❌ Failed to send notification: HTTP {}", status.as_u16());
                false
            }
            Err(e) => {
                tracing::error!("❌ Error sending notification: {}", e);
                false
            }
        }
    }
}
