use crate::domain::model::{ElementState, NotificationRequest, StatusRecord};
use crate::utils::error::Result;
use async_trait::async_trait;

/// One browser tab driven by the stock check.
#[async_trait]
pub trait PageSession: Send + Sync {
    async fn navigate(&self, url: &str) -> Result<()>;

    /// `Ok(None)` when nothing matches `selector`.
    async fn find(&self, selector: &str) -> Result<Option<ElementState>>;

    /// Clears the field matched by `selector` and types `text` into it.
    async fn clear_and_type(&self, selector: &str, text: &str) -> Result<()>;

    async fn click(&self, selector: &str) -> Result<()>;

    /// Releases the underlying browser. Called once per session.
    async fn close(&mut self) -> Result<()>;
}

pub trait Notifier: Send + Sync {
    /// Best effort: returns whether the service accepted the notification.
    fn send(
        &self,
        request: &NotificationRequest,
    ) -> impl std::future::Future<Output = bool> + Send;
}

pub trait StatusStore: Send + Sync {
    fn load(&self) -> impl std::future::Future<Output = Option<StatusRecord>> + Send;
    fn save(&self, record: &StatusRecord) -> impl std::future::Future<Output = ()> + Send;
}
