pub mod classify;
pub mod workflow;

pub use crate::domain::model::{CheckResult, StatusRecord, StockStatus};
pub use crate::domain::ports::{Notifier, PageSession, StatusStore};
pub use crate::utils::error::Result;
