use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockStatus {
    InStock,
    SoldOut,
    Unknown,
    Error,
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::InStock => "IN_STOCK",
            StockStatus::SoldOut => "SOLD_OUT",
            StockStatus::Unknown => "UNKNOWN",
            StockStatus::Error => "ERROR",
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single persisted record, keyed implicitly by the status file path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusRecord {
    #[serde(deserialize_with = "local_timestamp")]
    pub timestamp: DateTime<Local>,
    pub status: StockStatus,
    pub pincode: String,
    pub product_url: String,
}

impl StatusRecord {
    pub fn now(status: StockStatus, pincode: &str, product_url: &str) -> Self {
        Self {
            timestamp: Local::now(),
            status,
            pincode: pincode.to_string(),
            product_url: product_url.to_string(),
        }
    }
}

/// Accepts RFC 3339, or an ISO timestamp without offset read as local time.
fn local_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Local>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(timestamp.with_timezone(&Local));
    }
    let naive = NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map_err(serde::de::Error::custom)?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| serde::de::Error::custom(format!("{} does not exist in local time", raw)))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Min,
    Low,
    Default,
    #[default]
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Min => "min",
            Priority::Low => "low",
            Priority::Default => "default",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub topic: String,
    pub title: String,
    pub message: String,
    pub priority: Priority,
    pub tags: BTreeSet<String>,
}

impl NotificationRequest {
    pub fn tags_header(&self) -> String {
        self.tags.iter().cloned().collect::<Vec<_>>().join(",")
    }
}

/// Snapshot of a located element as seen by the page session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementState {
    pub text: String,
    pub visible: bool,
    pub enabled: bool,
}

impl ElementState {
    pub fn is_interactable(&self) -> bool {
        self.visible && self.enabled
    }
}

/// What a lookup of the stock marker produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerProbe {
    Absent,
    Present { text: String, visible: bool },
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStep {
    LoadPage,
    SubmitLocation,
    ConfirmLocation,
    Classify,
}

impl fmt::Display for CheckStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CheckStep::LoadPage => "load product page",
            CheckStep::SubmitLocation => "submit location",
            CheckStep::ConfirmLocation => "confirm location",
            CheckStep::Classify => "classify stock status",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckResult {
    pub status: StockStatus,
    pub failed_step: Option<CheckStep>,
    pub failure: Option<String>,
    pub product_name: Option<String>,
    pub previous_status: Option<StockStatus>,
    pub notification_sent: bool,
    pub notification_delivered: bool,
}

impl CheckResult {
    pub fn classified(status: StockStatus, previous_status: Option<StockStatus>) -> Self {
        Self {
            status,
            failed_step: None,
            failure: None,
            product_name: None,
            previous_status,
            notification_sent: false,
            notification_delivered: false,
        }
    }

    pub fn failed(step: CheckStep, failure: String, previous_status: Option<StockStatus>) -> Self {
        Self {
            status: StockStatus::Error,
            failed_step: Some(step),
            failure: Some(failure),
            ..Self::classified(StockStatus::Error, previous_status)
        }
    }

    pub fn is_success(&self) -> bool {
        self.status != StockStatus::Error && self.failed_step.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_in_screaming_case() {
        let json = serde_json::to_string(&StockStatus::SoldOut).unwrap();
        assert_eq!(json, "\"SOLD_OUT\"");
        let parsed: StockStatus = serde_json::from_str("\"IN_STOCK\"").unwrap();
        assert_eq!(parsed, StockStatus::InStock);
    }

    #[test]
    fn test_record_uses_legacy_field_names() {
        let record = StatusRecord::now(StockStatus::InStock, "641014", "https://shop.example/p");
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["status"], "IN_STOCK");
        assert_eq!(value["pincode"], "641014");
        assert_eq!(value["product_url"], "https://shop.example/p");
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn test_record_without_offset_is_read_as_local_time() {
        let record: StatusRecord = serde_json::from_str(
            r#"{"timestamp": "2026-10-16T09:30:00.123456", "status": "SOLD_OUT",
                "pincode": "641014", "product_url": "https://shop.example/p"}"#,
        )
        .unwrap();
        assert_eq!(
            record.timestamp.naive_local(),
            NaiveDateTime::parse_from_str("2026-10-16T09:30:00.123456", "%Y-%m-%dT%H:%M:%S%.f")
                .unwrap()
        );
        assert_eq!(record.status, StockStatus::SoldOut);
    }

    #[test]
    fn test_record_with_garbage_timestamp_is_rejected() {
        let parsed = serde_json::from_str::<StatusRecord>(
            r#"{"timestamp": "yesterday", "status": "SOLD_OUT",
                "pincode": "641014", "product_url": "https://shop.example/p"}"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn test_tags_header_is_sorted_and_deduplicated() {
        let request = NotificationRequest {
            topic: "t".to_string(),
            title: "Stock Alert".to_string(),
            message: "m".to_string(),
            priority: Priority::High,
            tags: ["stock", "shopping", "stock"]
                .into_iter()
                .map(String::from)
                .collect(),
        };
        assert_eq!(request.tags_header(), "shopping,stock");
    }

    #[test]
    fn test_failed_result_is_not_success() {
        let result = CheckResult::failed(CheckStep::LoadPage, "timeout".to_string(), None);
        assert_eq!(result.status, StockStatus::Error);
        assert!(!result.is_success());
        assert!(CheckResult::classified(StockStatus::Unknown, None).is_success());
    }
}
