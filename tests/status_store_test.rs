use chrono::DateTime;
use stock_checker::domain::model::{StatusRecord, StockStatus};
use stock_checker::domain::ports::StatusStore;
use stock_checker::JsonStatusStore;
use tempfile::TempDir;

const URL: &str = "https://shop.example.com/en/product/whey-protein";

#[tokio::test]
async fn test_save_then_load_round_trip() {
    let dir = TempDir::new().unwrap();
    let store = JsonStatusStore::new(dir.path().join("stock_status.json"));

    store
        .save(&StatusRecord::now(StockStatus::InStock, "641014", URL))
        .await;
    let record = store.load().await.unwrap();

    assert_eq!(record.status, StockStatus::InStock);
    assert_eq!(record.pincode, "641014");
    assert_eq!(record.product_url, URL);

    let raw: serde_json::Value =
        serde_json::from_slice(&std::fs::read(store.path()).unwrap()).unwrap();
    assert_eq!(raw["status"], "IN_STOCK");
    let timestamp = raw["timestamp"].as_str().unwrap();
    assert!(DateTime::parse_from_rfc3339(timestamp).is_ok());
}

#[tokio::test]
async fn test_load_without_file_returns_none() {
    let dir = TempDir::new().unwrap();
    let store = JsonStatusStore::new(dir.path().join("never-written.json"));
    assert!(store.load().await.is_none());
}

#[tokio::test]
async fn test_reads_file_written_by_hand() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stock_status.json");
    std::fs::write(
        &path,
        r#"{
  "timestamp": "2026-10-16T09:30:00+05:30",
  "status": "SOLD_OUT",
  "pincode": "641014",
  "product_url": "https://shop.example.com/en/product/whey-protein"
}"#,
    )
    .unwrap();

    let record = JsonStatusStore::new(&path).load().await.unwrap();
    assert_eq!(record.status, StockStatus::SoldOut);
    assert_eq!(
        record.timestamp,
        DateTime::parse_from_rfc3339("2026-10-16T09:30:00+05:30").unwrap()
    );
}

#[tokio::test]
async fn test_reads_timestamp_without_offset() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stock_status.json");
    std::fs::write(
        &path,
        r#"{"timestamp": "2026-10-16T09:30:00.512311", "status": "IN_STOCK", "pincode": "641014", "product_url": "https://shop.example.com/en/product/whey-protein"}"#,
    )
    .unwrap();

    let record = JsonStatusStore::new(&path).load().await.unwrap();
    assert_eq!(record.status, StockStatus::InStock);
    assert_eq!(
        record.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
        "2026-10-16 09:30:00"
    );
}
