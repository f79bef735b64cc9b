use crate::domain::model::{MarkerProbe, StockStatus};

/// Maps the stock marker lookup onto a status. `phrase` is matched
/// case-sensitively.
pub fn classify(probe: &MarkerProbe, phrase: &str) -> StockStatus {
    match probe {
        MarkerProbe::Absent => StockStatus::InStock,
        MarkerProbe::Present { text, visible } if *visible && text.contains(phrase) => {
            StockStatus::SoldOut
        }
        MarkerProbe::Present { .. } => StockStatus::Unknown,
        MarkerProbe::Failed(_) => StockStatus::Error,
    }
}

/// Display name used in alerts: the text before the first comma.
pub fn extract_display_name(product_text: &str) -> &str {
    match product_text.find(',') {
        Some(idx) => &product_text[..idx],
        None => product_text,
    }
}
