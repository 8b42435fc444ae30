use rust_decimal::Decimal;
use serde::Deserialize;

use super::de::{null_as_default, RawDate};

/// Promotional event running in a shop.
/// Dates are kept as the backend sent them; parsing happens on demand so a
/// malformed date shows up as "no deadline" instead of a decode failure.
#[derive(Debug, Clone, Deserialize)]
pub struct ShopEvent {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "finishDate", alias = "Finish_Date", default)]
    pub finish_date: Option<RawDate>,
    #[serde(rename = "startDate", alias = "start_Date", default)]
    pub start_date: Option<RawDate>,
    #[serde(rename = "discountPrice", default)]
    pub discount_price: Option<Decimal>,
    #[serde(rename = "originalPrice", default)]
    pub original_price: Option<Decimal>,
    #[serde(rename = "shopId", default, deserialize_with = "null_as_default")]
    pub shop_id: String,
}

impl ShopEvent {
    /// Deadline in epoch milliseconds. None when missing or unparseable.
    pub fn finish_ms(&self) -> Option<i64> {
        self.finish_date.as_ref().and_then(RawDate::to_millis)
    }

    pub fn start_ms(&self) -> Option<i64> {
        self.start_date.as_ref().and_then(RawDate::to_millis)
    }

    /// Started (or no start date) and not yet finished.
    pub fn is_running(&self, now_ms: i64) -> bool {
        let started = self.start_ms().map_or(true, |start| start <= now_ms);
        let open = self.finish_ms().is_some_and(|finish| finish > now_ms);
        started && open
    }

    /// Start date still in the future.
    pub fn is_upcoming(&self, now_ms: i64) -> bool {
        self.start_ms().is_some_and(|start| start > now_ms)
    }
}

#[cfg(test)]
pub(crate) fn shop_event(id: &str, finish_date: Option<&str>) -> ShopEvent {
    ShopEvent {
        id: id.to_string(),
        name: format!("{id} sale"),
        finish_date: finish_date.map(|raw| RawDate::Text(raw.to_string())),
        start_date: None,
        discount_price: None,
        original_price: None,
        shop_id: "shop".to_string(),
    }
}
