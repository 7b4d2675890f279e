//! Lot records as stored in the `tradeData` blob

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Delivery state of a lot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryStatus {
    Delivered,
    /// Anything unrecognised reads as pending
    #[default]
    #[serde(other)]
    Pending,
}

impl std::fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryStatus::Delivered => write!(f, "Delivered"),
            DeliveryStatus::Pending => write!(f, "Pending"),
        }
    }
}

/// One recorded batch of purchased commodity
///
/// Every field is optional on the wire: records are created by intake forms
/// that may leave any of them blank, and `null` is what the browser writes
/// for a failed number parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LotRecord {
    pub id: Option<i64>,
    pub lot_code: Option<String>,
    pub commission_agent: Option<String>,
    pub commodity: Option<String>,
    /// Whole, non-negative bag count; see [`bag_count_from_json`]
    #[serde(deserialize_with = "deserialize_bag_count")]
    pub no_of_bags: Option<u32>,
    /// Price per 100 kg
    pub trade_price: Option<f64>,
    pub quality: Option<String>,
    /// Either entered directly or the sum of `weights`
    pub total_weight: Option<f64>,
    /// Individual bag weights when the weight was entered bag-wise
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weights: Option<Vec<f64>>,
    pub delivery_status: Option<DeliveryStatus>,
}

/// Read a stored bag count the way intake forms may have written it
///
/// Fractional counts are truncated. Negative, non-finite or non-numeric
/// values read as absent, which totals count as zero bags.
pub fn bag_count_from_json(value: &Value) -> Option<u32> {
    let count = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !count.is_finite() || count < 0.0 {
        return None;
    }
    // Saturates at u32::MAX
    Some(count.trunc() as u32)
}

fn deserialize_bag_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(bag_count_from_json))
}

impl LotRecord {
    /// Quality label, if one is set and non-empty
    pub fn quality_label(&self) -> Option<&str> {
        self.quality.as_deref().filter(|q| !q.is_empty())
    }

    /// Exact, case-sensitive label match
    pub fn has_quality(&self, label: &str) -> bool {
        self.quality.as_deref() == Some(label)
    }

    pub fn status(&self) -> DeliveryStatus {
        self.delivery_status.unwrap_or_default()
    }

    pub fn bags_or_zero(&self) -> u32 {
        self.no_of_bags.unwrap_or(0)
    }

    pub fn weight_or_zero(&self) -> f64 {
        self.total_weight.unwrap_or(0.0)
    }

    pub fn price_or_zero(&self) -> f64 {
        self.trade_price.unwrap_or(0.0)
    }
}
