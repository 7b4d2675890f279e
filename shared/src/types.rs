//! Display rounding and serializable views of billing results

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::models::{LotBreakdownRow, PriceBasis, PriceBreakdown, QualityAggregate};

/// Round a currency or weight value to 2 decimal places for display
///
/// Uses the exact binary value of the float, so `1.005` rounds down the same
/// way a browser's `toFixed(2)` does. Non-finite input displays as zero.
pub fn round_currency(value: f64) -> Decimal {
    let mut rounded = Decimal::from_f64_retain(value)
        .unwrap_or_default()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// Fixed two-decimal text, e.g. `195120.00`
pub fn format_amount(value: f64) -> String {
    round_currency(value).to_string()
}

/// Indian digit grouping, e.g. `1,80,000` or `12,345.5`
pub fn format_inr(value: f64) -> String {
    format_inr_decimal(round_currency(value))
}

/// Indian digit grouping of an already rounded amount
pub fn format_inr_decimal(value: Decimal) -> String {
    let rounded = value.normalize();
    let text = rounded.abs().to_string();
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(text.len() + 8);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        grouped.push('-');
    }
    if whole.len() <= 3 {
        grouped.push_str(whole);
    } else {
        let (head, tail) = whole.split_at(whole.len() - 3);
        let lead = head.len() % 2;
        if lead > 0 {
            grouped.push_str(&head[..lead]);
        }
        for start in (lead..head.len()).step_by(2) {
            if start > 0 {
                grouped.push(',');
            }
            grouped.push_str(&head[start..start + 2]);
        }
        grouped.push(',');
        grouped.push_str(tail);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}

/// Price breakdown rounded for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBreakdownView {
    pub base_price: Decimal,
    pub wastage: Decimal,
    pub delivery_charge: Decimal,
    pub repacking_charge: Decimal,
    pub final_price: Decimal,
}

impl From<&PriceBreakdown> for PriceBreakdownView {
    fn from(prices: &PriceBreakdown) -> Self {
        Self {
            base_price: round_currency(prices.base_price),
            wastage: round_currency(prices.wastage),
            delivery_charge: round_currency(prices.delivery_charge),
            repacking_charge: round_currency(prices.repacking_charge),
            final_price: round_currency(prices.final_price),
        }
    }
}

/// One lot row with placeholders filled in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotRowView {
    pub lot_code: String,
    pub commission_agent: String,
    pub commodity: String,
    pub no_of_bags: u32,
    pub total_weight: Option<Decimal>,
    pub trade_price: Option<Decimal>,
}

impl From<LotBreakdownRow<'_>> for LotRowView {
    fn from(row: LotBreakdownRow<'_>) -> Self {
        let or_na = |value: Option<&str>| {
            value
                .filter(|v| !v.is_empty())
                .unwrap_or("N/A")
                .to_string()
        };
        Self {
            lot_code: or_na(row.lot_code),
            commission_agent: or_na(row.commission_agent),
            commodity: or_na(row.commodity),
            no_of_bags: row.no_of_bags,
            total_weight: row.total_weight.filter(|w| *w != 0.0).map(round_currency),
            trade_price: row.trade_price.map(round_currency),
        }
    }
}

/// Everything a bill screen or printout shows for one quality
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementView {
    pub quality: String,
    pub price_basis: PriceBasis,
    pub trade_price: Decimal,
    pub total_weight: Decimal,
    pub total_bags: u64,
    pub prices: PriceBreakdownView,
    pub lots: Vec<LotRowView>,
}

impl StatementView {
    pub fn new(aggregate: &QualityAggregate, prices: &PriceBreakdown) -> Self {
        Self {
            quality: aggregate.quality.clone(),
            price_basis: aggregate.price_basis,
            trade_price: round_currency(aggregate.trade_price),
            total_weight: round_currency(aggregate.total_weight),
            total_bags: aggregate.total_bags,
            prices: prices.into(),
            lots: aggregate.lot_breakdown().map(LotRowView::from).collect(),
        }
    }
}
