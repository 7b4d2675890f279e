//! Quality aggregates and price breakdowns

use serde::{Deserialize, Serialize};

use super::lot::LotRecord;

/// Wastage added on top of the base price, in percent
pub const WASTAGE_PERCENT: f64 = 8.0;

/// Flat delivery charge per bill
pub const DELIVERY_CHARGE: f64 = 720.0;

/// Rates applied after the base price
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingRates {
    pub wastage_percent: f64,
    pub delivery_charge: f64,
}

impl Default for PricingRates {
    fn default() -> Self {
        Self {
            wastage_percent: WASTAGE_PERCENT,
            delivery_charge: DELIVERY_CHARGE,
        }
    }
}

impl PricingRates {
    pub fn wastage_fraction(&self) -> f64 {
        self.wastage_percent / 100.0
    }
}

/// How the representative trade price of a quality is chosen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceBasis {
    /// Price of the first matching record in storage order
    #[default]
    FirstRecord,
    /// Weight-weighted mean of the matching records' prices
    WeightedAverage,
}

impl std::fmt::Display for PriceBasis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriceBasis::FirstRecord => write!(f, "first_record"),
            PriceBasis::WeightedAverage => write!(f, "weighted_average"),
        }
    }
}

impl std::str::FromStr for PriceBasis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first" | "first_record" => Ok(PriceBasis::FirstRecord),
            "weighted" | "weighted_average" => Ok(PriceBasis::WeightedAverage),
            other => Err(format!("unknown price basis '{}'", other)),
        }
    }
}

/// Totals for every lot sharing one quality label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityAggregate {
    pub quality: String,
    pub total_weight: f64,
    pub total_bags: u64,
    /// Representative price per 100 kg, chosen by `price_basis`
    pub trade_price: f64,
    pub price_basis: PriceBasis,
    /// Matching records in storage order
    pub records: Vec<LotRecord>,
}

impl QualityAggregate {
    /// Per-lot rows in storage order
    pub fn lot_breakdown(&self) -> LotBreakdown<'_> {
        LotBreakdown {
            inner: self.records.iter(),
        }
    }

    pub fn lot_count(&self) -> usize {
        self.records.len()
    }

    pub fn first_record_price(&self) -> f64 {
        self.records.first().map(LotRecord::price_or_zero).unwrap_or(0.0)
    }

    /// Falls back to the first record's price when the lots weigh nothing
    pub fn weighted_average_price(&self) -> f64 {
        if self.total_weight == 0.0 {
            return self.first_record_price();
        }
        let weighted: f64 = self
            .records
            .iter()
            .map(|r| r.price_or_zero() * r.weight_or_zero())
            .sum();
        weighted / self.total_weight
    }
}

/// Price chain for one aggregate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub base_price: f64,
    pub wastage: f64,
    pub delivery_charge: f64,
    pub repacking_charge: f64,
    pub final_price: f64,
}

impl PriceBreakdown {
    pub fn new(base_price: f64, wastage: f64, delivery_charge: f64, repacking_charge: f64) -> Self {
        Self {
            base_price,
            wastage,
            delivery_charge,
            repacking_charge,
            final_price: base_price + wastage + delivery_charge + repacking_charge,
        }
    }

    /// Recompute the final price only, keeping base, wastage and delivery
    pub fn with_repacking_charge(&self, repacking_charge: f64) -> Self {
        Self::new(
            self.base_price,
            self.wastage,
            self.delivery_charge,
            repacking_charge,
        )
    }
}

/// One row of the lot-wise breakdown
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LotBreakdownRow<'a> {
    pub lot_code: Option<&'a str>,
    pub commission_agent: Option<&'a str>,
    pub commodity: Option<&'a str>,
    pub no_of_bags: u32,
    pub total_weight: Option<f64>,
    pub trade_price: Option<f64>,
}

impl<'a> From<&'a LotRecord> for LotBreakdownRow<'a> {
    fn from(record: &'a LotRecord) -> Self {
        Self {
            lot_code: record.lot_code.as_deref(),
            commission_agent: record.commission_agent.as_deref(),
            commodity: record.commodity.as_deref(),
            no_of_bags: record.bags_or_zero(),
            total_weight: record.total_weight,
            trade_price: record.trade_price,
        }
    }
}

/// Lazy iterator over an aggregate's lots
///
/// Clone it (or ask the aggregate again) to restart from the first lot.
#[derive(Debug, Clone)]
pub struct LotBreakdown<'a> {
    inner: std::slice::Iter<'a, LotRecord>,
}

impl<'a> Iterator for LotBreakdown<'a> {
    type Item = LotBreakdownRow<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(LotBreakdownRow::from)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for LotBreakdown<'_> {}

impl std::iter::FusedIterator for LotBreakdown<'_> {}
