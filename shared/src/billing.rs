//! Quality-based billing calculator
//!
//! Given a quality label, all lots sharing that label are totalled and run
//! through a fixed price chain:
//!
//! ```text
//! base     = (total weight / 100) × trade price
//! wastage  = base × 8%
//! delivery = 720
//! final    = base + wastage + delivery + repacking
//! ```
//!
//! Values keep full `f64` precision; rounding happens only when a result is
//! turned into a display view (see [`crate::types`]).

use std::collections::HashSet;

use thiserror::Error;

use crate::models::{LotRecord, PriceBasis, PriceBreakdown, PricingRates, QualityAggregate};
use crate::store::{RecordStore, StoreError};
use crate::validation::{validate_quality_label, validate_repacking_charge};

/// Billing failures, all of which are shown to the user as a message
#[derive(Error, Debug)]
pub enum BillingError {
    #[error("Please select a quality")]
    NoQualitySelected,

    #[error("No data found for quality '{0}'")]
    NoMatchingRecords(String),

    #[error("Please calculate billing first")]
    NothingCalculated,

    #[error("Repacking charge cannot be negative: {0}")]
    InvalidRepackingCharge(f64),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Distinct non-empty quality labels in first-seen order
pub fn quality_labels(records: &[LotRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter_map(LotRecord::quality_label)
        .filter(|label| seen.insert(*label))
        .map(str::to_string)
        .collect()
}

/// Total up every record whose quality equals `quality` exactly
///
/// The representative price is the first matching record's price.
pub fn aggregate(quality: &str, records: &[LotRecord]) -> Result<QualityAggregate, BillingError> {
    aggregate_with(quality, records, PriceBasis::FirstRecord)
}

pub fn aggregate_with(
    quality: &str,
    records: &[LotRecord],
    price_basis: PriceBasis,
) -> Result<QualityAggregate, BillingError> {
    validate_quality_label(quality).map_err(|_| BillingError::NoQualitySelected)?;

    let matching: Vec<LotRecord> = records
        .iter()
        .filter(|r| r.has_quality(quality))
        .cloned()
        .collect();

    if matching.is_empty() {
        return Err(BillingError::NoMatchingRecords(quality.to_string()));
    }

    let total_weight = matching.iter().map(LotRecord::weight_or_zero).sum();
    let total_bags = matching.iter().map(|r| u64::from(r.bags_or_zero())).sum();

    let mut aggregate = QualityAggregate {
        quality: quality.to_string(),
        total_weight,
        total_bags,
        trade_price: 0.0,
        price_basis,
        records: matching,
    };
    aggregate.trade_price = match price_basis {
        PriceBasis::FirstRecord => aggregate.first_record_price(),
        PriceBasis::WeightedAverage => aggregate.weighted_average_price(),
    };

    Ok(aggregate)
}

/// Price chain with the standard 8% wastage and 720 delivery charge
///
/// A missing or non-finite repacking charge counts as zero.
pub fn compute_prices(aggregate: &QualityAggregate, repacking_charge: Option<f64>) -> PriceBreakdown {
    compute_prices_with(aggregate, repacking_charge, &PricingRates::default())
}

pub fn compute_prices_with(
    aggregate: &QualityAggregate,
    repacking_charge: Option<f64>,
    rates: &PricingRates,
) -> PriceBreakdown {
    let base_price = (aggregate.total_weight / 100.0) * aggregate.trade_price;
    let wastage = base_price * rates.wastage_fraction();
    let repacking_charge = repacking_charge.filter(|c| c.is_finite()).unwrap_or(0.0);

    PriceBreakdown::new(base_price, wastage, rates.delivery_charge, repacking_charge)
}

/// Read a repacking charge the way a browser number field is read
///
/// Leading whitespace is skipped and the longest numeric prefix is used
/// (`"150 rs"` is 150). Empty, unparsable or non-finite input is 0.
pub fn parse_repacking_charge(input: &str) -> f64 {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut digits = int_end - end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        let frac_digits = frac_end - (end + 1);
        if digits + frac_digits > 0 {
            digits += frac_digits;
            end = frac_end;
        }
    }
    if digits == 0 {
        return 0.0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    match s[..end].parse::<f64>() {
        Ok(value) if value.is_finite() && value != 0.0 => value,
        _ => 0.0,
    }
}

/// Current result held by a [`BillingCalculator`]
#[derive(Debug, Clone, Copy)]
pub struct BillingStatement<'a> {
    pub aggregate: &'a QualityAggregate,
    pub prices: PriceBreakdown,
}

#[derive(Debug)]
struct Calculation {
    aggregate: QualityAggregate,
    prices: PriceBreakdown,
}

/// Select-then-adjust billing over an explicit record store
///
/// Selecting a quality reloads the store and rebuilds the aggregate; editing
/// the repacking charge only recomputes the final price from the cached base
/// price and wastage. A failed selection clears the previous result.
#[derive(Debug)]
pub struct BillingCalculator<S> {
    store: S,
    rates: PricingRates,
    price_basis: PriceBasis,
    repacking_charge: f64,
    current: Option<Calculation>,
}

impl<S: RecordStore> BillingCalculator<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            rates: PricingRates::default(),
            price_basis: PriceBasis::default(),
            repacking_charge: 0.0,
            current: None,
        }
    }

    pub fn with_rates(mut self, rates: PricingRates) -> Self {
        self.rates = rates;
        self
    }

    pub fn with_price_basis(mut self, price_basis: PriceBasis) -> Self {
        self.price_basis = price_basis;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn quality_labels(&self) -> Result<Vec<String>, BillingError> {
        Ok(self.store.load_quality_labels()?)
    }

    /// Aggregate `quality` and price it with the current repacking charge
    pub fn select(&mut self, quality: &str) -> Result<&QualityAggregate, BillingError> {
        self.current = None;

        let records = self.store.load_lot_records()?;
        let aggregate = aggregate_with(quality, &records, self.price_basis)?;
        let prices = compute_prices_with(&aggregate, Some(self.repacking_charge), &self.rates);

        let calculation = self.current.insert(Calculation { aggregate, prices });
        Ok(&calculation.aggregate)
    }

    /// Apply raw repacking charge input
    ///
    /// The charge is remembered for later selections even when nothing has
    /// been calculated yet.
    pub fn set_repacking_charge(&mut self, input: &str) -> Result<Option<PriceBreakdown>, BillingError> {
        let charge = parse_repacking_charge(input);
        validate_repacking_charge(charge)
            .map_err(|_| BillingError::InvalidRepackingCharge(charge))?;
        self.repacking_charge = charge;

        Ok(self.current.as_mut().map(|calculation| {
            calculation.prices = calculation.prices.with_repacking_charge(charge);
            calculation.prices
        }))
    }

    pub fn repacking_charge(&self) -> f64 {
        self.repacking_charge
    }

    /// Result of the last successful selection
    pub fn statement(&self) -> Result<BillingStatement<'_>, BillingError> {
        self.current
            .as_ref()
            .map(|calculation| BillingStatement {
                aggregate: &calculation.aggregate,
                prices: calculation.prices,
            })
            .ok_or(BillingError::NothingCalculated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;

    fn record(quality: &str, weight: Option<f64>, price: f64, bags: u32) -> LotRecord {
        LotRecord {
            quality: Some(quality.to_string()),
            total_weight: weight,
            trade_price: Some(price),
            no_of_bags: Some(bags),
            ..Default::default()
        }
    }

    #[test]
    fn test_grade_a_scenario() {
        let records = vec![record("Grade A", Some(1500.0), 12000.0, 50)];
        let aggregate = aggregate("Grade A", &records).unwrap();
        assert_eq!(aggregate.total_weight, 1500.0);
        assert_eq!(aggregate.total_bags, 50);
        assert_eq!(aggregate.trade_price, 12000.0);

        let prices = compute_prices(&aggregate, Some(0.0));
        assert_eq!(prices.base_price, 180000.0);
        assert_eq!(prices.wastage, 14400.0);
        assert_eq!(prices.delivery_charge, 720.0);
        assert_eq!(prices.final_price, 195120.0);
    }

    #[test]
    fn test_first_record_price_not_averaged() {
        let records = vec![
            record("Grade B", Some(900.0), 11500.0, 30),
            record("Grade A", Some(1500.0), 12000.0, 50),
            record("Grade B", Some(600.0), 11000.0, 20),
        ];
        let aggregate = aggregate("Grade B", &records).unwrap();
        assert_eq!(aggregate.total_weight, 1500.0);
        assert_eq!(aggregate.total_bags, 50);
        assert_eq!(aggregate.trade_price, 11500.0);
        assert_eq!(aggregate.lot_count(), 2);
    }

    #[test]
    fn test_weighted_average_basis() {
        let records = vec![
            record("Grade B", Some(900.0), 11500.0, 30),
            record("Grade B", Some(600.0), 11000.0, 20),
        ];
        let aggregate = aggregate_with("Grade B", &records, PriceBasis::WeightedAverage).unwrap();
        assert!((aggregate.trade_price - 11300.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_weight_contributes_zero() {
        let records = vec![
            record("Grade C", None, 10000.0, 10),
            record("Grade C", Some(250.0), 10500.0, 5),
        ];
        let aggregate = aggregate("Grade C", &records).unwrap();
        assert_eq!(aggregate.total_weight, 250.0);
        assert_eq!(aggregate.trade_price, 10000.0);
    }

    #[test]
    fn test_no_quality_selected() {
        let records = vec![record("Grade A", Some(1500.0), 12000.0, 50)];
        assert!(matches!(
            aggregate("", &records),
            Err(BillingError::NoQualitySelected)
        ));
    }

    #[test]
    fn test_label_match_is_exact() {
        let records = vec![record("Grade A", Some(1500.0), 12000.0, 50)];
        assert!(matches!(
            aggregate("grade a", &records),
            Err(BillingError::NoMatchingRecords(_))
        ));
        assert!(matches!(
            aggregate("Grade A ", &records),
            Err(BillingError::NoMatchingRecords(_))
        ));
    }

    #[test]
    fn test_non_finite_repacking_counts_as_zero() {
        let records = vec![record("Grade A", Some(1500.0), 12000.0, 50)];
        let aggregate = aggregate("Grade A", &records).unwrap();
        assert_eq!(compute_prices(&aggregate, Some(f64::NAN)).final_price, 195120.0);
        assert_eq!(compute_prices(&aggregate, None).final_price, 195120.0);
    }

    #[test]
    fn test_quality_labels_first_seen_order() {
        let records = vec![
            record("Grade B", None, 0.0, 0),
            record("", None, 0.0, 0),
            record("Grade A", None, 0.0, 0),
            record("Grade B", None, 0.0, 0),
        ];
        assert_eq!(quality_labels(&records), vec!["Grade B", "Grade A"]);
    }

    #[test]
    fn test_parse_repacking_charge() {
        assert_eq!(parse_repacking_charge("250"), 250.0);
        assert_eq!(parse_repacking_charge("  12.5"), 12.5);
        assert_eq!(parse_repacking_charge("150 rs"), 150.0);
        assert_eq!(parse_repacking_charge(".5"), 0.5);
        assert_eq!(parse_repacking_charge("3."), 3.0);
        assert_eq!(parse_repacking_charge("1e3"), 1000.0);
        assert_eq!(parse_repacking_charge("2e"), 2.0);
        assert_eq!(parse_repacking_charge("-40"), -40.0);
        assert_eq!(parse_repacking_charge(""), 0.0);
        assert_eq!(parse_repacking_charge("abc"), 0.0);
        assert_eq!(parse_repacking_charge("."), 0.0);
        assert_eq!(parse_repacking_charge("-"), 0.0);
        assert_eq!(parse_repacking_charge("1e999"), 0.0);
    }

    #[test]
    fn test_calculator_select_and_adjust() {
        let store = InMemoryStore::new(vec![record("Grade A", Some(1500.0), 12000.0, 50)]);
        let mut calculator = BillingCalculator::new(store);

        assert!(matches!(
            calculator.statement(),
            Err(BillingError::NothingCalculated)
        ));

        calculator.select("Grade A").unwrap();
        assert_eq!(calculator.statement().unwrap().prices.final_price, 195120.0);

        let prices = calculator.set_repacking_charge("500").unwrap().unwrap();
        assert_eq!(prices.base_price, 180000.0);
        assert_eq!(prices.final_price, 195620.0);
    }

    #[test]
    fn test_calculator_keeps_charge_across_selections() {
        let store = InMemoryStore::new(vec![
            record("Grade A", Some(1500.0), 12000.0, 50),
            record("Grade B", Some(100.0), 10000.0, 4),
        ]);
        let mut calculator = BillingCalculator::new(store);

        assert!(calculator.set_repacking_charge("80").unwrap().is_none());
        calculator.select("Grade B").unwrap();

        let statement = calculator.statement().unwrap();
        assert_eq!(statement.prices.repacking_charge, 80.0);
        assert_eq!(statement.prices.final_price, 10000.0 + 800.0 + 720.0 + 80.0);
    }

    #[test]
    fn test_calculator_failed_selection_clears_result() {
        let store = InMemoryStore::new(vec![record("Grade A", Some(1500.0), 12000.0, 50)]);
        let mut calculator = BillingCalculator::new(store);

        calculator.select("Grade A").unwrap();
        assert!(calculator.select("Grade Z").is_err());
        assert!(matches!(
            calculator.statement(),
            Err(BillingError::NothingCalculated)
        ));
    }

    #[test]
    fn test_calculator_rejects_negative_charge() {
        let mut calculator = BillingCalculator::new(InMemoryStore::default());
        assert!(matches!(
            calculator.set_repacking_charge("-10"),
            Err(BillingError::InvalidRepackingCharge(_))
        ));
        assert_eq!(calculator.repacking_charge(), 0.0);
    }

    #[test]
    fn test_calculator_custom_rates() {
        let store = InMemoryStore::new(vec![record("Grade A", Some(1000.0), 10000.0, 40)]);
        let mut calculator = BillingCalculator::new(store).with_rates(PricingRates {
            wastage_percent: 10.0,
            delivery_charge: 500.0,
        });

        calculator.select("Grade A").unwrap();
        let prices = calculator.statement().unwrap().prices;
        assert_eq!(prices.base_price, 100000.0);
        assert_eq!(prices.wastage, 10000.0);
        assert_eq!(prices.final_price, 110500.0);
    }
}
