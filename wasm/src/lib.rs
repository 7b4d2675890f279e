//! WebAssembly module for BMW Chilly Management
//!
//! Runs the quality-based billing calculator in the browser against the
//! `tradeData` records kept in `localStorage`. Results are handed back to
//! the page as JSON strings.

use serde::Serialize;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

use shared::{
    decode_trade_data, parse_repacking_charge, BillingCalculator, BillingError, InMemoryStore,
    RecordStore, StoreError, TRADE_DATA_KEY,
};

/// Record store over `window.localStorage`
#[derive(Debug, Clone)]
pub struct LocalStorageStore {
    key: String,
}

impl LocalStorageStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl Default for LocalStorageStore {
    fn default() -> Self {
        Self::new(TRADE_DATA_KEY)
    }
}

impl RecordStore for LocalStorageStore {
    fn load_lot_records(&self) -> Result<Vec<LotRecord>, StoreError> {
        let Some(window) = web_sys::window() else {
            return Ok(Vec::new());
        };
        let storage = match window.local_storage() {
            Ok(Some(storage)) => storage,
            Ok(None) => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::Unavailable(format!("{:?}", e))),
        };
        match storage.get_item(&self.key) {
            Ok(Some(json)) => decode_trade_data(&json),
            Ok(None) => Ok(Vec::new()),
            Err(e) => Err(StoreError::Unavailable(format!("{:?}", e))),
        }
    }
}

#[derive(Serialize)]
struct QualityList {
    qualities: Vec<String>,
}

fn quality_list<S: RecordStore>(store: S) -> Result<QualityList, BillingError> {
    let qualities = store.load_quality_labels()?;
    Ok(QualityList { qualities })
}

fn billing_view<S: RecordStore>(
    store: S,
    quality: &str,
    repacking_input: &str,
) -> Result<StatementView, BillingError> {
    let mut calculator = BillingCalculator::new(store);
    calculator.set_repacking_charge(repacking_input)?;
    calculator.select(quality)?;

    let statement = calculator.statement()?;
    Ok(StatementView::new(statement.aggregate, &statement.prices))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn to_js_error(error: BillingError) -> JsValue {
    let message = error.to_string();
    if matches!(error, BillingError::Store(_)) {
        web_sys::console::warn_1(&JsValue::from_str(&message));
    }
    JsValue::from_str(&message)
}

/// Distinct quality labels found in `localStorage`, as `{"qualities": [...]}`
#[wasm_bindgen]
pub fn list_qualities() -> Result<String, JsValue> {
    let list = quality_list(LocalStorageStore::default()).map_err(to_js_error)?;
    to_json(&list)
}

/// Bill one quality using the records in `localStorage`
#[wasm_bindgen]
pub fn calculate_billing(quality: &str, repacking_input: &str) -> Result<String, JsValue> {
    let view =
        billing_view(LocalStorageStore::default(), quality, repacking_input).map_err(to_js_error)?;
    to_json(&view)
}

/// Bill one quality from an explicit `tradeData` JSON blob
#[wasm_bindgen]
pub fn calculate_billing_from_json(
    trade_data_json: &str,
    quality: &str,
    repacking_input: &str,
) -> Result<String, JsValue> {
    let store = InMemoryStore::from_json(trade_data_json)
        .map_err(|e| to_js_error(BillingError::Store(e)))?;
    let view = billing_view(store, quality, repacking_input).map_err(to_js_error)?;
    to_json(&view)
}

fn final_price(base_price: f64, wastage: f64, repacking_input: &str) -> Result<f64, BillingError> {
    let charge = parse_repacking_charge(repacking_input);
    validate_repacking_charge(charge).map_err(|_| BillingError::InvalidRepackingCharge(charge))?;
    Ok(PriceBreakdown::new(base_price, wastage, DELIVERY_CHARGE, charge).final_price)
}

/// Final price after the repacking charge field changes
///
/// A negative charge is rejected with the same message `calculate_billing`
/// gives for it.
#[wasm_bindgen]
pub fn compute_final_price(
    base_price: f64,
    wastage: f64,
    repacking_input: &str,
) -> Result<f64, JsValue> {
    final_price(base_price, wastage, repacking_input).map_err(to_js_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRADE_DATA: &str = r#"[
        {"id": 1, "lotCode": "LOT001", "commissionAgent": "Rajesh Traders",
         "commodity": "Dry Red Chilly", "noOfBags": 50, "tradePrice": 12000,
         "quality": "Grade A", "totalWeight": 1500, "deliveryStatus": "Delivered"},
        {"id": 2, "lotCode": "LOT002", "commissionAgent": "Kumar & Sons",
         "commodity": "Dry Red Chilly", "noOfBags": 30, "tradePrice": 11500,
         "quality": "Grade B", "totalWeight": 900, "deliveryStatus": "Pending"}
    ]"#;

    fn store() -> InMemoryStore {
        InMemoryStore::from_json(TRADE_DATA).unwrap()
    }

    #[test]
    fn test_qualities_json() {
        let json = to_json(&quality_list(store()).unwrap()).unwrap();
        assert_eq!(json, r#"{"qualities":["Grade A","Grade B"]}"#);
    }

    #[test]
    fn test_billing_json() {
        let json = to_json(&billing_view(store(), "Grade A", "").unwrap()).unwrap();
        let view: StatementView = serde_json::from_str(&json).unwrap();
        assert_eq!(view.total_bags, 50);
        assert_eq!(view.prices.final_price.to_string(), "195120.00");
        assert_eq!(view.lots.len(), 1);
        assert_eq!(view.lots[0].commission_agent, "Rajesh Traders");
    }

    #[test]
    fn test_billing_view_with_repacking() {
        let view = billing_view(store(), "Grade B", "250").unwrap();
        assert_eq!(view.prices.base_price.to_string(), "103500.00");
        assert_eq!(view.prices.wastage.to_string(), "8280.00");
        assert_eq!(view.prices.final_price.to_string(), "112750.00");
    }

    #[test]
    fn test_billing_view_errors() {
        assert!(matches!(
            billing_view(store(), "", ""),
            Err(BillingError::NoQualitySelected)
        ));
        assert!(matches!(
            billing_view(store(), "Grade Z", ""),
            Err(BillingError::NoMatchingRecords(_))
        ));
        assert!(matches!(
            billing_view(store(), "Grade A", "-5"),
            Err(BillingError::InvalidRepackingCharge(_))
        ));
    }

    #[test]
    fn test_final_price() {
        assert_eq!(final_price(180000.0, 14400.0, "").unwrap(), 195120.0);
        assert_eq!(final_price(180000.0, 14400.0, "380").unwrap(), 195500.0);
        assert_eq!(final_price(180000.0, 14400.0, "abc").unwrap(), 195120.0);
    }

    #[test]
    fn test_negative_charge_rejected_on_keystroke_and_calculate() {
        let keystroke = final_price(180000.0, 14400.0, "-10");
        let calculate = billing_view(store(), "Grade A", "-10");

        match (keystroke, calculate) {
            (
                Err(BillingError::InvalidRepackingCharge(a)),
                Err(BillingError::InvalidRepackingCharge(b)),
            ) => assert_eq!(a, b),
            other => panic!("expected both to reject the charge, got {:?}", other),
        }
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn seed(json: &str) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .unwrap();
        storage.set_item(TRADE_DATA_KEY, json).unwrap();
    }

    #[wasm_bindgen_test]
    fn test_list_qualities_from_local_storage() {
        seed(r#"[{"quality": "Teja", "totalWeight": 200, "tradePrice": 15000},
                 {"quality": "Byadgi", "totalWeight": 100, "tradePrice": 18000}]"#);
        assert_eq!(
            list_qualities().unwrap(),
            r#"{"qualities":["Teja","Byadgi"]}"#
        );
    }

    #[wasm_bindgen_test]
    fn test_calculate_billing_from_local_storage() {
        seed(r#"[{"quality": "Teja", "totalWeight": 200, "tradePrice": 15000, "noOfBags": 4}]"#);
        let json = calculate_billing("Teja", "80").unwrap();
        let view: StatementView = serde_json::from_str(&json).unwrap();
        assert_eq!(view.total_bags, 4);
        assert_eq!(view.prices.base_price.to_string(), "30000.00");
        assert_eq!(view.prices.final_price.to_string(), "33200.00");
    }

    #[wasm_bindgen_test]
    fn test_compute_final_price_rejects_negative_charge() {
        assert_eq!(compute_final_price(180000.0, 14400.0, "380").unwrap(), 195500.0);
        assert!(compute_final_price(180000.0, 14400.0, "-10").is_err());
    }

    #[wasm_bindgen_test]
    fn test_malformed_local_storage_is_an_error() {
        seed("{not json");
        assert!(calculate_billing("Teja", "").is_err());
    }
}
