//! Billing service wrapping the shared calculator
//!
//! Store reads are file I/O, so every call into the calculator runs on the
//! blocking pool.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{
    BillingCalculator, BillingError, PriceBasis, PricingRates, RecordStore, StatementView,
};

use crate::error::{AppError, AppResult};

/// Shared handle to the configured record store
pub type SharedStore = Arc<dyn RecordStore + Send + Sync>;

/// Billing service for quality-based bills
#[derive(Clone)]
pub struct BillingService {
    store: SharedStore,
    rates: PricingRates,
}

/// Input for a billing calculation
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BillingQuery {
    #[serde(default)]
    pub quality: String,
    /// Raw field text; non-numeric input counts as zero
    #[serde(default)]
    pub repacking_charge: String,
    pub price_basis: Option<String>,
}

/// Calculated bill with its timestamp
#[derive(Debug, Clone, Serialize)]
pub struct BillingResponse {
    pub generated_at: DateTime<Utc>,
    pub wastage_percent: f64,
    #[serde(flatten)]
    pub statement: StatementView,
}

/// Quality labels available for billing
#[derive(Debug, Clone, Serialize)]
pub struct QualitiesResponse {
    pub qualities: Vec<String>,
}

impl BillingService {
    pub fn new(store: SharedStore, rates: PricingRates) -> Self {
        Self { store, rates }
    }

    /// Distinct quality labels in storage order
    pub async fn quality_labels(&self) -> AppResult<QualitiesResponse> {
        let store = self.store.clone();
        let qualities = run_blocking(move || Ok(store.load_quality_labels()?)).await?;
        tracing::debug!(count = qualities.len(), "Listed quality labels");
        Ok(QualitiesResponse { qualities })
    }

    /// Number of lot records currently in the store
    pub async fn record_count(&self) -> AppResult<usize> {
        let store = self.store.clone();
        run_blocking(move || Ok(store.load_lot_records()?.len())).await
    }

    /// Aggregate and price one quality
    pub async fn calculate(&self, query: BillingQuery) -> AppResult<BillingResponse> {
        let price_basis = match query.price_basis.as_deref() {
            None | Some("") => PriceBasis::default(),
            Some(basis) => basis
                .parse::<PriceBasis>()
                .map_err(|e| AppError::validation("price_basis", e))?,
        };

        tracing::info!(
            quality = %query.quality,
            price_basis = %price_basis,
            "Calculating quality billing"
        );

        let store = self.store.clone();
        let rates = self.rates;
        let statement = run_blocking(move || {
            let mut calculator = BillingCalculator::new(store)
                .with_rates(rates)
                .with_price_basis(price_basis);
            calculator.set_repacking_charge(&query.repacking_charge)?;
            calculator.select(&query.quality)?;

            let statement = calculator.statement()?;
            Ok(StatementView::new(statement.aggregate, &statement.prices))
        })
        .await?;

        tracing::debug!(
            quality = %statement.quality,
            lots = statement.lots.len(),
            final_price = %statement.prices.final_price,
            "Billing calculated"
        );

        Ok(BillingResponse {
            generated_at: Utc::now(),
            wastage_percent: self.rates.wastage_percent,
            statement,
        })
    }
}

async fn run_blocking<T, F>(f: F) -> AppResult<T>
where
    F: FnOnce() -> Result<T, BillingError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(format!("billing task failed: {}", e)))?
        .map_err(AppError::from)
}
