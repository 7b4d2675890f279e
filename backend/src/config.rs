//! Configuration management for the chilly billing server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with CHB_ prefix

use std::path::PathBuf;

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::PricingRates;
use validator::Validate;

/// Main application configuration
#[derive(Debug, Deserialize, Clone, Validate)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Where the exported trade data lives
    pub storage: StorageConfig,

    /// Wastage and delivery rates
    #[validate]
    pub pricing: PricingConfig,

    /// Log output configuration
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// JSON file holding the `tradeData` array
    pub trade_data_path: PathBuf,
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct PricingConfig {
    /// Wastage added to the base price, in percent
    #[validate(range(min = 0.0, max = 100.0))]
    pub wastage_percent: f64,

    /// Flat delivery charge per bill
    #[validate(range(min = 0.0))]
    pub delivery_charge: f64,
}

impl PricingConfig {
    pub fn rates(&self) -> PricingRates {
        PricingRates {
            wastage_percent: self.wastage_percent,
            delivery_charge: self.delivery_charge,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    /// "pretty" or "json"
    pub format: String,
}

impl LogConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("CHB_ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let defaults = PricingRates::default();

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("storage.trade_data_path", "data/trade_data.json")?
            .set_default("pricing.wastage_percent", defaults.wastage_percent)?
            .set_default("pricing.delivery_charge", defaults.delivery_charge)?
            .set_default("log.format", "pretty")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (CHB_ prefix)
            .add_source(
                Environment::with_prefix("CHB")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;
        config
            .validate()
            .map_err(|e| ConfigError::Message(format!("invalid configuration: {}", e)))?;

        Ok(config)
    }
}
