//! BMW Chilly Management - Billing Server
//!
//! Serves quality-based billing over HTTP from an export of the trade data
//! recorded by the browser application.

use axum::{routing::get, Router};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod external;
mod handlers;
mod routes;
mod services;

pub use config::Config;

use external::JsonFileRecordStore;
use services::BillingService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub billing: BillingService,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    // Initialize tracing
    let json_logs = config.log.is_json();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chilly_billing_server=debug,tower_http=debug".into()),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(tracing_subscriber::fmt::layer))
        .init();

    tracing::info!("Starting Chilly Billing Server");
    tracing::info!("Environment: {}", config.environment);

    let store = JsonFileRecordStore::new(&config.storage.trade_data_path);
    tracing::info!("Reading trade data from {}", store.path().display());

    let rates = config.pricing.rates();
    tracing::info!(
        wastage_percent = rates.wastage_percent,
        delivery_charge = rates.delivery_charge,
        "Pricing rates loaded"
    );

    // Create application state
    let state = AppState {
        billing: BillingService::new(Arc::new(store), rates),
    };

    // Build application
    let app = create_app(state);

    // Start server
    let ip = config.server.host.parse::<std::net::IpAddr>()?;
    let addr = SocketAddr::new(ip, config.server.port);
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Chilly Billing API v1.0"
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
