//! REST API server for event shock simulation
//!
//! Exposes the shock_engine pipeline over HTTP: baseline market data, event
//! analysis, withdraw / add / hold strategy comparison, preset portfolio
//! scenarios, asset histories and free-text impact assessment.
//!
//! External data sources sit behind the traits in [`providers`]; every
//! endpoint falls back to simulated data when a provider is unavailable.

pub mod config;
pub mod error;
pub mod providers;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use providers::ServiceError;

/// Server version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
