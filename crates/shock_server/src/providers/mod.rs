//! External collaborators: market data and text analysis.
//!
//! Handlers reach the outside world only through the two traits here. Every
//! failure surfaces as a [`ServiceError`]; the route decides what to fall back
//! to, so the engine never sees a collaborator error.

pub mod disabled;
pub mod openai;
pub mod yahoo;

use async_trait::async_trait;
use serde::Serialize;
use shock_core::types::{Date, DateRange, Series};
use std::sync::Arc;
use thiserror::Error;

use crate::config::ServerConfig;

pub use disabled::{DisabledAnalysis, DisabledMarketData};
pub use openai::OpenAiProvider;
pub use yahoo::YahooChartProvider;

/// Lookback used when only an asset's name is needed.
const NAME_LOOKUP_DAYS: i64 = 7;

/// Collaborator failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServiceError {
    /// Credential required by the provider is not configured.
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    /// Connection or HTTP-level failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Request exceeded its deadline.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Response arrived but could not be interpreted.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Provider has nothing for the requested key.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Provider is switched off in configuration.
    #[error("Provider disabled: {0}")]
    Disabled(String),
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ServiceError::Timeout(err.to_string())
        } else if err.is_decode() {
            ServiceError::MalformedResponse(err.to_string())
        } else if err.status() == Some(reqwest::StatusCode::NOT_FOUND) {
            ServiceError::NotFound(err.to_string())
        } else {
            ServiceError::Transport(err.to_string())
        }
    }
}

/// Descriptive data for a tradable asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetInfo {
    /// Display name
    pub name: String,
    /// Ticker as requested
    pub symbol: String,
    /// Quote currency
    pub currency: String,
    /// "Stock", "ETF" or "Fund"
    pub asset_type: String,
}

impl AssetInfo {
    /// Placeholder info used with synthetic data.
    pub fn placeholder(symbol: &str) -> Self {
        Self {
            name: format!("{} Asset", symbol),
            symbol: symbol.to_string(),
            currency: "USD".to_string(),
            asset_type: "Stock".to_string(),
        }
    }
}

/// Daily history plus the asset's descriptive data.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetHistory {
    /// Descriptive data
    pub info: AssetInfo,
    /// Daily OHLCV, strictly increasing by date
    pub series: Series,
}

/// Source of real market data.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &'static str;

    /// Daily bars for `symbol` over `range`.
    async fn daily_history(
        &self,
        symbol: &str,
        range: DateRange,
    ) -> Result<AssetHistory, ServiceError>;

    /// Display name for `symbol`.
    async fn display_name(&self, symbol: &str) -> Result<String, ServiceError> {
        let range = DateRange::trailing(Date::today(), NAME_LOOKUP_DAYS);
        let history = self.daily_history(symbol, range).await?;
        Ok(history.info.name)
    }
}

/// Language-model text generation.
#[async_trait]
pub trait TextAnalysisProvider: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &'static str;

    /// Completion text for `prompt`.
    async fn analyze(&self, prompt: &str) -> Result<String, ServiceError>;
}

/// Builds both providers from configuration.
///
/// A provider that is switched off, lacks a credential or fails to build is
/// replaced by its disabled counterpart.
pub fn from_config(
    config: &ServerConfig,
) -> (Arc<dyn MarketDataProvider>, Arc<dyn TextAnalysisProvider>) {
    let market: Arc<dyn MarketDataProvider> = if config.market_data.enabled {
        match YahooChartProvider::new(&config.market_data) {
            Ok(provider) => Arc::new(provider),
            Err(e) => {
                tracing::warn!(error = %e, "market data provider unavailable");
                Arc::new(DisabledMarketData)
            }
        }
    } else {
        Arc::new(DisabledMarketData)
    };

    let analysis: Arc<dyn TextAnalysisProvider> = if config.analysis.is_enabled() {
        match OpenAiProvider::new(&config.analysis) {
            Ok(provider) => Arc::new(provider),
            Err(e) => {
                tracing::warn!(error = %e, "text analysis provider unavailable");
                Arc::new(DisabledAnalysis)
            }
        }
    } else {
        Arc::new(DisabledAnalysis)
    };

    tracing::info!(
        market_data = market.name(),
        analysis = analysis.name(),
        "providers configured"
    );
    (market, analysis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_info() {
        let info = AssetInfo::placeholder("msft");
        assert_eq!(info.name, "msft Asset");
        assert_eq!(info.symbol, "msft");
        assert_eq!(info.currency, "USD");
        assert_eq!(info.asset_type, "Stock");
    }

    #[test]
    fn test_asset_info_serializes_snake_case() {
        let json = serde_json::to_value(AssetInfo::placeholder("SPY")).unwrap();
        assert_eq!(json["asset_type"], "Stock");
    }

    #[test]
    fn test_default_config_disables_providers() {
        let (market, analysis) = from_config(&ServerConfig::default());
        assert_eq!(market.name(), "disabled");
        assert_eq!(analysis.name(), "disabled");
    }

    #[test]
    fn test_configured_providers() {
        let mut config = ServerConfig::default();
        config.market_data.enabled = true;
        config.analysis.api_key = Some("sk-test".to_string());

        let (market, analysis) = from_config(&config);
        assert_eq!(market.name(), "yahoo");
        assert_eq!(analysis.name(), "openai");
    }

    #[tokio::test]
    async fn test_display_name_uses_history() {
        struct Fixed;

        #[async_trait]
        impl MarketDataProvider for Fixed {
            fn name(&self) -> &'static str {
                "fixed"
            }

            async fn daily_history(
                &self,
                symbol: &str,
                _range: DateRange,
            ) -> Result<AssetHistory, ServiceError> {
                Ok(AssetHistory {
                    info: AssetInfo {
                        name: format!("{} Inc.", symbol),
                        ..AssetInfo::placeholder(symbol)
                    },
                    series: Series::new(),
                })
            }
        }

        assert_eq!(Fixed.display_name("ACME").await.unwrap(), "ACME Inc.");
    }
}
