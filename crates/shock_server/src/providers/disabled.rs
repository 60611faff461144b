//! Providers that always report themselves switched off.

use async_trait::async_trait;
use shock_core::types::DateRange;

use super::{AssetHistory, MarketDataProvider, ServiceError, TextAnalysisProvider};

/// Market data source used when real data is turned off.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledMarketData;

#[async_trait]
impl MarketDataProvider for DisabledMarketData {
    fn name(&self) -> &'static str {
        "disabled"
    }

    async fn daily_history(
        &self,
        _symbol: &str,
        _range: DateRange,
    ) -> Result<AssetHistory, ServiceError> {
        Err(ServiceError::Disabled("market data".to_string()))
    }

    async fn display_name(&self, _symbol: &str) -> Result<String, ServiceError> {
        Err(ServiceError::Disabled("market data".to_string()))
    }
}

/// Text analysis used when no API key is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledAnalysis;

#[async_trait]
impl TextAnalysisProvider for DisabledAnalysis {
    fn name(&self) -> &'static str {
        "disabled"
    }

    async fn analyze(&self, _prompt: &str) -> Result<String, ServiceError> {
        Err(ServiceError::Disabled("text analysis".to_string()))
    }
}
