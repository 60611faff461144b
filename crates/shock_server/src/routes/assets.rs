//! Symbol validation and asset history endpoints.
//!
//! Both fall back to mock data on any provider failure, so a valid request
//! always succeeds.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use shock_core::types::{Date, DateRange, Series};
use shock_engine::asset::{AssetPeriod, AssetSeriesGenerator};

use super::{AppState, SUCCESS};
use crate::error::ApiError;
use crate::providers::AssetInfo;

/// Note attached to responses built from mock data.
pub const MOCK_DATA_NOTE: &str = "Using mock data due to data retrieval issues";

/// Query parameters for the asset endpoints
#[derive(Debug, Default, Deserialize)]
pub struct AssetQuery {
    /// Ticker symbol
    pub symbol: Option<String>,
    /// Period code ("1d" .. "5y"); unknown codes mean one year
    pub period: Option<String>,
}

impl AssetQuery {
    fn symbol(&self) -> Result<&str, ApiError> {
        self.symbol
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ApiError::missing("symbol"))
    }

    fn period(&self) -> AssetPeriod {
        self.period
            .as_deref()
            .map(AssetPeriod::parse_or_default)
            .unwrap_or_default()
    }
}

/// Validate-symbol response
#[derive(Debug, Serialize)]
pub struct SymbolResponse {
    /// "success"
    pub status: &'static str,
    /// Display name
    pub name: String,
    /// Symbol
    pub symbol: String,
}

/// Asset-data response
#[derive(Debug, Serialize)]
pub struct AssetDataResponse {
    /// "success"
    pub status: &'static str,
    /// Daily bars, oldest first
    pub data: Series,
    /// Descriptive data
    pub info: AssetInfo,
    /// Present when the data is mock data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<&'static str>,
}

/// Build the asset routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/validate-symbol", get(validate_symbol_handler))
        .route("/api/asset-data", get(asset_data_handler))
}

/// GET /api/validate-symbol?symbol= - Display name for a ticker
async fn validate_symbol_handler(
    State(state): State<AppState>,
    query: Result<Query<AssetQuery>, QueryRejection>,
) -> Result<Json<SymbolResponse>, ApiError> {
    let Query(query) = query?;
    let symbol = query.symbol()?;

    let response = match state.market_data.display_name(symbol).await {
        Ok(name) => SymbolResponse {
            status: SUCCESS,
            name,
            symbol: symbol.to_string(),
        },
        Err(e) => {
            tracing::debug!(%symbol, error = %e, "symbol lookup failed, using mock name");
            let upper = symbol.to_uppercase();
            SymbolResponse {
                status: SUCCESS,
                name: format!("{} - Mock Data", upper),
                symbol: upper,
            }
        }
    };

    Ok(Json(response))
}

/// GET /api/asset-data?symbol=&period= - Asset history
async fn asset_data_handler(
    State(state): State<AppState>,
    query: Result<Query<AssetQuery>, QueryRejection>,
) -> Result<Json<AssetDataResponse>, ApiError> {
    let Query(query) = query?;
    let symbol = query.symbol()?;
    let period = query.period();
    let today = Date::today();
    let range = DateRange::trailing(today, period.lookback_days());

    let response = match state.market_data.daily_history(symbol, range).await {
        Ok(history) if !history.series.is_empty() => AssetDataResponse {
            status: SUCCESS,
            data: history.series,
            info: history.info,
            note: None,
        },
        outcome => {
            if let Err(e) = outcome {
                tracing::debug!(%symbol, %period, error = %e, "using mock asset data");
            }
            AssetDataResponse {
                status: SUCCESS,
                data: AssetSeriesGenerator::new().generate(symbol, period, today),
                info: AssetInfo::placeholder(symbol),
                note: Some(MOCK_DATA_NOTE),
            }
        }
    };

    Ok(Json(response))
}
