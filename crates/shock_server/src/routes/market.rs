//! Baseline market data endpoint.

use axum::{extract::State, response::Json, routing::get, Router};
use serde::Serialize;
use shock_core::types::{Date, DateRange, Series};
use shock_engine::generator::SeriesGenerator;

use super::{AppState, SUCCESS};

/// Calendar days of history served (five 365-day years).
pub const MARKET_LOOKBACK_DAYS: i64 = 5 * 365;

/// Market data response
#[derive(Debug, Serialize)]
pub struct MarketDataResponse {
    /// "success"
    pub status: &'static str,
    /// Daily bars, oldest first
    pub data: Series,
}

/// Build the market data routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/market-data", get(market_data_handler))
}

/// GET /api/market-data - Five years of index history
///
/// Real index data when the provider delivers it, otherwise a synthetic walk.
async fn market_data_handler(State(state): State<AppState>) -> Json<MarketDataResponse> {
    let range = DateRange::trailing(Date::today(), MARKET_LOOKBACK_DAYS);
    let symbol = &state.config.market_data.index_symbol;

    let data = match state.market_data.daily_history(symbol, range).await {
        Ok(history) if !history.series.is_empty() => history.series,
        Ok(_) => {
            tracing::warn!(%symbol, "provider returned no bars, using synthetic data");
            SeriesGenerator::new().generate(range)
        }
        Err(e) => {
            tracing::debug!(%symbol, error = %e, "using synthetic market data");
            SeriesGenerator::new().generate(range)
        }
    };

    Json(MarketDataResponse {
        status: SUCCESS,
        data,
    })
}
