//! Yahoo Finance v8 chart provider.
//!
//! Fetches daily OHLCV bars and the chart metadata (name, currency,
//! instrument type) in one request. The API is unofficial; any parse failure
//! surfaces as [`ServiceError::MalformedResponse`] so callers can fall back.

use async_trait::async_trait;
use chrono::NaiveTime;
use serde::Deserialize;
use shock_core::types::{Date, DateRange, PricePoint, Series};
use std::time::Duration;

use super::{AssetHistory, AssetInfo, MarketDataProvider, ServiceError};
use crate::config::MarketDataConfig;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    meta: ChartMeta,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    currency: Option<String>,
    long_name: Option<String>,
    short_name: Option<String>,
    instrument_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

/// Market data from the Yahoo Finance chart API.
pub struct YahooChartProvider {
    client: reqwest::Client,
    base_url: String,
}

impl YahooChartProvider {
    /// Builds the HTTP client with the configured timeout.
    pub fn new(config: &MarketDataConfig) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn chart_url(&self, symbol: &str, range: DateRange) -> String {
        let start_ts = range
            .start()
            .into_inner()
            .and_time(NaiveTime::MIN)
            .and_utc()
            .timestamp();
        let end_ts = range
            .end()
            .add_days(1)
            .into_inner()
            .and_time(NaiveTime::MIN)
            .and_utc()
            .timestamp();
        format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval=1d",
            self.base_url, symbol, start_ts, end_ts
        )
    }
}

fn asset_type(instrument_type: Option<&str>) -> &'static str {
    match instrument_type {
        Some("ETF") => "ETF",
        Some("MUTUALFUND") => "Fund",
        _ => "Stock",
    }
}

/// Converts a chart response into an [`AssetHistory`].
///
/// Rows with any missing field are skipped, as are rows that would break
/// the series' weekday-only, strictly-increasing ordering.
fn parse_chart(symbol: &str, response: ChartResponse) -> Result<AssetHistory, ServiceError> {
    let result = response.chart.result.ok_or_else(|| match response.chart.error {
        Some(err) if err.code == "Not Found" => ServiceError::NotFound(symbol.to_string()),
        Some(err) => ServiceError::MalformedResponse(format!("{}: {}", err.code, err.description)),
        None => ServiceError::MalformedResponse("empty result with no error".into()),
    })?;

    let data = result
        .into_iter()
        .next()
        .ok_or_else(|| ServiceError::MalformedResponse("result array is empty".into()))?;

    let timestamps = data
        .timestamp
        .ok_or_else(|| ServiceError::MalformedResponse("no timestamps".into()))?;

    let quote = data
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| ServiceError::MalformedResponse("no quote data".into()))?;

    let mut points: Vec<PricePoint> = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let Some(date) = chrono::DateTime::from_timestamp(ts, 0).map(|dt| Date::from(dt.date_naive()))
        else {
            continue;
        };

        let row = (
            quote.open.get(i).copied().flatten(),
            quote.high.get(i).copied().flatten(),
            quote.low.get(i).copied().flatten(),
            quote.close.get(i).copied().flatten(),
            quote.volume.get(i).copied().flatten(),
        );
        let (Some(open), Some(high), Some(low), Some(close), Some(volume)) = row else {
            continue;
        };

        if !date.is_trading_day() || points.last().is_some_and(|p| p.date >= date) {
            continue;
        }

        let mut point = PricePoint::new(date, open, high, low, close, volume);
        point.round_prices();
        points.push(point);
    }

    let series = Series::from_points(points)
        .map_err(|e| ServiceError::MalformedResponse(e.to_string()))?;

    let meta = data.meta;
    let name = meta
        .long_name
        .or(meta.short_name)
        .unwrap_or_else(|| symbol.to_string());

    Ok(AssetHistory {
        info: AssetInfo {
            name,
            symbol: symbol.to_string(),
            currency: meta.currency.unwrap_or_else(|| "USD".to_string()),
            asset_type: asset_type(meta.instrument_type.as_deref()).to_string(),
        },
        series,
    })
}

#[async_trait]
impl MarketDataProvider for YahooChartProvider {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    async fn daily_history(
        &self,
        symbol: &str,
        range: DateRange,
    ) -> Result<AssetHistory, ServiceError> {
        let url = self.chart_url(symbol, range);
        tracing::debug!(%symbol, %range, "fetching chart");

        let response = self.client.get(&url).send().await?.error_for_status()?;
        let chart: ChartResponse = response.json().await?;
        let history = parse_chart(symbol, chart)?;

        tracing::debug!(%symbol, points = history.series.len(), "chart parsed");
        Ok(history)
    }
}
