//! Preset portfolio scenario endpoint.

use axum::{extract::rejection::JsonRejection, response::Json, routing::post, Router};
use serde::{Deserialize, Serialize};
use shock_core::types::rounding::serialize_2dp;
use shock_core::types::Date;
use shock_engine::catalog::{key_display_name, PresetKind};
use shock_engine::generator::SeriesGenerator;
use shock_engine::replay::{StrategyReplayer, StrategySet};
use shock_engine::shock::ShockShaper;

use super::{AppState, SUCCESS};
use crate::error::ApiError;

/// Scenario used when the request names none
pub const DEFAULT_SCENARIO: &str = "covid";

/// Amount invested when the request names none
pub const DEFAULT_INVESTMENT: f64 = 10_000.0;

/// Simulate-portfolio request
#[derive(Debug, Default, Deserialize)]
pub struct PortfolioRequest {
    /// Preset key such as "financial_crisis"
    #[serde(default)]
    pub event: Option<String>,
    /// Amount invested on the first day
    #[serde(default)]
    pub investment: Option<f64>,
}

impl PortfolioRequest {
    fn scenario_key(&self) -> String {
        self.event
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .unwrap_or(DEFAULT_SCENARIO)
            .to_string()
    }

    fn investment(&self) -> Result<f64, ApiError> {
        let amount = self.investment.unwrap_or(DEFAULT_INVESTMENT);
        if amount.is_finite() && amount > 0.0 {
            Ok(amount)
        } else {
            Err(ApiError::InvalidInput(format!(
                "Investment must be a positive amount, got {}",
                amount
            )))
        }
    }
}

/// Portfolio values of every strategy on one day
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioRow {
    /// Trading day
    pub date: Date,
    /// Withdraw strategy value
    #[serde(serialize_with = "serialize_2dp")]
    pub withdraw: f64,
    /// Add strategy value
    #[serde(serialize_with = "serialize_2dp")]
    pub add: f64,
    /// Hold strategy value
    #[serde(serialize_with = "serialize_2dp")]
    pub hold: f64,
    /// Closing price
    #[serde(serialize_with = "serialize_2dp")]
    pub market_price: f64,
}

/// Scenario details
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInfo {
    /// Title-cased request key
    pub name: String,
    /// Date of the shock
    pub impact_date: Date,
    /// Trading days to recover
    pub recovery_days: usize,
}

/// Simulate-portfolio response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioResponse {
    /// "success"
    pub status: &'static str,
    /// Requested scenario key
    pub event: String,
    /// One row per trading day
    pub strategies: Vec<PortfolioRow>,
    /// Scenario details
    pub event_info: EventInfo,
}

fn rows(set: &StrategySet) -> Vec<PortfolioRow> {
    set.hold
        .points()
        .iter()
        .zip(set.withdraw.points())
        .zip(set.add.points())
        .map(|((hold, withdraw), add)| PortfolioRow {
            date: hold.date(),
            withdraw: withdraw.portfolio_value,
            add: add.portfolio_value,
            hold: hold.portfolio_value,
            market_price: hold.point.close,
        })
        .collect()
}

/// Build the portfolio routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/simulate-portfolio", post(simulate_portfolio_handler))
}

/// POST /api/simulate-portfolio - Investment-based strategies over a preset scenario
///
/// Unknown scenario keys run the covid preset but keep the requested key in
/// the response.
async fn simulate_portfolio_handler(
    payload: Result<Json<PortfolioRequest>, JsonRejection>,
) -> Result<Json<PortfolioResponse>, ApiError> {
    let Json(request) = payload?;
    let key = request.scenario_key();
    let investment = request.investment()?;

    let scenario = PresetKind::from_key_or_default(&key).scenario()?;
    let baseline = SeriesGenerator::new().generate(scenario.range);
    let outcome = ShockShaper::new().apply(&baseline, scenario.impact_date, scenario.severity);

    if outcome.series.is_empty() {
        return Err(ApiError::EmptySeries(format!(
            "No trading days in scenario window {}",
            scenario.range
        )));
    }

    let set = StrategyReplayer::with_investment(investment)
        .replay_all(&outcome.series, outcome.impact_index());

    tracing::info!(
        scenario = scenario.kind.key(),
        investment,
        points = outcome.series.len(),
        "portfolio simulated"
    );

    Ok(Json(PortfolioResponse {
        status: SUCCESS,
        strategies: rows(&set),
        event_info: EventInfo {
            name: key_display_name(&key),
            impact_date: scenario.impact_date,
            recovery_days: outcome.recovery_days,
        },
        event: key,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::{offline_state, post_json};
    use approx::assert_relative_eq;
    use axum::http::StatusCode;
    use serde_json::json;

    fn router() -> Router {
        routes().with_state(offline_state())
    }

    #[tokio::test]
    async fn test_default_scenario() {
        let (status, json) = post_json(router(), "/api/simulate-portfolio", json!({})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["event"], "covid");
        assert_eq!(json["eventInfo"]["name"], "Covid");
        assert_eq!(json["eventInfo"]["impactDate"], "2020-03-01");
        assert_eq!(json["eventInfo"]["recoveryDays"], 30);

        let rows = json["strategies"].as_array().unwrap();
        assert_eq!(rows[0]["date"], "2020-02-03");
        assert_relative_eq!(rows[0]["hold"].as_f64().unwrap(), 10_000.0, epsilon = 0.01);
        assert_relative_eq!(rows[0]["add"].as_f64().unwrap(), 10_000.0, epsilon = 0.01);
    }

    #[tokio::test]
    async fn test_named_scenario_and_investment() {
        let (_, json) = post_json(
            router(),
            "/api/simulate-portfolio",
            json!({"event": "financial_crisis", "investment": 5000}),
        )
        .await;

        assert_eq!(json["eventInfo"]["name"], "Financial Crisis");
        assert_eq!(json["eventInfo"]["impactDate"], "2008-09-15");
        assert_eq!(json["eventInfo"]["recoveryDays"], 35);

        let rows = json["strategies"].as_array().unwrap();
        assert_relative_eq!(rows[0]["hold"].as_f64().unwrap(), 5_000.0, epsilon = 0.01);

        let last = rows.last().unwrap();
        let hold = last["hold"].as_f64().unwrap();
        let price = last["marketPrice"].as_f64().unwrap();
        let first_price = rows[0]["marketPrice"].as_f64().unwrap();
        assert_relative_eq!(hold, 5_000.0 / first_price * price, epsilon = 0.5);
        assert!(last["add"].as_f64().unwrap() > hold);
        assert!(last["withdraw"].as_f64().unwrap() < hold);
    }

    #[tokio::test]
    async fn test_unknown_scenario_keeps_requested_name() {
        let (status, json) = post_json(
            router(),
            "/api/simulate-portfolio",
            json!({"event": "black_monday"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["event"], "black_monday");
        assert_eq!(json["eventInfo"]["name"], "Black Monday");
        assert_eq!(json["eventInfo"]["impactDate"], "2020-03-01");
    }

    #[tokio::test]
    async fn test_invalid_investment() {
        for amount in [json!(0), json!(-100.0)] {
            let (status, json) = post_json(
                router(),
                "/api/simulate-portfolio",
                json!({"investment": amount}),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(json["status"], "error");
        }
    }
}
