//! Event analysis and strategy simulation endpoints.
//!
//! Both endpoints run the same pipeline: resolve the event text, build the
//! simulation window, generate a baseline and shape the shock into it.

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use shock_core::types::{Date, DateRange, EventSpec, Series};
use shock_engine::analysis::EventAnalysis;
use shock_engine::catalog::ScenarioCatalog;
use shock_engine::comparison::StrategyComparison;
use shock_engine::generator::SeriesGenerator;
use shock_engine::replay::{StrategyReplayer, StrategySet};
use shock_engine::shock::{ShockOutcome, ShockShaper};

use super::{AppState, TimeFrame, SUCCESS};
use crate::error::ApiError;

/// Request body naming an event in free text
#[derive(Debug, Default, Deserialize)]
pub struct EventRequest {
    /// Event description
    #[serde(default)]
    pub event: Option<String>,
}

impl EventRequest {
    /// Trimmed event text, or `InvalidInput` when absent or blank.
    pub fn text(&self) -> Result<&str, ApiError> {
        self.event
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::missing("event"))
    }
}

/// Resolved event with its shaped series.
struct Simulation {
    event: EventSpec,
    range: DateRange,
    outcome: ShockOutcome,
}

fn simulate(text: &str) -> Result<Simulation, ApiError> {
    let event = ScenarioCatalog::new().resolve(text)?;
    let range = event.date_range(Date::today());

    let baseline = SeriesGenerator::new().generate(range);
    let outcome = ShockShaper::new().apply(&baseline, event.event_date(), event.severity());

    tracing::info!(
        event = %event.name(),
        event_date = %event.event_date(),
        severity = event.severity(),
        points = outcome.series.len(),
        recovery_days = outcome.recovery_days,
        "event simulated"
    );

    Ok(Simulation {
        event,
        range,
        outcome,
    })
}

/// Analyze-event response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeEventResponse {
    /// "success"
    pub status: &'static str,
    /// Shaped series
    pub data: Series,
    /// Narrative
    pub analysis: EventAnalysis,
    /// Simulation window
    pub time_frame: TimeFrame,
}

/// Simulation summary: comparison plus event details
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategySummary {
    /// Initial and final values, percentage changes, best strategy
    #[serde(flatten)]
    pub comparison: StrategyComparison,
    /// Resolved event name
    pub event_name: String,
    /// Resolved event date
    pub event_date: Date,
    /// Severity as a percentage label
    pub event_severity: String,
}

/// Simulate-strategies response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateStrategiesResponse {
    /// "success"
    pub status: &'static str,
    /// Per-strategy trajectories
    pub strategies: StrategySet,
    /// Outcome summary
    pub summary: StrategySummary,
    /// Simulation window including the event date
    pub time_frame: TimeFrame,
}

/// Build the event routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/analyze-event", post(analyze_event_handler))
        .route("/api/simulate-strategies", post(simulate_strategies_handler))
}

/// POST /api/analyze-event - Simulated market reaction with narrative
async fn analyze_event_handler(
    State(state): State<AppState>,
    payload: Result<Json<EventRequest>, JsonRejection>,
) -> Result<Json<AnalyzeEventResponse>, ApiError> {
    let Json(request) = payload?;
    let Simulation {
        event,
        range,
        outcome,
    } = simulate(request.text()?)?;

    let mut analysis = EventAnalysis::describe(&event, outcome.recovery_days);
    let prompt = EventAnalysis::prompt(&event, outcome.recovery_days);
    match state.analysis.analyze(&prompt).await {
        Ok(summary) => analysis = analysis.with_summary(summary),
        Err(e) => tracing::debug!(error = %e, "keeping templated summary"),
    }

    Ok(Json(AnalyzeEventResponse {
        status: SUCCESS,
        data: outcome.series,
        analysis,
        time_frame: TimeFrame::new(range),
    }))
}

/// POST /api/simulate-strategies - Withdraw / add / hold over the simulated event
async fn simulate_strategies_handler(
    payload: Result<Json<EventRequest>, JsonRejection>,
) -> Result<Json<SimulateStrategiesResponse>, ApiError> {
    let Json(request) = payload?;
    let Simulation {
        event,
        range,
        outcome,
    } = simulate(request.text()?)?;

    let strategies = StrategyReplayer::default().replay_all(&outcome.series, outcome.impact_index());
    let comparison = StrategyComparison::from_set(&strategies).ok_or_else(|| {
        ApiError::EmptySeries(format!("No trading days between {} and {}", range.start(), range.end()))
    })?;

    tracing::info!(best = %comparison.best_strategy, "strategies compared");

    Ok(Json(SimulateStrategiesResponse {
        status: SUCCESS,
        strategies,
        summary: StrategySummary {
            comparison,
            event_name: event.name().to_string(),
            event_date: event.event_date(),
            event_severity: event.severity_label(),
        },
        time_frame: TimeFrame::new(range).with_event_date(event.event_date()),
    }))
}
