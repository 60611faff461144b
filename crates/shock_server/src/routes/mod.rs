//! Route modules for the shock server
//!
//! This module contains endpoint group-specific routers:
//! - health: Liveness and readiness probes
//! - market: Baseline market data
//! - events: Event analysis and strategy simulation
//! - portfolio: Preset portfolio scenarios
//! - assets: Symbol validation and asset history
//! - chat: Free-text impact assessment

pub mod assets;
pub mod chat;
pub mod events;
pub mod health;
pub mod market;
pub mod portfolio;

use axum::http::HeaderValue;
use axum::Router;
use serde::Serialize;
use shock_core::types::{Date, DateRange};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::providers::{self, MarketDataProvider, TextAnalysisProvider};

/// Status string carried by every successful response.
pub const SUCCESS: &str = "success";

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: Arc<ServerConfig>,
    /// Server start time for uptime calculation
    pub start_time: std::time::Instant,
    /// Real market data source
    pub market_data: Arc<dyn MarketDataProvider>,
    /// Language-model text source
    pub analysis: Arc<dyn TextAnalysisProvider>,
}

impl AppState {
    /// Create a new AppState with providers built from `config`
    pub fn new(config: Arc<ServerConfig>) -> Self {
        let (market_data, analysis) = providers::from_config(&config);
        Self::with_providers(config, market_data, analysis)
    }

    /// Create an AppState with explicit providers
    pub fn with_providers(
        config: Arc<ServerConfig>,
        market_data: Arc<dyn MarketDataProvider>,
        analysis: Arc<dyn TextAnalysisProvider>,
    ) -> Self {
        Self {
            config,
            start_time: std::time::Instant::now(),
            market_data,
            analysis,
        }
    }
}

/// Window reported alongside simulated data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeFrame {
    /// First calendar day of the window
    pub start_date: Date,
    /// Last calendar day of the window
    pub end_date: Date,
    /// Event date, when the response concerns one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_date: Option<Date>,
}

impl TimeFrame {
    /// Time frame without an event date.
    pub fn new(range: DateRange) -> Self {
        Self {
            start_date: range.start(),
            end_date: range.end(),
            event_date: None,
        }
    }

    /// Adds the event date.
    pub fn with_event_date(mut self, date: Date) -> Self {
        self.event_date = Some(date);
        self
    }
}

/// Build the main application router by merging all route modules
pub fn build_router(config: Arc<ServerConfig>) -> Router {
    router_with_state(AppState::new(config))
}

/// Build the router around an existing state
pub fn router_with_state(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .merge(health::routes())
        .merge(market::routes())
        .merge(events::routes())
        .merge(portfolio::routes())
        .merge(assets::routes())
        .merge(chat::routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if config.allows_any_origin() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}
