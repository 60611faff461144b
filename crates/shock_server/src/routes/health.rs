//! Health check and readiness endpoints
//!
//! Used by load balancers and orchestrators to probe service availability.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};

use super::AppState;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Health status ("healthy" or "unhealthy")
    pub status: String,
    /// Server version
    pub version: String,
    /// Server uptime in seconds
    pub uptime_secs: u64,
    /// Active collaborators
    pub providers: ProviderStatus,
}

/// Which collaborator implementation is wired in
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderStatus {
    /// Market data provider name
    pub market_data: String,
    /// Text analysis provider name
    pub analysis: String,
}

/// Readiness response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadyResponse {
    /// Ready status
    pub ready: bool,
}

/// Build the health routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
}

/// GET /health - Health check endpoint
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "healthy".to_string(),
        version: crate::VERSION.to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        providers: ProviderStatus {
            market_data: state.market_data.name().to_string(),
            analysis: state.analysis.name().to_string(),
        },
    };

    (StatusCode::OK, Json(response))
}

/// GET /ready - Readiness probe endpoint
async fn ready_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(ReadyResponse { ready: true }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::{get, offline_state, state_with, StubAnalysis, StubMarketData};

    #[tokio::test]
    async fn test_health_endpoint_returns_json() {
        let router = routes().with_state(offline_state());
        let (status, json) = get(router, "/health").await;

        assert_eq!(status, StatusCode::OK);
        let health: HealthResponse = serde_json::from_value(json).unwrap();
        assert_eq!(health.status, "healthy");
        assert_eq!(health.version, crate::VERSION);
        assert_eq!(health.providers.market_data, "disabled");
        assert_eq!(health.providers.analysis, "disabled");
    }

    #[tokio::test]
    async fn test_health_reports_wired_providers() {
        let router = routes().with_state(state_with(StubMarketData, StubAnalysis("ok")));
        let (_, json) = get(router, "/health").await;

        assert_eq!(json["providers"]["marketData"], "stub");
        assert_eq!(json["providers"]["analysis"], "stub");
    }

    #[tokio::test]
    async fn test_health_uptime_increases() {
        let state = offline_state();
        let router = routes().with_state(state);

        let (_, first) = get(router.clone(), "/health").await;
        tokio::time::sleep(std::time::Duration::from_millis(1100)).await;
        let (_, second) = get(router, "/health").await;

        assert!(second["uptimeSecs"].as_u64() >= first["uptimeSecs"].as_u64());
    }

    #[tokio::test]
    async fn test_ready_endpoint_returns_json() {
        let router = routes().with_state(offline_state());
        let (status, json) = get(router, "/ready").await;

        assert_eq!(status, StatusCode::OK);
        let ready: ReadyResponse = serde_json::from_value(json).unwrap();
        assert!(ready.ready);
    }
}
