//! Free-text market impact assessment.

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
    routing::post,
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shock_engine::assessment::ImpactAssessment;

use super::{AppState, SUCCESS};
use crate::error::ApiError;

/// Chat request
#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    /// Event description
    #[serde(default)]
    pub message: Option<String>,
}

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MessageType {
    /// End user
    User,
    /// Service notice
    System,
    /// Generated analysis
    Ai,
}

/// Chat response
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// "success"
    pub status: &'static str,
    /// Markdown analysis
    pub content: String,
    /// Always "ai"
    pub sender: &'static str,
    /// Creation time
    pub timestamp: DateTime<Utc>,
    /// Always `AI`
    #[serde(rename = "type")]
    pub message_type: MessageType,
    /// Structured classification behind the content
    pub assessment: ImpactAssessment,
}

/// Build the chat routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/chat/analyze", post(analyze_handler))
}

/// POST /api/chat/analyze - Impact assessment of a described event
///
/// The keyword report is always computed; a configured text provider may
/// replace the rendered body.
async fn analyze_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(request) = payload?;
    let text = request
        .message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| ApiError::missing("message"))?;

    let assessment = ImpactAssessment::classify(text)?;
    tracing::info!(impact = %assessment.impact, "event assessed");

    let content = match state.analysis.analyze(&ImpactAssessment::prompt(text)).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::debug!(error = %e, "using keyword report");
            assessment.render_markdown()
        }
    };

    Ok(Json(ChatResponse {
        status: SUCCESS,
        content,
        sender: "ai",
        timestamp: Utc::now(),
        message_type: MessageType::Ai,
        assessment,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::{
        offline_state, post_json, state_with, StubAnalysis, StubMarketData,
    };
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_missing_message() {
        let router = routes().with_state(offline_state());
        for body in [json!({}), json!({"message": " "})] {
            let (status, json) = post_json(router.clone(), "/api/chat/analyze", body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(json["message"], "No message provided");
        }
    }

    #[tokio::test]
    async fn test_keyword_report() {
        let router = routes().with_state(offline_state());
        let (status, json) = post_json(
            router,
            "/api/chat/analyze",
            json!({"message": "The Federal Reserve announces a surprise rate hike"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["type"], "AI");
        assert_eq!(json["sender"], "ai");
        assert_eq!(json["assessment"]["impact"], "Moderately Negative");
        assert_eq!(json["assessment"]["confidenceScore"], 7.5);
        assert_eq!(json["assessment"]["recoveryTime"], "3-6 months");

        let content = json["content"].as_str().unwrap();
        assert!(content.contains("**Confidence Score**: 7.5/10"));
        assert!(content.contains("## Recovery Time Estimate"));
    }

    #[tokio::test]
    async fn test_neutral_report_has_no_recovery_section() {
        let router = routes().with_state(offline_state());
        let (_, json) = post_json(
            router,
            "/api/chat/analyze",
            json!({"message": "A new stadium opens downtown"}),
        )
        .await;

        assert_eq!(json["assessment"]["impact"], "Neutral");
        assert!(!json["content"]
            .as_str()
            .unwrap()
            .contains("Recovery Time Estimate"));
    }

    #[tokio::test]
    async fn test_provider_reply_replaces_content() {
        let router = routes().with_state(state_with(StubMarketData, StubAnalysis("Generated.")));
        let (_, json) = post_json(
            router,
            "/api/chat/analyze",
            json!({"message": "pandemic fears"}),
        )
        .await;

        assert_eq!(json["content"], "Generated.");
        assert_eq!(json["assessment"]["impact"], "Severely Negative");
    }
}
