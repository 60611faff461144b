//! Keyword-driven market impact assessment.
//!
//! Classifies free text into an impact category with a confidence score, a
//! recovery estimate and investor recommendations, then renders a Markdown
//! report. Groups are checked in order; the first group with a matching
//! keyword wins.

use serde::Serialize;
use shock_core::types::ShockError;
use std::fmt::Write as _;

/// Recovery estimate used by categories with no expected downturn.
pub const NO_RECOVERY: &str = "N/A";

struct ImpactGroup {
    keywords: &'static [&'static str],
    impact: &'static str,
    confidence: f64,
    recovery_time: &'static str,
    recommendations: [&'static str; 3],
}

const IMPACT_GROUPS: [ImpactGroup; 5] = [
    ImpactGroup {
        keywords: &["recession", "crash", "crisis", "collapse"],
        impact: "Highly Negative",
        confidence: 8.5,
        recovery_time: "6-12 months",
        recommendations: [
            "Consider defensive assets like utilities and consumer staples",
            "Maintain higher cash positions",
            "Look for discounted quality assets for long-term investment",
        ],
    },
    ImpactGroup {
        keywords: &["inflation", "interest rate", "hike", "federal reserve"],
        impact: "Moderately Negative",
        confidence: 7.5,
        recovery_time: "3-6 months",
        recommendations: [
            "Focus on companies with pricing power",
            "Consider value over growth stocks",
            "Explore TIPS and other inflation-protected securities",
        ],
    },
    ImpactGroup {
        keywords: &["pandemic", "covid", "outbreak", "virus"],
        impact: "Severely Negative",
        confidence: 9.0,
        recovery_time: "12-24 months",
        recommendations: [
            "Invest in healthcare and digital transformation companies",
            "Reduce exposure to travel and hospitality sectors",
            "Consider gold and other safe-haven assets",
        ],
    },
    ImpactGroup {
        keywords: &["growth", "recovery", "stimulus", "expansion"],
        impact: "Positive",
        confidence: 7.5,
        recovery_time: NO_RECOVERY,
        recommendations: [
            "Increase exposure to cyclical stocks",
            "Consider small-cap companies with growth potential",
            "Reduce allocation to defensive sectors",
        ],
    },
    ImpactGroup {
        keywords: &["innovation", "technology", "advancement", "breakthrough"],
        impact: "Highly Positive",
        confidence: 8.0,
        recovery_time: NO_RECOVERY,
        recommendations: [
            "Invest in relevant technology sectors",
            "Look for companies implementing the innovation",
            "Consider thematic ETFs related to the technological advancement",
        ],
    },
];

const NEUTRAL_IMPACT: &str = "Neutral";
const NEUTRAL_CONFIDENCE: f64 = 7.0;

/// Classified impact of an event description.
///
/// # Examples
///
/// ```
/// use shock_engine::assessment::ImpactAssessment;
///
/// let assessment = ImpactAssessment::classify("Federal Reserve announces rate hike").unwrap();
/// assert_eq!(assessment.impact, "Moderately Negative");
/// assert_eq!(assessment.confidence_score, 7.5);
/// assert_eq!(assessment.recommendations.len(), 3);
///
/// let report = assessment.render_markdown();
/// assert!(report.starts_with("# Market Impact Analysis"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactAssessment {
    /// Text that was classified
    pub event: String,
    /// Impact category
    pub impact: String,
    /// Confidence on a 1-10 scale
    pub confidence_score: f64,
    /// Recovery estimate, or "N/A"
    pub recovery_time: String,
    /// Investor recommendations (empty for neutral events)
    pub recommendations: Vec<String>,
}

impl ImpactAssessment {
    /// Classifies `text`.
    ///
    /// # Errors
    ///
    /// `InvalidInput` when `text` is empty or whitespace only.
    pub fn classify(text: &str) -> Result<Self, ShockError> {
        let event = text.trim();
        if event.is_empty() {
            return Err(ShockError::InvalidInput(
                "event description must not be empty".to_string(),
            ));
        }

        let lowered = event.to_lowercase();
        let group = IMPACT_GROUPS
            .iter()
            .find(|g| g.keywords.iter().any(|k| lowered.contains(k)));

        Ok(match group {
            Some(g) => Self {
                event: event.to_string(),
                impact: g.impact.to_string(),
                confidence_score: g.confidence,
                recovery_time: g.recovery_time.to_string(),
                recommendations: g.recommendations.iter().map(|r| r.to_string()).collect(),
            },
            None => Self {
                event: event.to_string(),
                impact: NEUTRAL_IMPACT.to_string(),
                confidence_score: NEUTRAL_CONFIDENCE,
                recovery_time: NO_RECOVERY.to_string(),
                recommendations: Vec::new(),
            },
        })
    }

    /// Returns `true` when a recovery estimate is available.
    pub fn expects_recovery(&self) -> bool {
        self.recovery_time != NO_RECOVERY
    }

    /// Markdown report with summary, impact, confidence, recovery estimate
    /// (when available) and recommendations.
    pub fn render_markdown(&self) -> String {
        let mut out = String::new();

        // Writing to a String cannot fail.
        let _ = writeln!(out, "# Market Impact Analysis\n");
        let _ = writeln!(out, "## Event Summary");
        let _ = writeln!(out, "The event described involves {}\n", self.event);

        let _ = writeln!(out, "## Market Impact");
        let _ = writeln!(out, "**Impact Assessment**: {}\n", self.impact);
        let _ = writeln!(
            out,
            "Based on historical patterns and current market conditions, this event is likely \
             to have a {} impact on global markets, particularly the MSCI World Index.\n",
            self.impact.to_lowercase()
        );

        let _ = writeln!(out, "## Confidence Assessment");
        let _ = writeln!(out, "**Confidence Score**: {:.1}/10\n", self.confidence_score);

        if self.expects_recovery() {
            let _ = writeln!(out, "## Recovery Time Estimate");
            let _ = writeln!(
                out,
                "If markets react negatively, the estimated recovery time is approximately **{}**.\n",
                self.recovery_time
            );
        }

        let _ = writeln!(out, "## Recommendations");
        for recommendation in &self.recommendations {
            let _ = writeln!(out, "- {}", recommendation);
        }

        out
    }

    /// Prompt asking a language model for the same analysis.
    pub fn prompt(text: &str) -> String {
        format!(
            "Analyze the following global event and provide a detailed market impact analysis:\n\n\
             Event: {}\n\n\
             Please include the following in your analysis:\n\
             1. Brief summary of the event\n\
             2. Potential impact on global markets, especially the MSCI World Index\n\
             3. Confidence score (1-10) of your market impact prediction\n\
             4. Estimated market recovery time if negative impact\n\
             5. Recommendations for investors",
            text.trim()
        )
    }
}
