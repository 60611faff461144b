//! Narrative text accompanying a simulated event.

use serde::Serialize;
use shock_core::types::EventSpec;

/// Trading days per month used for recovery estimates.
pub const TRADING_DAYS_PER_MONTH: f64 = 20.0;

/// Templated description of an event's simulated impact.
///
/// Field names stay snake_case on the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventAnalysis {
    /// Paragraph describing the decline and recovery
    pub summary: String,
    /// "N trading days (approximately M months)"
    pub recovery_time: String,
    /// Severity as a percentage, one decimal
    pub percent_decline: String,
    /// One-sentence takeaway
    pub key_insight: String,
}

impl EventAnalysis {
    /// Builds the templated analysis for `event`.
    ///
    /// # Examples
    ///
    /// ```
    /// use shock_core::types::{Date, EventSpec};
    /// use shock_engine::analysis::EventAnalysis;
    ///
    /// let event = EventSpec::new("Brexit Referendum", Date::from_ymd(2016, 6, 23).unwrap(), 0.15)
    ///     .unwrap();
    /// let analysis = EventAnalysis::describe(&event, 15);
    /// assert_eq!(analysis.percent_decline, "15.0%");
    /// assert_eq!(analysis.recovery_time, "15 trading days (approximately 0.8 months)");
    /// assert!(analysis.summary.contains("June 2016"));
    /// ```
    pub fn describe(event: &EventSpec, recovery_days: usize) -> Self {
        let months = round_to_tenth(recovery_days as f64 / TRADING_DAYS_PER_MONTH);
        let percent_decline = format!("{:.1}%", round_to_tenth(event.severity() * 100.0));

        let summary = format!(
            "The {name} had a significant impact on global markets. \
             Starting around {month}, markets experienced a sharp decline of approximately \
             {decline} over a period of several days to weeks, driven by investor uncertainty, \
             risk aversion and liquidity concerns. Volatility and trading volumes rose well above \
             average in the first days. Recovery was gradual, with a full return to pre-event \
             levels taking approximately {months:.1} months. External shocks can move global \
             markets quickly, and markets tend to recover over time.",
            name = event.name(),
            month = event.event_date().month_year(),
            decline = percent_decline,
            months = months,
        );

        Self {
            summary,
            recovery_time: format!(
                "{} trading days (approximately {:.1} months)",
                recovery_days, months
            ),
            percent_decline,
            key_insight: format!(
                "The market took approximately {:.1} months to fully recover from this event, \
                 showing how resilient financial markets are to external shocks over \
                 medium-term horizons.",
                months
            ),
        }
    }

    /// Replaces the templated summary, keeping the other fields.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Prompt asking a language model for a summary of `event`'s market impact.
    pub fn prompt(event: &EventSpec, recovery_days: usize) -> String {
        format!(
            "Summarise in one paragraph how the {} ({}) affected global equity markets. \
             Assume a peak decline of {} and a recovery of about {} trading days.",
            event.name(),
            event.event_date(),
            event.severity_label(),
            recovery_days
        )
    }
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use shock_core::types::Date;

    fn covid() -> EventSpec {
        EventSpec::new("COVID-19 Pandemic", Date::from_ymd(2020, 2, 15).unwrap(), 0.35).unwrap()
    }

    #[test]
    fn test_describe_covid() {
        let analysis = EventAnalysis::describe(&covid(), 30);
        assert_eq!(analysis.percent_decline, "35.0%");
        assert_eq!(
            analysis.recovery_time,
            "30 trading days (approximately 1.5 months)"
        );
        assert!(analysis.summary.starts_with("The COVID-19 Pandemic"));
        assert!(analysis.summary.contains("February 2020"));
        assert!(analysis.summary.contains("35.0%"));
        assert!(analysis.key_insight.contains("1.5 months"));
    }

    #[test]
    fn test_zero_recovery() {
        let analysis = EventAnalysis::describe(&covid(), 0);
        assert_eq!(
            analysis.recovery_time,
            "0 trading days (approximately 0.0 months)"
        );
    }

    #[test]
    fn test_with_summary_overrides_only_summary() {
        let analysis = EventAnalysis::describe(&covid(), 30).with_summary("custom");
        assert_eq!(analysis.summary, "custom");
        assert_eq!(analysis.percent_decline, "35.0%");
    }

    #[test]
    fn test_serialises_snake_case() {
        let json = serde_json::to_value(EventAnalysis::describe(&covid(), 30)).unwrap();
        assert!(json.get("recovery_time").is_some());
        assert!(json.get("key_insight").is_some());
    }

    #[test]
    fn test_prompt_mentions_event() {
        let prompt = EventAnalysis::prompt(&covid(), 35);
        assert!(prompt.contains("COVID-19 Pandemic"));
        assert!(prompt.contains("2020-02-15"));
        assert!(prompt.contains("35.0%"));
    }
}
