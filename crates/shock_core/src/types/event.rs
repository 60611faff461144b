//! Resolved market events.

use serde::Serialize;

use super::error::ShockError;
use super::time::{Date, DateRange};

/// Calendar days of history shown before an event.
pub const EVENT_LOOKBACK_DAYS: i64 = 180;

/// Calendar days of aftermath shown after an event, capped at today.
pub const EVENT_HORIZON_DAYS: i64 = 730;

/// A market event with its date and severity.
///
/// Severity is the fractional peak decline attributed to the event and lies
/// in the open interval (0, 1). Immutable once constructed.
///
/// # Examples
///
/// ```
/// use shock_core::types::{Date, EventSpec};
///
/// let event = EventSpec::new(
///     "Brexit Referendum",
///     Date::from_ymd(2016, 6, 23).unwrap(),
///     0.15,
/// )
/// .unwrap();
/// assert_eq!(event.severity(), 0.15);
///
/// assert!(EventSpec::new("bad", Date::from_ymd(2016, 6, 23).unwrap(), 1.0).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSpec {
    name: String,
    event_date: Date,
    severity: f64,
}

impl EventSpec {
    /// Creates an event, rejecting severities outside (0, 1).
    pub fn new(name: impl Into<String>, event_date: Date, severity: f64) -> Result<Self, ShockError> {
        if !(severity > 0.0 && severity < 1.0) {
            return Err(ShockError::InvalidSeverity(severity));
        }
        Ok(Self {
            name: name.into(),
            event_date,
            severity,
        })
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Date the event hit the market.
    pub fn event_date(&self) -> Date {
        self.event_date
    }

    /// Fractional peak decline in (0, 1).
    pub fn severity(&self) -> f64 {
        self.severity
    }

    /// Severity as a percentage string with one decimal (e.g., "35.0%").
    pub fn severity_label(&self) -> String {
        format!("{:.1}%", self.severity * 100.0)
    }

    /// Simulation window around the event.
    ///
    /// Starts [`EVENT_LOOKBACK_DAYS`] before the event and ends
    /// [`EVENT_HORIZON_DAYS`] after it, or at `today` if that is earlier.
    pub fn date_range(&self, today: Date) -> DateRange {
        let start = self.event_date.sub_days(EVENT_LOOKBACK_DAYS);
        let end = self.event_date.add_days(EVENT_HORIZON_DAYS).min(today);
        DateRange::new(start, end)
    }
}
