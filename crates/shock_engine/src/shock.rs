//! Event shock shaping.
//!
//! Reshapes a price series around an event date into a crash followed by a
//! recovery:
//!
//! 1. **Impact**: the first point dated on or after the event.
//! 2. **Crash window**: [`CRASH_SPAN`] points starting at the impact. Day `k`
//!    (0-based) scales all four prices by `1 - c × (CRASH_SPAN - k) / CRASH_SPAN`
//!    where `c` is the severity clamped to
//!    [[`MIN_CRASH_SEVERITY`], [`MAX_CRASH_SEVERITY`]]. Volume grows with the
//!    drop.
//! 3. **Recovery window**: `floor(severity × 100)` points after the crash
//!    window. Closes move linearly back towards the pre-crash close at
//!    [`RECOVERY_ACCELERATION`] times the nominal pace, reaching it two thirds
//!    of the way through the window. The pre-crash close is the close just
//!    before the impact; an impact on the first point has none, so the crashed
//!    first close is the target instead.
//! 4. **Recovery bars**: open is `close × U[0.99, 1.01]`, high is
//!    `max(open, close) × U[1.00, 1.02]` and low is
//!    `min(open, close) × U[0.98, 1.00]`. Anchoring high and low on both open
//!    and close keeps every bar's range around its body.
//!
//! Points past the recovery window keep their original values. All prices
//! are rounded to two decimals afterwards.

use rand::Rng;
use serde::Serialize;
use shock_core::types::{Date, Series};
use std::ops::Range;
use tracing::debug;

/// Number of points in the crash window.
pub const CRASH_SPAN: usize = 10;

/// Lower bound of the crash depth.
pub const MIN_CRASH_SEVERITY: f64 = 0.05;

/// Upper bound of the crash depth.
pub const MAX_CRASH_SEVERITY: f64 = 0.40;

/// Speed of the recovery relative to a straight line over the window.
pub const RECOVERY_ACCELERATION: f64 = 1.5;

/// Volume grows by `1 + drop × CRASH_VOLUME_FACTOR` during the crash.
pub const CRASH_VOLUME_FACTOR: f64 = 5.0;

/// Severity as supplied and as applied to the crash depth.
///
/// The recovery length is derived from the raw severity; only the crash depth
/// is clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShockParams {
    raw_severity: f64,
    clamped_severity: f64,
}

impl ShockParams {
    /// Derive parameters from a caller-supplied severity.
    ///
    /// Non-finite severities are treated as zero.
    pub fn from_severity(severity: f64) -> Self {
        let raw_severity = if severity.is_finite() { severity } else { 0.0 };
        Self {
            raw_severity,
            clamped_severity: raw_severity.clamp(MIN_CRASH_SEVERITY, MAX_CRASH_SEVERITY),
        }
    }

    /// Severity as supplied.
    pub fn raw_severity(&self) -> f64 {
        self.raw_severity
    }

    /// Crash depth actually applied.
    pub fn clamped_severity(&self) -> f64 {
        self.clamped_severity
    }

    /// Recovery length in trading days: `raw_severity × 100`, truncated.
    ///
    /// The product is taken as computed in binary, so `0.29` yields 28.
    pub fn recovery_days(&self) -> usize {
        let days = (self.raw_severity * 100.0).trunc();
        if days <= 0.0 {
            0
        } else {
            days as usize
        }
    }

    /// Fractional price drop on crash day `offset` (0-based).
    pub fn crash_drop(&self, offset: usize) -> f64 {
        if offset >= CRASH_SPAN {
            return 0.0;
        }
        self.clamped_severity * (CRASH_SPAN - offset) as f64 / CRASH_SPAN as f64
    }
}

/// Index positions touched by a shock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShockWindow {
    /// Index of the first point on or after the event date
    pub impact_index: usize,
    /// Nominal crash length
    pub crash_span: usize,
    /// Nominal recovery length
    pub recovery_span: usize,
}

impl ShockWindow {
    /// Window starting at `impact_index` with the given recovery length.
    pub fn new(impact_index: usize, recovery_span: usize) -> Self {
        Self {
            impact_index,
            crash_span: CRASH_SPAN,
            recovery_span,
        }
    }

    /// Crash indices, truncated to a series of length `len`.
    pub fn crash_range(&self, len: usize) -> Range<usize> {
        let start = self.impact_index.min(len);
        let end = self.impact_index.saturating_add(self.crash_span).min(len);
        start..end
    }

    /// Recovery indices, truncated to a series of length `len`.
    pub fn recovery_range(&self, len: usize) -> Range<usize> {
        let start = self.recovery_start().min(len);
        let end = self
            .recovery_start()
            .saturating_add(self.recovery_span)
            .min(len);
        start..end
    }

    /// Index of the last crash day, truncated to a series of length `len`.
    ///
    /// `len` must be non-zero.
    pub fn post_crash_index(&self, len: usize) -> usize {
        (self.impact_index + self.crash_span - 1).min(len.saturating_sub(1))
    }

    fn recovery_start(&self) -> usize {
        self.impact_index.saturating_add(self.crash_span)
    }
}

/// Result of shaping a series.
#[derive(Debug, Clone, PartialEq)]
pub struct ShockOutcome {
    /// Reshaped series, same dates as the input
    pub series: Series,
    /// Recovery length in trading days (0 when nothing was shaped)
    pub recovery_days: usize,
    /// Affected positions, `None` when the event falls after the series
    pub window: Option<ShockWindow>,
}

impl ShockOutcome {
    fn unshocked(series: Series) -> Self {
        Self {
            series,
            recovery_days: 0,
            window: None,
        }
    }

    /// Impact index, or the series length when nothing was shaped.
    ///
    /// Passing this to a strategy replay makes every strategy hold throughout.
    pub fn impact_index(&self) -> usize {
        self.window
            .map(|w| w.impact_index)
            .unwrap_or_else(|| self.series.len())
    }
}

/// Applies event shocks to price series.
///
/// # Examples
///
/// ```
/// use shock_core::types::{Date, PricePoint, Series};
/// use shock_engine::shock::ShockShaper;
///
/// let start = Date::from_ymd(2024, 1, 1).unwrap();
/// let points: Vec<PricePoint> = (0..60)
///     .map(|i| start.add_days(i))
///     .filter(|d| d.is_trading_day())
///     .map(|d| PricePoint::new(d, 100.0, 101.0, 99.0, 100.0, 100_000))
///     .collect();
/// let series = Series::from_points(points).unwrap();
///
/// let outcome = ShockShaper::new().apply(&series, series[5].date, 0.2);
/// assert_eq!(outcome.recovery_days, 20);
/// assert_eq!(outcome.series[5].close, 80.0);
/// // The input is never modified.
/// assert_eq!(series[5].close, 100.0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ShockShaper;

impl ShockShaper {
    /// Creates a shaper.
    pub fn new() -> Self {
        Self
    }

    /// Shape `series` around `event_date` using the thread-local RNG.
    pub fn apply(&self, series: &Series, event_date: Date, severity: f64) -> ShockOutcome {
        self.apply_with_rng(series, event_date, severity, &mut rand::thread_rng())
    }

    /// Shape `series` around `event_date` with the supplied RNG.
    ///
    /// Returns an unmodified copy with `recovery_days == 0` when no point is
    /// dated on or after the event.
    pub fn apply_with_rng<R: Rng + ?Sized>(
        &self,
        series: &Series,
        event_date: Date,
        severity: f64,
        rng: &mut R,
    ) -> ShockOutcome {
        let mut shaped = series.clone();

        let Some(impact_index) = series.impact_index(event_date) else {
            debug!(%event_date, "event falls after the series; nothing to shape");
            return ShockOutcome::unshocked(shaped);
        };

        let params = ShockParams::from_severity(severity);
        let window = ShockWindow::new(impact_index, params.recovery_days());
        let len = shaped.len();

        let points = shaped.points_mut();

        for i in window.crash_range(len) {
            let drop = params.crash_drop(i - impact_index);
            let point = &mut points[i];
            point.scale_prices(1.0 - drop);
            point.volume = (point.volume as f64 * (1.0 + drop * CRASH_VOLUME_FACTOR)) as u64;
        }

        let pre_crash_close = match impact_index {
            0 => points[0].close,
            i => points[i - 1].close,
        };
        let post_crash_close = points[window.post_crash_index(len)].close;
        let gap = pre_crash_close - post_crash_close;

        if window.recovery_span > 0 {
            let recovery = window.recovery_range(len);
            let recovery_start = impact_index + CRASH_SPAN;
            for i in recovery {
                let progress = (i - recovery_start) as f64 / window.recovery_span as f64;
                let factor = (progress * RECOVERY_ACCELERATION).min(1.0);

                let point = &mut points[i];
                point.close = post_crash_close + gap * factor;
                point.open = point.close * rng.gen_range(0.99..=1.01);
                point.high = point.open.max(point.close) * rng.gen_range(1.0..=1.02);
                point.low = point.open.min(point.close) * rng.gen_range(0.98..=1.0);
            }
        }

        for point in points.iter_mut() {
            point.round_prices();
        }

        debug!(
            %event_date,
            impact_index,
            raw_severity = params.raw_severity(),
            crash_severity = params.clamped_severity(),
            recovery_days = window.recovery_span,
            "applied event shock"
        );

        ShockOutcome {
            series: shaped,
            recovery_days: window.recovery_span,
            window: Some(window),
        }
    }
}
