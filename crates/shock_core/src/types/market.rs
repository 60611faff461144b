//! Daily OHLCV market data.
//!
//! - `PricePoint`: one trading day of open/high/low/close/volume
//! - `Series`: an ordered run of price points, strictly increasing by date,
//!   weekdays only
//!
//! A `Series` is a plain value. Every transformation in the engine takes
//! `&Series` and returns a new `Series`, so a caller holding an earlier series
//! never observes a later stage's changes.

use serde::{Deserialize, Serialize};

use super::error::ShockError;
use super::rounding::round2;
use super::time::{Date, DateRange};

/// One trading day of market data.
///
/// Well-formed points satisfy `low <= min(open, close) <= max(open, close) <= high`
/// with all prices positive.
///
/// # Examples
///
/// ```
/// use shock_core::types::{Date, PricePoint};
///
/// let date = Date::from_ymd(2024, 6, 17).unwrap();
/// let point = PricePoint::new(date, 100.0, 101.5, 99.2, 100.8, 420_000);
/// assert!(point.is_well_formed());
///
/// let json = serde_json::to_value(&point).unwrap();
/// assert_eq!(json["date"], "2024-06-17");
/// assert_eq!(json["volume"], 420_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Trading day
    pub date: Date,
    /// Opening price
    pub open: f64,
    /// Session high
    pub high: f64,
    /// Session low
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Traded volume
    pub volume: u64,
}

impl PricePoint {
    /// Creates a new price point.
    pub fn new(date: Date, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Returns `true` when the OHLC ordering invariant holds and prices are positive.
    pub fn is_well_formed(&self) -> bool {
        let body_low = self.open.min(self.close);
        let body_high = self.open.max(self.close);
        self.low > 0.0 && self.low <= body_low && body_high <= self.high
    }

    /// Multiplies all four prices by `factor`.
    pub fn scale_prices(&mut self, factor: f64) {
        self.open *= factor;
        self.high *= factor;
        self.low *= factor;
        self.close *= factor;
    }

    /// Rounds all four prices to two decimals. Volume is untouched.
    pub fn round_prices(&mut self) {
        self.open = round2(self.open);
        self.high = round2(self.high);
        self.low = round2(self.low);
        self.close = round2(self.close);
    }
}

/// Ordered daily price series.
///
/// Invariant: dates are strictly increasing and every date is a trading day.
/// Serialises as a flat JSON array of price points.
///
/// # Examples
///
/// ```
/// use shock_core::types::{Date, PricePoint, Series};
///
/// let mon = Date::from_ymd(2024, 6, 17).unwrap();
/// let tue = mon.add_days(1);
/// let series = Series::from_points(vec![
///     PricePoint::new(mon, 100.0, 101.0, 99.0, 100.5, 1),
///     PricePoint::new(tue, 100.5, 102.0, 100.0, 101.5, 1),
/// ])
/// .unwrap();
///
/// assert_eq!(series.impact_index(tue), Some(1));
/// assert_eq!(series.impact_index(tue.add_days(1)), None);
///
/// // Out-of-order input is rejected.
/// assert!(Series::from_points(vec![series[1], series[0]]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<PricePoint>", into = "Vec<PricePoint>")]
pub struct Series {
    points: Vec<PricePoint>,
}

impl Series {
    /// Creates an empty series.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a series, validating date order and weekday-only dates.
    pub fn from_points(points: Vec<PricePoint>) -> Result<Self, ShockError> {
        if let Some(point) = points.iter().find(|p| !p.date.is_trading_day()) {
            return Err(ShockError::InvalidSeries(format!(
                "{} is not a trading day",
                point.date
            )));
        }
        if let Some(pair) = points.windows(2).find(|pair| pair[0].date >= pair[1].date) {
            return Err(ShockError::InvalidSeries(format!(
                "{} does not follow {}",
                pair[1].date, pair[0].date
            )));
        }
        Ok(Self { points })
    }

    /// Builds a series from points the caller has produced in trading-day order.
    ///
    /// The ordering invariant is only checked in debug builds.
    pub fn from_points_unchecked(points: Vec<PricePoint>) -> Self {
        debug_assert!(points.iter().all(|p| p.date.is_trading_day()));
        debug_assert!(points.windows(2).all(|pair| pair[0].date < pair[1].date));
        Self { points }
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` when the series has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Borrowed view of the points.
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Mutable view of the points for in-place reshaping of an owned copy.
    ///
    /// Exposed as a slice so the length and order cannot change.
    pub fn points_mut(&mut self) -> &mut [PricePoint] {
        &mut self.points
    }

    /// Iterates the points in date order.
    pub fn iter(&self) -> std::slice::Iter<'_, PricePoint> {
        self.points.iter()
    }

    /// First point, if any.
    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    /// Last point, if any.
    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Point at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&PricePoint> {
        self.points.get(index)
    }

    /// Closing prices in date order.
    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    /// Calendar span from the first to the last point.
    pub fn date_range(&self) -> Option<DateRange> {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => Some(DateRange::new(first.date, last.date)),
            _ => None,
        }
    }

    /// Position of the first point dated on or after `event_date`.
    ///
    /// `None` when the event falls after the last point (or the series is empty).
    pub fn impact_index(&self, event_date: Date) -> Option<usize> {
        self.points.iter().position(|p| p.date >= event_date)
    }

    /// Consumes the series and returns its points.
    pub fn into_points(self) -> Vec<PricePoint> {
        self.points
    }
}

impl std::ops::Index<usize> for Series {
    type Output = PricePoint;

    fn index(&self, index: usize) -> &PricePoint {
        &self.points[index]
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a PricePoint;
    type IntoIter = std::slice::Iter<'a, PricePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl TryFrom<Vec<PricePoint>> for Series {
    type Error = ShockError;

    fn try_from(points: Vec<PricePoint>) -> Result<Self, Self::Error> {
        Series::from_points(points)
    }
}

impl From<Series> for Vec<PricePoint> {
    fn from(series: Series) -> Self {
        series.points
    }
}
