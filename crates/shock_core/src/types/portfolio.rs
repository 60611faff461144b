//! Strategy replay output types.
//!
//! A `Trajectory` is the per-day portfolio value of one fixed-rule strategy
//! over a price series. Unit counts are engine-internal state and never appear
//! here; only the derived value does.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::error::ShockError;
use super::market::PricePoint;
use super::rounding::serialize_2dp;
use super::time::Date;

/// Fixed unit-adjustment rule applied once at the middle of the crash window.
///
/// # Examples
///
/// ```
/// use shock_core::types::Strategy;
///
/// let s: Strategy = "withdraw".parse().unwrap();
/// assert_eq!(s, Strategy::Withdraw);
/// assert_eq!(s.unit_multiplier(), 0.8);
/// assert_eq!(Strategy::ALL.len(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Sell 20% of held units.
    Withdraw,
    /// Buy 20% more units.
    Add,
    /// Keep units unchanged.
    Hold,
}

impl Strategy {
    /// All strategies in comparison order. Ties resolve to the earliest entry.
    pub const ALL: [Strategy; 3] = [Strategy::Withdraw, Strategy::Add, Strategy::Hold];

    /// Factor applied to the unit count when the rule fires.
    pub fn unit_multiplier(&self) -> f64 {
        match self {
            Strategy::Withdraw => 0.8,
            Strategy::Add => 1.2,
            Strategy::Hold => 1.0,
        }
    }

    /// Lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Withdraw => "withdraw",
            Strategy::Add => "add",
            Strategy::Hold => "hold",
        }
    }
}

impl FromStr for Strategy {
    type Err = ShockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "withdraw" => Ok(Strategy::Withdraw),
            "add" => Ok(Strategy::Add),
            "hold" => Ok(Strategy::Hold),
            other => Err(ShockError::InvalidInput(format!(
                "unknown strategy '{}'. Must be one of: withdraw, add, hold",
                other
            ))),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A price point annotated with the portfolio value on that day.
///
/// Serialises flat: the price point fields plus `portfolio_value` rounded to
/// two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrajectoryPoint {
    /// Underlying market data
    #[serde(flatten)]
    pub point: PricePoint,
    /// Units held times close price
    #[serde(serialize_with = "serialize_2dp")]
    pub portfolio_value: f64,
}

impl TrajectoryPoint {
    /// Trading day of this point.
    pub fn date(&self) -> Date {
        self.point.date
    }
}

/// Portfolio values of one strategy, one entry per series point.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    strategy: Strategy,
    points: Vec<TrajectoryPoint>,
}

impl Trajectory {
    /// Creates a trajectory from already computed points.
    pub fn new(strategy: Strategy, points: Vec<TrajectoryPoint>) -> Self {
        Self { strategy, points }
    }

    /// Strategy that produced this trajectory.
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Annotated points in date order.
    pub fn points(&self) -> &[TrajectoryPoint] {
        &self.points
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` when the trajectory has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Portfolio values in date order (unrounded).
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.portfolio_value).collect()
    }

    /// Value at the first point.
    pub fn initial_value(&self) -> Option<f64> {
        self.points.first().map(|p| p.portfolio_value)
    }

    /// Value at the last point.
    pub fn final_value(&self) -> Option<f64> {
        self.points.last().map(|p| p.portfolio_value)
    }
}

impl Serialize for Trajectory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.points.serialize(serializer)
    }
}
