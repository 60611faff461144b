//! Fixed-rule strategy replay.
//!
//! Each strategy starts with the same unit count, holds until the middle of
//! the crash window (`impact_index + TRIGGER_OFFSET`), then applies its unit
//! multiplier exactly once and holds again. The portfolio value on each day is
//! `units × close`.

use serde::Serialize;
use shock_core::types::{Series, Strategy, Trajectory, TrajectoryPoint};
use tracing::debug;

/// Days after the impact at which the strategy rule fires.
pub const TRIGGER_OFFSET: usize = 5;

/// Default starting unit count.
pub const DEFAULT_UNITS: f64 = 100.0;

/// How the starting position is sized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnitBasis {
    /// A fixed number of units.
    Units(f64),
    /// A cash amount converted to units at the first close.
    Investment(f64),
}

impl UnitBasis {
    /// Starting unit count for `series`.
    ///
    /// An investment basis over an empty series or a non-positive first close
    /// yields zero units.
    pub fn initial_units(&self, series: &Series) -> f64 {
        match *self {
            UnitBasis::Units(units) => units,
            UnitBasis::Investment(amount) => match series.first() {
                Some(first) if first.close > 0.0 => amount / first.close,
                _ => 0.0,
            },
        }
    }
}

impl Default for UnitBasis {
    fn default() -> Self {
        UnitBasis::Units(DEFAULT_UNITS)
    }
}

/// Trajectories of every strategy over the same series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategySet {
    /// Withdraw trajectory
    pub withdraw: Trajectory,
    /// Add trajectory
    pub add: Trajectory,
    /// Hold trajectory
    pub hold: Trajectory,
}

impl StrategySet {
    /// Trajectory for `strategy`.
    pub fn get(&self, strategy: Strategy) -> &Trajectory {
        match strategy {
            Strategy::Withdraw => &self.withdraw,
            Strategy::Add => &self.add,
            Strategy::Hold => &self.hold,
        }
    }

    /// Trajectories in [`Strategy::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = &Trajectory> {
        Strategy::ALL.into_iter().map(move |s| self.get(s))
    }
}

/// Replays strategies over a price series.
///
/// # Examples
///
/// ```
/// use shock_core::types::{Date, PricePoint, Series, Strategy};
/// use shock_engine::replay::{StrategyReplayer, UnitBasis};
///
/// let start = Date::from_ymd(2024, 1, 1).unwrap();
/// let points: Vec<PricePoint> = (0..20)
///     .map(|i| start.add_days(i))
///     .filter(|d| d.is_trading_day())
///     .map(|d| PricePoint::new(d, 10.0, 10.0, 10.0, 10.0, 1))
///     .collect();
/// let series = Series::from_points(points).unwrap();
///
/// let replayer = StrategyReplayer::new(UnitBasis::Units(100.0));
/// let add = replayer.replay(&series, 0, Strategy::Add);
/// assert_eq!(add.initial_value(), Some(1000.0));
/// assert_eq!(add.final_value(), Some(1200.0));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct StrategyReplayer {
    basis: UnitBasis,
}

impl StrategyReplayer {
    /// Creates a replayer with the given starting basis.
    pub fn new(basis: UnitBasis) -> Self {
        Self { basis }
    }

    /// Replayer starting from a fixed number of units.
    pub fn with_units(units: f64) -> Self {
        Self::new(UnitBasis::Units(units))
    }

    /// Replayer starting from a cash investment.
    pub fn with_investment(amount: f64) -> Self {
        Self::new(UnitBasis::Investment(amount))
    }

    /// Starting basis.
    pub fn basis(&self) -> UnitBasis {
        self.basis
    }

    /// Index at which the strategy rule fires.
    pub fn trigger_index(impact_index: usize) -> usize {
        impact_index.saturating_add(TRIGGER_OFFSET)
    }

    /// Replays one strategy.
    ///
    /// The trajectory has one point per series point. When the trigger index
    /// falls outside the series the rule never fires.
    pub fn replay(&self, series: &Series, impact_index: usize, strategy: Strategy) -> Trajectory {
        let trigger = Self::trigger_index(impact_index);
        let mut units = self.basis.initial_units(series);

        let points = series
            .iter()
            .enumerate()
            .map(|(i, point)| {
                if i == trigger {
                    units *= strategy.unit_multiplier();
                }
                TrajectoryPoint {
                    point: *point,
                    portfolio_value: units * point.close,
                }
            })
            .collect();

        Trajectory::new(strategy, points)
    }

    /// Replays all three strategies over the same series.
    pub fn replay_all(&self, series: &Series, impact_index: usize) -> StrategySet {
        debug!(
            points = series.len(),
            impact_index,
            trigger = Self::trigger_index(impact_index),
            "replaying strategies"
        );
        StrategySet {
            withdraw: self.replay(series, impact_index, Strategy::Withdraw),
            add: self.replay(series, impact_index, Strategy::Add),
            hold: self.replay(series, impact_index, Strategy::Hold),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use shock_core::types::{Date, PricePoint};

    fn series_from_closes(closes: &[f64]) -> Series {
        let start = Date::from_ymd(2024, 1, 1).unwrap();
        let dates = (0..).map(|i| start.add_days(i)).filter(|d| d.is_trading_day());
        let points = dates
            .zip(closes)
            .map(|(d, &c)| PricePoint::new(d, c, c, c, c, 1))
            .collect();
        Series::from_points(points).unwrap()
    }

    #[test]
    fn test_units_change_once_at_trigger() {
        let series = series_from_closes(&[10.0; 12]);
        let withdraw = StrategyReplayer::default().replay(&series, 2, Strategy::Withdraw);
        let values = withdraw.values();

        for v in &values[..7] {
            assert_relative_eq!(*v, 1000.0);
        }
        for v in &values[7..] {
            assert_relative_eq!(*v, 800.0);
        }
    }

    #[test]
    fn test_hold_tracks_close() {
        let closes = [10.0, 11.0, 9.0, 12.5, 8.0, 7.0, 9.5];
        let series = series_from_closes(&closes);
        let hold = StrategyReplayer::with_units(3.0).replay(&series, 0, Strategy::Hold);
        for (v, c) in hold.values().iter().zip(closes) {
            assert_relative_eq!(*v, 3.0 * c);
        }
    }

    #[test]
    fn test_trigger_beyond_series_never_fires() {
        let series = series_from_closes(&[10.0; 8]);
        let add = StrategyReplayer::default().replay(&series, 5, Strategy::Add);
        assert!(add.values().iter().all(|v| *v == 1000.0));

        let set = StrategyReplayer::default().replay_all(&series, series.len());
        assert_eq!(set.withdraw.values(), set.hold.values());
    }

    #[test]
    fn test_investment_basis() {
        let series = series_from_closes(&[50.0, 40.0]);
        let replayer = StrategyReplayer::with_investment(10_000.0);
        let hold = replayer.replay(&series, 0, Strategy::Hold);
        assert_relative_eq!(hold.initial_value().unwrap(), 10_000.0);
        assert_relative_eq!(hold.final_value().unwrap(), 8_000.0);

        assert_eq!(UnitBasis::Investment(1.0).initial_units(&Series::new()), 0.0);
    }

    #[test]
    fn test_empty_series_gives_empty_trajectories() {
        let set = StrategyReplayer::default().replay_all(&Series::new(), 0);
        assert!(set.iter().all(|t| t.is_empty()));
    }

    #[test]
    fn test_set_order_and_lookup() {
        let series = series_from_closes(&[10.0; 3]);
        let set = StrategyReplayer::default().replay_all(&series, 0);
        let order: Vec<Strategy> = set.iter().map(|t| t.strategy()).collect();
        assert_eq!(order, Strategy::ALL.to_vec());
        assert_eq!(set.get(Strategy::Add).strategy(), Strategy::Add);
    }
}
