//! Strategy outcome summary.

use serde::Serialize;
use shock_core::types::rounding::serialize_2dp;
use shock_core::types::{round2, Strategy};

use crate::replay::StrategySet;

/// One value per strategy, serialised rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StrategyValues {
    /// Withdraw value
    #[serde(serialize_with = "serialize_2dp")]
    pub withdraw: f64,
    /// Add value
    #[serde(serialize_with = "serialize_2dp")]
    pub add: f64,
    /// Hold value
    #[serde(serialize_with = "serialize_2dp")]
    pub hold: f64,
}

impl StrategyValues {
    fn from_fn(mut f: impl FnMut(Strategy) -> f64) -> Self {
        Self {
            withdraw: f(Strategy::Withdraw),
            add: f(Strategy::Add),
            hold: f(Strategy::Hold),
        }
    }

    /// Value for `strategy`.
    pub fn get(&self, strategy: Strategy) -> f64 {
        match strategy {
            Strategy::Withdraw => self.withdraw,
            Strategy::Add => self.add,
            Strategy::Hold => self.hold,
        }
    }
}

/// Final values, percentage changes and the winning strategy.
///
/// All strategies share the hold trajectory's first value as their baseline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyComparison {
    /// Portfolio value at the first point
    #[serde(serialize_with = "serialize_2dp")]
    pub initial_value: f64,
    /// Portfolio value at the last point
    pub final_values: StrategyValues,
    /// `(final - initial) / initial × 100`
    pub percent_changes: StrategyValues,
    /// Highest final value, ties resolved in [`Strategy::ALL`] order
    pub best_strategy: Strategy,
}

impl StrategyComparison {
    /// Summarises a strategy set. `None` when any trajectory is empty.
    pub fn from_set(set: &StrategySet) -> Option<Self> {
        let initial_value = set.hold.initial_value()?;
        let withdraw = set.withdraw.final_value()?;
        let add = set.add.final_value()?;
        let hold = set.hold.final_value()?;

        let final_values = StrategyValues {
            withdraw,
            add,
            hold,
        };
        let percent_changes = StrategyValues::from_fn(|s| {
            if initial_value == 0.0 {
                0.0
            } else {
                round2((final_values.get(s) - initial_value) / initial_value * 100.0)
            }
        });

        let mut best_strategy = Strategy::ALL[0];
        for strategy in Strategy::ALL {
            if final_values.get(strategy) > final_values.get(best_strategy) {
                best_strategy = strategy;
            }
        }

        Some(Self {
            initial_value,
            final_values,
            percent_changes,
            best_strategy,
        })
    }
}
