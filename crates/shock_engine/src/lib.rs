//! # shock_engine: Event Shock Simulation Engine
//!
//! ## Engine Layer Role
//!
//! shock_engine turns a free-text event description into a simulated market
//! reaction and strategy outcomes:
//!
//! 1. [`catalog`]: resolve text into an `EventSpec` (keyword table or synthetic)
//! 2. [`generator`]: build a random-walk baseline series over the event window
//! 3. [`shock`]: reshape the series into a crash and recovery
//! 4. [`replay`]: replay the withdraw / add / hold rules over the shaped series
//! 5. [`comparison`]: summarise final values and pick the best strategy
//!
//! Supporting modules:
//! - [`asset`]: symbol-seeded mock histories for arbitrary tickers
//! - [`analysis`]: templated narrative for a simulated event
//! - [`assessment`]: keyword classification of event text into an impact report
//!
//! Every stochastic operation has a `*_with_rng` variant taking an explicit RNG.
//! Inputs are borrowed and never modified; each stage returns a new value.
//!
//! ## Usage Examples
//!
//! ```rust
//! use shock_core::types::Date;
//! use shock_engine::{apply_event_shock, generate_series, replay_strategy, resolve_scenario};
//! use shock_engine::replay::UnitBasis;
//! use shock_core::types::Strategy;
//!
//! let event = resolve_scenario("the covid crash").unwrap();
//! let range = event.date_range(Date::from_ymd(2026, 1, 1).unwrap());
//!
//! let baseline = generate_series(range.start(), range.end());
//! let (shocked, recovery_days) = apply_event_shock(&baseline, event.event_date(), event.severity());
//! assert_eq!(recovery_days, 35);
//!
//! let impact = shocked.impact_index(event.event_date()).unwrap();
//! let hold = replay_strategy(&shocked, impact, Strategy::Hold, UnitBasis::Units(100.0));
//! assert_eq!(hold.len(), shocked.len());
//! ```

#![warn(missing_docs)]

pub mod analysis;
pub mod asset;
pub mod assessment;
pub mod catalog;
pub mod comparison;
pub mod generator;
pub mod replay;
pub mod shock;

pub use analysis::EventAnalysis;
pub use asset::{AssetPeriod, AssetSeriesGenerator};
pub use assessment::ImpactAssessment;
pub use catalog::{PresetKind, PresetScenario, ScenarioCatalog};
pub use comparison::{StrategyComparison, StrategyValues};
pub use generator::SeriesGenerator;
pub use replay::{StrategyReplayer, StrategySet, UnitBasis};
pub use shock::{ShockOutcome, ShockParams, ShockShaper, ShockWindow};

use shock_core::types::{Date, DateRange, EventSpec, Series, ShockError, Strategy, Trajectory};

/// Baseline series over `[start, end]` with default walk parameters.
///
/// An inverted range yields an empty series.
pub fn generate_series(start: Date, end: Date) -> Series {
    SeriesGenerator::new().generate(DateRange::new(start, end))
}

/// Shapes `series` around `event_date`, returning the new series and the
/// recovery length in trading days.
pub fn apply_event_shock(series: &Series, event_date: Date, severity: f64) -> (Series, usize) {
    let outcome = ShockShaper::new().apply(series, event_date, severity);
    (outcome.series, outcome.recovery_days)
}

/// Portfolio trajectory of one strategy.
pub fn replay_strategy(
    series: &Series,
    impact_index: usize,
    strategy: Strategy,
    basis: UnitBasis,
) -> Trajectory {
    StrategyReplayer::new(basis).replay(series, impact_index, strategy)
}

/// Resolves free text against the built-in catalog.
///
/// # Errors
///
/// `InvalidInput` for empty text.
pub fn resolve_scenario(text: &str) -> Result<EventSpec, ShockError> {
    ScenarioCatalog::new().resolve(text)
}
