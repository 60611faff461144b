//! Core value types for event shock simulation.
//!
//! This module provides:
//! - `Date` and `DateRange`: trading-day aware calendar types
//! - `PricePoint` and `Series`: daily OHLCV data with ordering invariants
//! - `EventSpec`: a resolved market event (name, date, severity)
//! - `Strategy`, `TrajectoryPoint`, `Trajectory`: strategy replay output
//! - `ShockError`: structured error type
//! - `round2`: 2-decimal rounding used for every price on the wire

pub mod error;
pub mod event;
pub mod market;
pub mod portfolio;
pub mod rounding;
pub mod time;

pub use error::ShockError;
pub use event::EventSpec;
pub use market::{PricePoint, Series};
pub use portfolio::{Strategy, Trajectory, TrajectoryPoint};
pub use rounding::round2;
pub use time::{Date, DateRange};
