//! # shock_core: Foundation Types for Event Shock Simulation
//!
//! ## Foundation Layer Role
//!
//! shock_core is the bottom layer of the workspace, providing the value types
//! every other crate exchanges:
//! - Calendar types: `Date`, `DateRange` (`types::time`)
//! - Market data: `PricePoint`, `Series` (`types::market`)
//! - Event descriptions: `EventSpec` (`types::event`)
//! - Strategy output: `Strategy`, `TrajectoryPoint`, `Trajectory` (`types::portfolio`)
//! - Error types: `ShockError` (`types::error`)
//! - Fixed-point helpers: `round2` and its serde adapter (`types::rounding`)
//!
//! ## Zero Dependency Principle
//!
//! This crate has no dependency on other workspace crates and performs no I/O.
//! Nothing here reads environment variables or global state; the clock is only
//! consulted through the explicit `Date::today()` constructor.
//!
//! ## Usage Examples
//!
//! ```rust
//! use shock_core::types::{Date, DateRange, PricePoint, Series};
//!
//! let range = DateRange::new(
//!     Date::from_ymd(2024, 1, 5).unwrap(),
//!     Date::from_ymd(2024, 1, 8).unwrap(),
//! );
//! // Friday and Monday are trading days, the weekend is not.
//! assert_eq!(range.trading_days().count(), 2);
//!
//! let point = PricePoint::new(range.start(), 100.0, 101.0, 99.0, 100.5, 250_000);
//! let series = Series::from_points(vec![point]).unwrap();
//! assert_eq!(series.len(), 1);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod types;

pub use types::{
    round2, Date, DateRange, EventSpec, PricePoint, Series, ShockError, Strategy, Trajectory,
    TrajectoryPoint,
};
