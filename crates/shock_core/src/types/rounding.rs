//! Two-decimal fixed-point rounding.
//!
//! Prices and portfolio values travel on the wire with exactly two decimal
//! places. Internally they stay as `f64`; the engine rounds series prices at
//! well-defined pipeline steps and the serde adapter below rounds trajectory
//! values at the serialisation boundary.

use serde::Serializer;

/// Rounds a value to two decimal places (half away from zero).
///
/// Rounding is monotone: `a <= b` implies `round2(a) <= round2(b)`, which is
/// what keeps the OHLC ordering invariant intact after rounding.
///
/// # Examples
/// ```
/// use shock_core::types::round2;
///
/// assert_eq!(round2(101.236), 101.24);
/// assert_eq!(round2(-3.14159), -3.14);
/// ```
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Serde adapter serialising an `f64` rounded to two decimals.
///
/// Use with `#[serde(serialize_with = "shock_core::types::rounding::serialize_2dp")]`.
pub fn serialize_2dp<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64(round2(*value))
}
