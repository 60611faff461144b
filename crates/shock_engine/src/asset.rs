//! Mock single-asset history.
//!
//! Used when no market-data provider can serve a symbol. The base price and
//! drift are derived from the symbol's characters so the same ticker always
//! starts at the same level with the same bias, while daily noise varies.

use rand::Rng;
use serde::Serialize;
use shock_core::types::{Date, DateRange, Series};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::generator::{synthesize_bar, DEFAULT_DAILY_CHANGE};

/// Lookback period of an asset history request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize)]
pub enum AssetPeriod {
    /// One day
    #[serde(rename = "1d")]
    OneDay,
    /// Five days
    #[serde(rename = "5d")]
    FiveDays,
    /// One month
    #[serde(rename = "1mo")]
    OneMonth,
    /// Three months
    #[serde(rename = "3mo")]
    ThreeMonths,
    /// Six months
    #[serde(rename = "6mo")]
    SixMonths,
    /// One year
    #[default]
    #[serde(rename = "1y")]
    OneYear,
    /// Two years
    #[serde(rename = "2y")]
    TwoYears,
    /// Five years
    #[serde(rename = "5y")]
    FiveYears,
}

impl AssetPeriod {
    /// All periods, shortest first.
    pub const ALL: [AssetPeriod; 8] = [
        AssetPeriod::OneDay,
        AssetPeriod::FiveDays,
        AssetPeriod::OneMonth,
        AssetPeriod::ThreeMonths,
        AssetPeriod::SixMonths,
        AssetPeriod::OneYear,
        AssetPeriod::TwoYears,
        AssetPeriod::FiveYears,
    ];

    /// Period code as used in query strings.
    pub fn code(&self) -> &'static str {
        match self {
            Self::OneDay => "1d",
            Self::FiveDays => "5d",
            Self::OneMonth => "1mo",
            Self::ThreeMonths => "3mo",
            Self::SixMonths => "6mo",
            Self::OneYear => "1y",
            Self::TwoYears => "2y",
            Self::FiveYears => "5y",
        }
    }

    /// Calendar days covered.
    pub fn lookback_days(&self) -> i64 {
        match self {
            Self::OneDay => 1,
            Self::FiveDays => 5,
            Self::OneMonth => 30,
            Self::ThreeMonths => 90,
            Self::SixMonths => 180,
            Self::OneYear => 365,
            Self::TwoYears => 730,
            Self::FiveYears => 1825,
        }
    }

    /// Calendar days between samples.
    pub fn step_days(&self) -> usize {
        match self {
            Self::TwoYears => 2,
            Self::FiveYears => 5,
            _ => 1,
        }
    }

    /// Parses a period code, falling back to one year for unknown input.
    pub fn parse_or_default(code: &str) -> Self {
        code.parse().unwrap_or_default()
    }
}

impl FromStr for AssetPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.code() == code)
            .ok_or_else(|| format!("unknown period '{}'", s))
    }
}

impl fmt::Display for AssetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Sum of the uppercase symbol's character codes.
pub fn symbol_value(symbol: &str) -> u32 {
    symbol
        .to_uppercase()
        .chars()
        .fold(0u32, |acc, c| acc.wrapping_add(c as u32))
}

/// Starting price in [50, 200).
pub fn symbol_base_price(symbol: &str) -> f64 {
    50.0 + (symbol_value(symbol) % 150) as f64
}

/// Per-step drift in [-0.05, 0.04].
pub fn symbol_trend(symbol: &str) -> f64 {
    ((symbol_value(symbol) % 10) as f64 - 5.0) / 100.0
}

/// Symbol-seeded mock history generator.
///
/// # Examples
///
/// ```
/// use shock_core::types::Date;
/// use shock_engine::asset::{AssetPeriod, AssetSeriesGenerator};
///
/// let today = Date::from_ymd(2024, 6, 21).unwrap();
/// let series = AssetSeriesGenerator::new().generate("AAPL", AssetPeriod::OneMonth, today);
/// assert!(!series.is_empty());
/// assert_eq!(series.last().unwrap().date, today);
/// ```
#[derive(Debug, Clone)]
pub struct AssetSeriesGenerator {
    daily_change: f64,
}

impl AssetSeriesGenerator {
    /// Generator with the default noise level.
    pub fn new() -> Self {
        Self {
            daily_change: DEFAULT_DAILY_CHANGE,
        }
    }

    /// Set the maximum absolute noise per step.
    pub fn with_daily_change(mut self, daily_change: f64) -> Self {
        self.daily_change = daily_change.abs();
        self
    }

    /// Generate using the thread-local RNG.
    pub fn generate(&self, symbol: &str, period: AssetPeriod, today: Date) -> Series {
        self.generate_with_rng(symbol, period, today, &mut rand::thread_rng())
    }

    /// Generate with the supplied RNG.
    ///
    /// Dates run from `today - lookback` to `today` in steps of the period's
    /// sampling interval, weekends dropped.
    pub fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        symbol: &str,
        period: AssetPeriod,
        today: Date,
        rng: &mut R,
    ) -> Series {
        let range = DateRange::trailing(today, period.lookback_days());
        let trend = symbol_trend(symbol);
        let mut price = symbol_base_price(symbol);

        let points = range
            .sampled_trading_days(period.step_days())
            .map(|date| {
                price *= 1.0 + trend;
                price *= 1.0 + rng.gen_range(-self.daily_change..=self.daily_change);
                synthesize_bar(date, price, rng)
            })
            .collect::<Vec<_>>();

        debug!(symbol, period = %period, points = points.len(), "generated mock asset series");
        Series::from_points_unchecked(points)
    }
}

impl Default for AssetSeriesGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_symbol_derivations() {
        // 'A' + 'A' + 'P' + 'L' = 65 + 65 + 80 + 76 = 286
        assert_eq!(symbol_value("aapl"), 286);
        assert_eq!(symbol_base_price("AAPL"), 186.0);
        assert_relative_eq!(symbol_trend("AAPL"), 0.01);
        assert_eq!(symbol_value(""), 0);
        assert_relative_eq!(symbol_trend(""), -0.05);
    }

    #[test]
    fn test_period_parsing() {
        assert_eq!("3mo".parse::<AssetPeriod>().unwrap(), AssetPeriod::ThreeMonths);
        assert_eq!(AssetPeriod::parse_or_default("5Y"), AssetPeriod::FiveYears);
        assert_eq!(AssetPeriod::parse_or_default("max"), AssetPeriod::OneYear);
        assert_eq!(AssetPeriod::default().lookback_days(), 365);
    }

    #[test]
    fn test_sampling_step() {
        let today = Date::from_ymd(2024, 6, 21).unwrap();
        let mut rng = StdRng::seed_from_u64(8);
        let series = AssetSeriesGenerator::new().generate_with_rng(
            "MSFT",
            AssetPeriod::FiveYears,
            today,
            &mut rng,
        );
        for pair in series.points().windows(2) {
            assert_eq!((pair[1].date - pair[0].date) % 5, 0);
        }
        assert!(series.iter().all(|p| p.date.is_trading_day()));
    }

    #[test]
    fn test_one_day_period_covers_two_calendar_days() {
        // Friday: Thursday and Friday are both trading days.
        let today = Date::from_ymd(2024, 6, 21).unwrap();
        let series = AssetSeriesGenerator::new().generate("SPY", AssetPeriod::OneDay, today);
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn test_noise_free_walk_follows_trend() {
        let today = Date::from_ymd(2024, 6, 21).unwrap();
        let series = AssetSeriesGenerator::new()
            .with_daily_change(0.0)
            .generate("AAPL", AssetPeriod::FiveDays, today);
        // 186 × 1.01 on the first sample
        assert_eq!(series[0].close, 187.86);
        assert!(series.iter().all(|p| p.is_well_formed()));
    }
}
