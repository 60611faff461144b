//! Synthetic daily OHLCV series.
//!
//! Generates a multiplicative random walk over the trading days of a date
//! range. The shape is deterministic (one point per weekday) while the values
//! are stochastic.
//!
//! ## Price Evolution
//!
//! For each calendar day in the range (weekends skipped entirely):
//! - every `trend_interval`-th calendar offset, the running close is shifted
//!   by a uniform draw in `[-trend_shift, +trend_shift]` (a regime change)
//! - the running close then moves by a uniform draw in
//!   `[-daily_change, +daily_change]`
//! - open, high, low and volume are derived from the close (see [`synthesize_bar`])

use rand::Rng;
use shock_core::types::{round2, Date, DateRange, PricePoint, Series};
use tracing::debug;

/// Starting close price of every generated series.
pub const DEFAULT_BASE_PRICE: f64 = 100.0;

/// Maximum absolute daily return.
pub const DEFAULT_DAILY_CHANGE: f64 = 0.02;

/// Maximum absolute regime-shift return.
pub const DEFAULT_TREND_SHIFT: f64 = 0.05;

/// Calendar days between regime shifts.
pub const DEFAULT_TREND_INTERVAL: usize = 20;

/// Derives a full bar from a close price.
///
/// - open: `close × U[0.99, 1.01]`
/// - high: `max(open, close) × U[1.001, 1.01]`
/// - low: `min(open, close) × U[0.99, 0.999]`
/// - volume: uniform integer in `[100_000, 1_000_000]`
///
/// Prices are rounded to two decimals. Because rounding is monotone the
/// `low <= min(open, close) <= max(open, close) <= high` ordering survives it.
pub fn synthesize_bar<R: Rng + ?Sized>(date: Date, close: f64, rng: &mut R) -> PricePoint {
    let open = close * rng.gen_range(0.99..=1.01);
    let high = open.max(close) * rng.gen_range(1.001..=1.01);
    let low = open.min(close) * rng.gen_range(0.99..=0.999);
    let volume = rng.gen_range(100_000u64..=1_000_000);

    PricePoint::new(
        date,
        round2(open),
        round2(high),
        round2(low),
        round2(close),
        volume,
    )
}

/// Random-walk series generator.
///
/// # Examples
///
/// ```
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use shock_core::types::{Date, DateRange};
/// use shock_engine::generator::SeriesGenerator;
///
/// let range = DateRange::new(
///     Date::from_ymd(2024, 1, 1).unwrap(),
///     Date::from_ymd(2024, 3, 31).unwrap(),
/// );
/// let mut rng = StdRng::seed_from_u64(7);
/// let series = SeriesGenerator::new().generate_with_rng(range, &mut rng);
///
/// assert_eq!(series.len(), range.trading_days().count());
/// assert!(series.iter().all(|p| p.is_well_formed()));
/// ```
#[derive(Debug, Clone)]
pub struct SeriesGenerator {
    base_price: f64,
    daily_change: f64,
    trend_shift: f64,
    trend_interval: usize,
}

impl SeriesGenerator {
    /// Create a generator with the default walk parameters.
    pub fn new() -> Self {
        Self {
            base_price: DEFAULT_BASE_PRICE,
            daily_change: DEFAULT_DAILY_CHANGE,
            trend_shift: DEFAULT_TREND_SHIFT,
            trend_interval: DEFAULT_TREND_INTERVAL,
        }
    }

    /// Set the starting close price.
    pub fn with_base_price(mut self, base_price: f64) -> Self {
        self.base_price = base_price;
        self
    }

    /// Set the maximum absolute daily return.
    pub fn with_daily_change(mut self, daily_change: f64) -> Self {
        self.daily_change = daily_change.abs();
        self
    }

    /// Set the maximum absolute regime-shift return.
    pub fn with_trend_shift(mut self, trend_shift: f64) -> Self {
        self.trend_shift = trend_shift.abs();
        self
    }

    /// Set the calendar interval between regime shifts. Zero disables shifts.
    pub fn with_trend_interval(mut self, trend_interval: usize) -> Self {
        self.trend_interval = trend_interval;
        self
    }

    /// Starting close price.
    pub fn base_price(&self) -> f64 {
        self.base_price
    }

    /// Generate a series over `range` using the thread-local RNG.
    pub fn generate(&self, range: DateRange) -> Series {
        self.generate_with_rng(range, &mut rand::thread_rng())
    }

    /// Generate a series over `range` with the supplied RNG.
    ///
    /// An inverted range, or one containing only weekend days, yields an
    /// empty series.
    pub fn generate_with_rng<R: Rng + ?Sized>(&self, range: DateRange, rng: &mut R) -> Series {
        let mut points = Vec::new();
        let mut close = self.base_price;

        for (offset, date) in range.calendar_days() {
            if !date.is_trading_day() {
                continue;
            }

            if self.is_regime_shift(offset) {
                close *= 1.0 + rng.gen_range(-self.trend_shift..=self.trend_shift);
            }
            close *= 1.0 + rng.gen_range(-self.daily_change..=self.daily_change);

            points.push(synthesize_bar(date, close, rng));
        }

        debug!(range = %range, points = points.len(), "generated synthetic series");
        Series::from_points_unchecked(points)
    }

    fn is_regime_shift(&self, offset: usize) -> bool {
        self.trend_interval > 0 && offset > 0 && offset % self.trend_interval == 0
    }
}

impl Default for SeriesGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let range = DateRange::new(d(2024, 6, 20), d(2024, 6, 10));
        assert!(SeriesGenerator::new().generate(range).is_empty());
    }

    #[test]
    fn test_single_weekday_yields_one_point() {
        let day = d(2024, 6, 19);
        let series = SeriesGenerator::new().generate(DateRange::new(day, day));
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].date, day);
    }

    #[test]
    fn test_single_weekend_day_yields_nothing() {
        let day = d(2024, 6, 22);
        assert!(SeriesGenerator::new()
            .generate(DateRange::new(day, day))
            .is_empty());
    }

    #[test]
    fn test_prices_rounded_to_cents() {
        let mut rng = StdRng::seed_from_u64(11);
        let range = DateRange::new(d(2023, 1, 2), d(2023, 6, 30));
        let series = SeriesGenerator::new().generate_with_rng(range, &mut rng);
        for p in &series {
            for price in [p.open, p.high, p.low, p.close] {
                assert_eq!(price, round2(price));
            }
            assert!((100_000..=1_000_000).contains(&p.volume));
        }
    }

    #[test]
    fn test_flat_walk_stays_at_base_price() {
        let mut rng = StdRng::seed_from_u64(3);
        let generator = SeriesGenerator::new()
            .with_daily_change(0.0)
            .with_trend_shift(0.0)
            .with_base_price(50.0);
        let range = DateRange::new(d(2024, 1, 1), d(2024, 2, 29));
        let series = generator.generate_with_rng(range, &mut rng);
        assert!(series.iter().all(|p| p.close == 50.0));
    }

    #[test]
    fn test_first_close_within_one_step_of_base() {
        let mut rng = StdRng::seed_from_u64(5);
        let day = d(2024, 6, 17);
        let series = SeriesGenerator::new().generate_with_rng(DateRange::new(day, day), &mut rng);
        let close = series[0].close;
        assert!((97.99..=102.01).contains(&close), "close = {}", close);
    }

    #[test]
    fn test_same_seed_same_series() {
        let range = DateRange::new(d(2024, 1, 1), d(2024, 3, 1));
        let a = SeriesGenerator::new().generate_with_rng(range, &mut StdRng::seed_from_u64(42));
        let b = SeriesGenerator::new().generate_with_rng(range, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_regime_shift_schedule() {
        let generator = SeriesGenerator::new();
        assert!(!generator.is_regime_shift(0));
        assert!(!generator.is_regime_shift(19));
        assert!(generator.is_regime_shift(20));
        assert!(generator.is_regime_shift(40));
        assert!(!SeriesGenerator::new()
            .with_trend_interval(0)
            .is_regime_shift(20));
    }
}
