//! Integration tests for module exports.
//!
//! Verify that all public modules and types are accessible via absolute paths
//! and via the crate-root re-exports.

/// Types module paths.
#[test]
fn test_types_module_exports() {
    use shock_core::types::error::ShockError;
    use shock_core::types::event::{EventSpec, EVENT_HORIZON_DAYS, EVENT_LOOKBACK_DAYS};
    use shock_core::types::market::{PricePoint, Series};
    use shock_core::types::portfolio::{Strategy, Trajectory, TrajectoryPoint};
    use shock_core::types::rounding::round2;
    use shock_core::types::time::{Date, DateRange};

    let date = Date::from_ymd(2020, 2, 17).unwrap();
    let point = PricePoint::new(date, 100.0, 101.0, 99.0, 100.0, 1);
    let series = Series::from_points(vec![point]).unwrap();
    let event = EventSpec::new("test", date, 0.2).unwrap();
    let range: DateRange = event.date_range(date);
    let trajectory = Trajectory::new(
        Strategy::Hold,
        vec![TrajectoryPoint {
            point,
            portfolio_value: 100.0,
        }],
    );

    assert_eq!(series.len(), 1);
    assert_eq!(range.end(), date);
    assert_eq!(trajectory.len(), 1);
    assert_eq!(round2(1.006), 1.01);
    assert_eq!(EVENT_LOOKBACK_DAYS, 180);
    assert_eq!(EVENT_HORIZON_DAYS, 730);
    assert!(matches!(
        EventSpec::new("bad", date, 2.0),
        Err(ShockError::InvalidSeverity(_))
    ));
}

/// Crate-root re-exports.
#[test]
fn test_root_reexports() {
    use shock_core::{round2, Date, DateRange, EventSpec, PricePoint, Series, ShockError, Strategy};

    let start = Date::from_ymd(2024, 6, 17).unwrap();
    let range = DateRange::new(start, start.add_days(4));
    let points: Vec<PricePoint> = range
        .trading_days()
        .map(|date| PricePoint::new(date, 10.0, 10.5, 9.5, 10.0, 7))
        .collect();
    let series = Series::from_points(points).unwrap();

    assert_eq!(series.len(), 5);
    assert_eq!(round2(9.999), 10.0);
    assert_eq!(Strategy::ALL[0], Strategy::Withdraw);
    assert!(EventSpec::new("x", start, 0.5).is_ok());
    let _: Option<ShockError> = None;
}
