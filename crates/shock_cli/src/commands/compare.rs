//! Compare command implementation
//!
//! Replays the withdraw, add and hold rules over a shocked event series and
//! summarises their final values.

use serde::Serialize;
use shock_core::types::rounding::serialize_2dp;
use shock_core::types::{Date, EventSpec, Strategy};
use shock_engine::comparison::StrategyComparison;
use shock_engine::replay::{StrategyReplayer, StrategySet, UnitBasis, DEFAULT_UNITS};
use std::io::Write;
use tracing::info;

use super::shock::{simulate, ShockedEvent};
use crate::output::{write_csv, write_json, write_table, OutputFormat};
use crate::{CliError, Result};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CompareReport<'a> {
    event: &'a EventSpec,
    recovery_days: usize,
    summary: &'a StrategyComparison,
    strategies: &'a StrategySet,
}

#[derive(Serialize)]
struct CompareRow {
    date: Date,
    #[serde(serialize_with = "serialize_2dp")]
    close: f64,
    #[serde(serialize_with = "serialize_2dp")]
    withdraw: f64,
    #[serde(serialize_with = "serialize_2dp")]
    add: f64,
    #[serde(serialize_with = "serialize_2dp")]
    hold: f64,
}

/// Position sizing from the mutually exclusive `--units` / `--investment` flags.
pub fn unit_basis(units: Option<f64>, investment: Option<f64>) -> Result<UnitBasis> {
    let positive = |name: &str, v: f64| {
        if v.is_finite() && v > 0.0 {
            Ok(v)
        } else {
            Err(CliError::InvalidArgument(format!(
                "--{} must be positive, got {}",
                name, v
            )))
        }
    };

    match (units, investment) {
        (Some(_), Some(_)) => Err(CliError::InvalidArgument(
            "--units and --investment are mutually exclusive".to_string(),
        )),
        (Some(u), None) => Ok(UnitBasis::Units(positive("units", u)?)),
        (None, Some(i)) => Ok(UnitBasis::Investment(positive("investment", i)?)),
        (None, None) => Ok(UnitBasis::Units(DEFAULT_UNITS)),
    }
}

/// Run the compare command
pub fn run<W: Write>(
    out: &mut W,
    text: &str,
    units: Option<f64>,
    investment: Option<f64>,
    format: &str,
) -> Result<()> {
    let format: OutputFormat = format.parse()?;
    let basis = unit_basis(units, investment)?;
    let ShockedEvent { event, outcome } = simulate(text, Date::today())?;

    let set = StrategyReplayer::new(basis).replay_all(&outcome.series, outcome.impact_index());
    let comparison = StrategyComparison::from_set(&set).ok_or_else(|| {
        CliError::InvalidArgument(format!("No trading days around {}", event.event_date()))
    })?;
    info!(best = %comparison.best_strategy, "strategies compared");

    match format {
        OutputFormat::Json => write_json(
            out,
            &CompareReport {
                event: &event,
                recovery_days: outcome.recovery_days,
                summary: &comparison,
                strategies: &set,
            },
        ),
        OutputFormat::Csv => {
            let rows = set
                .hold
                .points()
                .iter()
                .zip(set.withdraw.points())
                .zip(set.add.points())
                .map(|((hold, withdraw), add)| CompareRow {
                    date: hold.date(),
                    close: hold.point.close,
                    withdraw: withdraw.portfolio_value,
                    add: add.portfolio_value,
                    hold: hold.portfolio_value,
                });
            write_csv(out, rows)
        }
        OutputFormat::Table => {
            writeln!(
                out,
                "{} ({}, severity {})",
                event.name(),
                event.event_date(),
                event.severity_label()
            )?;
            writeln!(out, "Initial value: {:.2}\n", comparison.initial_value)?;

            let rows: Vec<Vec<String>> = Strategy::ALL
                .iter()
                .map(|&s| {
                    let marker = if s == comparison.best_strategy { " *" } else { "" };
                    vec![
                        format!("{}{}", s, marker),
                        format!("{:.2}", comparison.final_values.get(s)),
                        format!("{:+.2}%", comparison.percent_changes.get(s)),
                    ]
                })
                .collect();
            write_table(out, &["strategy", "final value", "change"], &rows)
        }
    }
}
