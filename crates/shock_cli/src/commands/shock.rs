//! Shock command implementation
//!
//! Resolves an event description, generates the baseline over the event
//! window and shapes the crash and recovery into it.

use serde::Serialize;
use shock_core::types::{Date, EventSpec, Series};
use shock_engine::catalog::ScenarioCatalog;
use shock_engine::generator::SeriesGenerator;
use shock_engine::shock::{ShockOutcome, ShockShaper};
use std::io::Write;
use tracing::info;

use crate::output::{write_csv, write_json, write_series, OutputFormat};
use crate::Result;

/// A resolved event and its shaped series.
pub(crate) struct ShockedEvent {
    pub event: EventSpec,
    pub outcome: ShockOutcome,
}

/// Resolve `text` and shape the event into a fresh baseline ending no later than `today`.
pub(crate) fn simulate(text: &str, today: Date) -> Result<ShockedEvent> {
    let event = ScenarioCatalog::new().resolve(text)?;
    let range = event.date_range(today);

    let baseline = SeriesGenerator::new().generate(range);
    let outcome = ShockShaper::new().apply(&baseline, event.event_date(), event.severity());

    info!(
        event = %event.name(),
        %range,
        points = outcome.series.len(),
        recovery_days = outcome.recovery_days,
        "event simulated"
    );
    Ok(ShockedEvent { event, outcome })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ShockReport<'a> {
    event: &'a EventSpec,
    recovery_days: usize,
    data: &'a Series,
}

/// Run the shock command
pub fn run<W: Write>(out: &mut W, text: &str, format: &str) -> Result<()> {
    let format: OutputFormat = format.parse()?;
    let ShockedEvent { event, outcome } = simulate(text, Date::today())?;

    match format {
        OutputFormat::Json => write_json(
            out,
            &ShockReport {
                event: &event,
                recovery_days: outcome.recovery_days,
                data: &outcome.series,
            },
        ),
        OutputFormat::Csv => write_csv(out, outcome.series.iter()),
        OutputFormat::Table => {
            writeln!(out, "Event:          {}", event.name())?;
            writeln!(out, "Date:           {}", event.event_date())?;
            writeln!(out, "Severity:       {}", event.severity_label())?;
            writeln!(out, "Recovery days:  {}\n", outcome.recovery_days)?;
            write_series(out, &outcome.series, OutputFormat::Table)
        }
    }
}
