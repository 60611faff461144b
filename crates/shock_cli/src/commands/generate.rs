//! Generate command implementation
//!
//! Prints a baseline random-walk series over a date window.

use shock_core::types::{Date, DateRange};
use shock_engine::generator::SeriesGenerator;
use std::io::Write;
use tracing::{info, warn};

use crate::output::{write_series, OutputFormat};
use crate::Result;

/// Run the generate command
pub fn run<W: Write>(out: &mut W, start: &str, end: &str, format: &str) -> Result<()> {
    let format: OutputFormat = format.parse()?;
    let range = DateRange::new(Date::parse(start)?, Date::parse(end)?);
    if range.is_empty() {
        warn!(%range, "start is after end, nothing to generate");
    }

    let series = SeriesGenerator::new().generate(range);
    info!(%range, points = series.len(), "series generated");

    write_series(out, &series, format)
}
