//! Output formats shared by the commands.

use serde::Serialize;
use shock_core::types::Series;
use std::io::Write;
use std::str::FromStr;
use tabled::builder::Builder;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::Table;

use crate::{CliError, Result};

/// How a command renders its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// Comma-separated rows with a header
    Csv,
    /// Aligned text table
    Table,
}

impl FromStr for OutputFormat {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "table" => Ok(OutputFormat::Table),
            other => Err(CliError::InvalidArgument(format!(
                "Unknown format: {}. Supported: json, csv, table",
                other
            ))),
        }
    }
}

/// Pretty JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

/// One CSV record per row, header taken from the row's field names.
pub fn write_csv<W: Write, T: Serialize>(out: &mut W, rows: impl IntoIterator<Item = T>) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Aligned table: first column left-aligned, the rest right-aligned.
pub fn write_table<W: Write>(out: &mut W, headers: &[&str], rows: &[Vec<String>]) -> Result<()> {
    let mut builder = Builder::default();
    builder.push_record(headers.iter().copied());
    for row in rows {
        builder.push_record(row.iter().map(String::as_str));
    }

    let mut table = Table::from(builder);
    table
        .with(Style::psql())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()));
    writeln!(out, "{}", table)?;
    Ok(())
}

/// Renders a price series in `format`.
pub fn write_series<W: Write>(out: &mut W, series: &Series, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(out, series),
        OutputFormat::Csv => write_csv(out, series.iter()),
        OutputFormat::Table => {
            let rows: Vec<Vec<String>> = series
                .iter()
                .map(|p| {
                    vec![
                        p.date.to_string(),
                        format!("{:.2}", p.open),
                        format!("{:.2}", p.high),
                        format!("{:.2}", p.low),
                        format!("{:.2}", p.close),
                        p.volume.to_string(),
                    ]
                })
                .collect();
            write_table(out, &["date", "open", "high", "low", "close", "volume"], &rows)
        }
    }
}
