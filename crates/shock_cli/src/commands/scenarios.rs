//! Scenarios command implementation
//!
//! Lists the keyword catalog in resolution order followed by the preset
//! portfolio scenarios.

use serde::Serialize;
use shock_core::types::Date;
use shock_engine::catalog::{PresetKind, ScenarioCatalog};
use std::io::Write;

use crate::output::{write_csv, write_json, write_table, OutputFormat};
use crate::Result;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScenarioRow {
    kind: &'static str,
    key: &'static str,
    name: String,
    event_date: Date,
    severity: f64,
    window: Option<String>,
}

fn rows() -> Result<Vec<ScenarioRow>> {
    let mut rows = Vec::new();

    for entry in ScenarioCatalog::new().entries() {
        rows.push(ScenarioRow {
            kind: "keyword",
            key: entry.keyword(),
            name: entry.name().to_string(),
            event_date: entry.event_date()?,
            severity: entry.severity(),
            window: None,
        });
    }

    for preset in PresetKind::ALL {
        let scenario = preset.scenario()?;
        rows.push(ScenarioRow {
            kind: "preset",
            key: preset.key(),
            name: preset.display_name(),
            event_date: scenario.impact_date,
            severity: scenario.severity,
            window: Some(scenario.range.to_string()),
        });
    }

    Ok(rows)
}

/// Run the scenarios command
pub fn run<W: Write>(out: &mut W, format: &str) -> Result<()> {
    let format: OutputFormat = format.parse()?;
    let rows = rows()?;

    match format {
        OutputFormat::Json => write_json(out, &rows),
        OutputFormat::Csv => write_csv(out, rows),
        OutputFormat::Table => {
            let cells: Vec<Vec<String>> = rows
                .iter()
                .map(|r| {
                    vec![
                        r.key.to_string(),
                        r.kind.to_string(),
                        r.name.clone(),
                        r.event_date.to_string(),
                        format!("{:.0}%", r.severity * 100.0),
                    ]
                })
                .collect();
            write_table(out, &["key", "kind", "name", "date", "severity"], &cells)
        }
    }
}
