//! Assess command implementation
//!
//! Classifies an event description and prints the impact report.

use shock_engine::assessment::ImpactAssessment;
use std::io::Write;
use tracing::info;

use crate::output::{write_json, OutputFormat};
use crate::{CliError, Result};

/// Run the assess command
///
/// Table output is the Markdown report; JSON output is the structured
/// assessment.
pub fn run<W: Write>(out: &mut W, text: &str, format: &str) -> Result<()> {
    let format: OutputFormat = format.parse()?;
    let assessment = ImpactAssessment::classify(text)?;
    info!(impact = %assessment.impact, "event assessed");

    match format {
        OutputFormat::Json => write_json(out, &assessment),
        OutputFormat::Table => {
            write!(out, "{}", assessment.render_markdown())?;
            Ok(())
        }
        OutputFormat::Csv => Err(CliError::InvalidArgument(
            "assess supports json and table output".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assess_markdown() {
        let mut buf = Vec::new();
        run(&mut buf, "Global recession fears grow", "table").unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("# Market Impact Analysis"));
        assert!(text.contains("**Impact Assessment**: Highly Negative"));
        assert!(text.contains("6-12 months"));
    }

    #[test]
    fn test_assess_json() {
        let mut buf = Vec::new();
        run(&mut buf, "AI breakthrough announced", "json").unwrap();

        let json: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(json["impact"], "Highly Positive");
        assert_eq!(json["confidenceScore"], 8.0);
        assert_eq!(json["recoveryTime"], "N/A");
    }

    #[test]
    fn test_assess_rejects_csv_and_blank_text() {
        let mut buf = Vec::new();
        assert!(matches!(
            run(&mut buf, "rate hike", "csv"),
            Err(CliError::InvalidArgument(_))
        ));
        assert!(matches!(
            run(&mut buf, "", "table"),
            Err(CliError::Simulation(_))
        ));
    }
}
