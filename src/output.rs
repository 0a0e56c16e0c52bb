//! Output formatting and persistence for summary tables.
//!
//! Supports pretty-printing, JSON serialization, and CSV writing.

use anyhow::Result;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::summary::SurveySummary;
use csv::WriterBuilder;

/// Logs a serializable value using Rust's debug pretty-print format.
pub fn print_pretty<T: std::fmt::Debug>(value: &T) {
    debug!("{:#?}", value);
}

/// Logs a serializable value as pretty-printed JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Formats a nullable rate with 3 decimal places; missing stays an empty cell.
pub fn format_rate(rate: Option<f64>) -> String {
    match rate {
        Some(v) => format!("{:.3}", v),
        None => String::new(),
    }
}

/// Writes a header row plus data rows to a CSV file, creating parent
/// directories as needed. Overwrites any previous output.
pub fn write_table(path: &Path, headers: &[String], rows: &[Vec<String>]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    debug!(path = %path.display(), rows = rows.len(), "Writing CSV");

    let mut writer = WriterBuilder::new().from_path(path)?;
    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Writes the survey summary as CSV. The screening column only appears when
/// that metric was actually computed.
pub fn write_summary(path: &Path, summary: &SurveySummary) -> Result<()> {
    let mut headers: Vec<String> = ["StateFIPS", "State", "Abbrev", "obesity_rate", "smoking_rate"]
        .iter()
        .map(|h| h.to_string())
        .collect();
    if summary.colonoscopy_computed {
        headers.push("colonoscopy_rate".to_string());
    }

    let rows: Vec<Vec<String>> = summary
        .rows
        .iter()
        .map(|row| {
            let mut cells = vec![
                row.state_fips.to_string(),
                row.state.unwrap_or_default().to_string(),
                row.abbrev.unwrap_or_default().to_string(),
                format_rate(row.obesity_rate),
                format_rate(row.smoking_rate),
            ];
            if summary.colonoscopy_computed {
                cells.push(format_rate(row.colonoscopy_rate));
            }
            cells
        })
        .collect();

    write_table(path, &headers, &rows)?;
    info!(path = %path.display(), rows = summary.rows.len(), "Saved summary");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::StateSummary;
    use std::env;
    use std::fs;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(name)
    }

    fn sample_summary(colonoscopy: bool) -> SurveySummary {
        SurveySummary {
            rows: vec![
                StateSummary {
                    state_fips: 6,
                    state: Some("California"),
                    abbrev: Some("CA"),
                    obesity_rate: Some(27.5),
                    smoking_rate: Some(10.123_4),
                    colonoscopy_rate: Some(60.0),
                },
                StateSummary {
                    state_fips: 3,
                    state: None,
                    abbrev: None,
                    obesity_rate: None,
                    smoking_rate: Some(50.0),
                    colonoscopy_rate: None,
                },
            ],
            colonoscopy_computed: colonoscopy,
        }
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(Some(50.0)), "50.000");
        assert_eq!(format_rate(Some(66.667)), "66.667");
        assert_eq!(format_rate(None), "");
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&sample_summary(false));
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&sample_summary(true).rows).unwrap();
    }

    #[test]
    fn test_write_summary_creates_file() {
        let path = temp_path("state_prevalence_test_create.csv");
        let _ = fs::remove_file(&path); // clean up any prior run

        write_summary(&path, &sample_summary(false)).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "StateFIPS,State,Abbrev,obesity_rate,smoking_rate");
        assert_eq!(lines[1], "6,California,CA,27.500,10.123");
        // Unknown state keeps its row; name, abbrev, and rate stay empty.
        assert_eq!(lines[2], "3,,,,50.000");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_summary_with_screening_column() {
        let path = temp_path("state_prevalence_test_colo.csv");
        let _ = fs::remove_file(&path);

        write_summary(&path, &sample_summary(true)).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(
            lines[0],
            "StateFIPS,State,Abbrev,obesity_rate,smoking_rate,colonoscopy_rate"
        );
        assert_eq!(lines[1], "6,California,CA,27.500,10.123,60.000");
        assert_eq!(lines[2], "3,,,,50.000,");

        fs::remove_file(&path).unwrap();
    }
}
