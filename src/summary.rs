//! State-level summary of behavioral-risk survey microdata.
//!
//! Ties the pieces together: required-column checks, weight resolution,
//! indicator extraction, and the grouped weighted mean, producing one
//! [`StateSummary`] row per state code seen in the input.

use anyhow::Result;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::ConfigError;
use crate::prevalence::aggregate::grouped_prevalence;
use crate::prevalence::indicator::{self, IndicatorRule};
use crate::prevalence::weights::resolve_weight_column;
use crate::regions::region_for;
use crate::table::Table;

/// Grouping key column. Its absence is always fatal.
const STATE_COLUMN: &str = "_STATE";

/// BMI source column, in units of BMI × 100.
const BMI_COLUMN: &str = "_BMI5";

/// Smoker-status source column; codes 1 and 2 are current smokers.
const SMOKER_COLUMN: &str = "_SMOKER3";

/// Candidate colonoscopy/sigmoidoscopy screening columns, tried in order.
/// Survey years disagree on which one is present; code 1 means "yes".
const COLONOSCOPY_COLUMNS: &[&str] = &[
    "HADCOLO", "HADCOLN2", "HADSGCO1", "HADSIGM3", "COLNSPY", "CRCREC", "COLCREEN",
];

/// Options for the survey summarization run.
#[derive(Debug, Clone)]
pub struct SummarizeOptions {
    /// Explicit weight column; skips resolution when set.
    pub weight_override: Option<String>,
    /// Also compute the screening prevalence when a known column exists.
    pub include_colonoscopy: bool,
    /// Columns whose absence aborts the run before any aggregation.
    pub required_columns: Vec<String>,
}

impl Default for SummarizeOptions {
    fn default() -> Self {
        SummarizeOptions {
            weight_override: None,
            include_colonoscopy: false,
            required_columns: vec![STATE_COLUMN.to_string(), BMI_COLUMN.to_string()],
        }
    }
}

/// One output row, keyed by state FIPS code. Name and abbreviation are blank
/// for codes outside the static region table; the row itself is kept.
#[derive(Debug, Clone, Serialize)]
pub struct StateSummary {
    #[serde(rename = "StateFIPS")]
    pub state_fips: u32,
    #[serde(rename = "State")]
    pub state: Option<&'static str>,
    #[serde(rename = "Abbrev")]
    pub abbrev: Option<&'static str>,
    pub obesity_rate: Option<f64>,
    pub smoking_rate: Option<f64>,
    pub colonoscopy_rate: Option<f64>,
}

/// Result of a summarization run. `colonoscopy_computed` records whether the
/// optional metric made it into the output schema.
#[derive(Debug)]
pub struct SurveySummary {
    pub rows: Vec<StateSummary>,
    pub colonoscopy_computed: bool,
}

/// Summarizes survey microdata into per-state weighted prevalence rows.
///
/// # Errors
///
/// Fails with a [`ConfigError`] when a required column is absent or an
/// explicit weight override does not exist. Individual malformed values
/// never fail the run.
pub fn summarize(table: &Table, options: &SummarizeOptions) -> Result<SurveySummary> {
    let mut required: Vec<&str> = vec![STATE_COLUMN];
    required.extend(options.required_columns.iter().map(String::as_str));
    table.require_columns(&required)?;

    let weight_column =
        resolve_weight_column(table.headers(), options.weight_override.as_deref())?;
    match &weight_column {
        Some(name) => info!(weight_column = %name, "Using weight column"),
        None => warn!("No weight column found. Proceeding with UNWEIGHTED percentages"),
    }

    let groups = state_codes(table);
    let weights = weight_column
        .as_deref()
        .and_then(|name| table.numeric_column(name));

    let bmi_cells = table
        .column(BMI_COLUMN)
        .ok_or_else(|| ConfigError::MissingColumn(BMI_COLUMN.to_string()))?;
    let obese = indicator::extract(&bmi_cells, &IndicatorRule::Range { lo: 3000.0, hi: 9999.0 });

    let current_smoker = match table.column(SMOKER_COLUMN) {
        Some(cells) => indicator::extract(&cells, &IndicatorRule::CodeSet(&[1.0, 2.0])),
        None => vec![None; table.len()],
    };

    let colonoscopy = if options.include_colonoscopy {
        match COLONOSCOPY_COLUMNS.iter().find(|c| table.has_column(c)) {
            Some(column) => {
                info!(column, "Using colonoscopy/sigmoidoscopy variable (1=Yes)");
                table
                    .column(column)
                    .map(|cells| indicator::extract(&cells, &IndicatorRule::CodeSet(&[1.0])))
            }
            None => {
                info!("No recognized colonoscopy/sigmoidoscopy variable found; skipping that metric");
                None
            }
        }
    } else {
        None
    };

    let weights_ref = weights.as_deref();
    let obesity_by_state = grouped_prevalence(&groups, &obese, weights_ref);
    let smoking_by_state = grouped_prevalence(&groups, &current_smoker, weights_ref);
    let colonoscopy_by_state = colonoscopy
        .as_ref()
        .map(|ind| grouped_prevalence(&groups, ind, weights_ref));

    let rows = obesity_by_state
        .iter()
        .map(|(&fips, &obesity_rate)| {
            let region = region_for(fips);
            StateSummary {
                state_fips: fips,
                state: region.map(|r| r.name),
                abbrev: region.map(|r| r.abbrev),
                obesity_rate,
                smoking_rate: smoking_by_state.get(&fips).copied().flatten(),
                colonoscopy_rate: colonoscopy_by_state
                    .as_ref()
                    .and_then(|m| m.get(&fips).copied().flatten()),
            }
        })
        .collect();

    Ok(SurveySummary {
        rows,
        colonoscopy_computed: colonoscopy_by_state.is_some(),
    })
}

/// The grouping key column as state codes. Negative or fractional values do
/// not name a state and are treated as missing.
fn state_codes(table: &Table) -> Vec<Option<u32>> {
    table
        .numeric_column(STATE_COLUMN)
        .unwrap_or_default()
        .into_iter()
        .map(|v| match v {
            Some(code) if code >= 0.0 && code.fract() == 0.0 => Some(code as u32),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn survey_table() -> Table {
        // Two California respondents (one obese), one Connecticut smoker.
        Table::new(
            vec![
                "_STATE".into(),
                "_BMI5".into(),
                "_SMOKER3".into(),
                "_LLCPWT".into(),
            ],
            vec![
                row(&["6", "3500", "3", "2"]),
                row(&["6", "2400", "4", "2"]),
                row(&["9", "2800", "1", "5"]),
            ],
        )
    }

    #[test]
    fn test_summarize_weighted() {
        let summary = summarize(&survey_table(), &SummarizeOptions::default()).unwrap();
        assert_eq!(summary.rows.len(), 2);

        let ca = &summary.rows[0];
        assert_eq!(ca.state_fips, 6);
        assert_eq!(ca.state, Some("California"));
        assert_eq!(ca.abbrev, Some("CA"));
        assert_eq!(ca.obesity_rate, Some(50.0));
        assert_eq!(ca.smoking_rate, Some(0.0));
        assert_eq!(ca.colonoscopy_rate, None);

        let ct = &summary.rows[1];
        assert_eq!(ct.abbrev, Some("CT"));
        assert_eq!(ct.obesity_rate, Some(0.0));
        assert_eq!(ct.smoking_rate, Some(100.0));
        assert!(!summary.colonoscopy_computed);
    }

    #[test]
    fn test_missing_required_column_is_fatal() {
        let table = Table::new(vec!["_STATE".into()], vec![row(&["6"])]);
        let err = summarize(&table, &SummarizeOptions::default()).unwrap_err();
        assert!(err.to_string().contains("_BMI5"));
    }

    #[test]
    fn test_weight_override_must_exist() {
        let options = SummarizeOptions {
            weight_override: Some("X_LLCPWT".into()),
            ..SummarizeOptions::default()
        };
        let err = summarize(&survey_table(), &options).unwrap_err();
        assert!(err.to_string().contains("X_LLCPWT"));
    }

    #[test]
    fn test_missing_smoker_column_yields_missing_rates() {
        let table = Table::new(
            vec!["_STATE".into(), "_BMI5".into()],
            vec![row(&["6", "3500"]), row(&["6", "2400"])],
        );
        let summary = summarize(&table, &SummarizeOptions::default()).unwrap();
        assert_eq!(summary.rows[0].obesity_rate, Some(50.0));
        assert_eq!(summary.rows[0].smoking_rate, None);
    }

    #[test]
    fn test_unknown_state_code_kept_without_names() {
        let table = Table::new(
            vec!["_STATE".into(), "_BMI5".into()],
            vec![row(&["3", "3500"])],
        );
        let summary = summarize(&table, &SummarizeOptions::default()).unwrap();
        assert_eq!(summary.rows.len(), 1);
        assert_eq!(summary.rows[0].state_fips, 3);
        assert_eq!(summary.rows[0].state, None);
        assert_eq!(summary.rows[0].abbrev, None);
        assert_eq!(summary.rows[0].obesity_rate, Some(100.0));
    }

    #[test]
    fn test_colonoscopy_uses_first_candidate_column() {
        let table = Table::new(
            vec!["_STATE".into(), "_BMI5".into(), "HADSIGM3".into()],
            vec![row(&["6", "3500", "1"]), row(&["6", "2400", "2"])],
        );
        let options = SummarizeOptions {
            include_colonoscopy: true,
            ..SummarizeOptions::default()
        };
        let summary = summarize(&table, &options).unwrap();
        assert!(summary.colonoscopy_computed);
        assert_eq!(summary.rows[0].colonoscopy_rate, Some(50.0));
    }

    #[test]
    fn test_colonoscopy_skipped_when_no_candidate_present() {
        let options = SummarizeOptions {
            include_colonoscopy: true,
            ..SummarizeOptions::default()
        };
        let summary = summarize(&survey_table(), &options).unwrap();
        assert!(!summary.colonoscopy_computed);
    }
}
