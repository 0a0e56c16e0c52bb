//! One-to-one merge of the survey and registry state summaries.
//!
//! Joins on the postal abbreviation, keeping only the 50 states plus DC.
//! Both sides must be unique on the join key; duplicates are a caller error
//! surfaced before any output is written.

use anyhow::Result;
use std::collections::{HashMap, HashSet};
use tracing::info;

use crate::error::ConfigError;
use crate::regions::state_abbrevs;
use crate::table::Table;

const JOIN_KEY: &str = "Abbrev";
const RATE_COLUMN: &str = "age_adjusted_rate";
const CASES_COLUMN: &str = "total_cases";

/// Inner-joins the two summaries on `Abbrev` and appends the registry
/// columns as `incidence_rate_adj` and `incidence_cases`.
///
/// # Errors
///
/// Fails with a [`ConfigError`] when either table lacks its required
/// columns or repeats a join key.
pub fn merge_summaries(survey: &Table, registry: &Table) -> Result<Table> {
    survey.require_columns(&[JOIN_KEY])?;
    registry.require_columns(&[JOIN_KEY, RATE_COLUMN, CASES_COLUMN])?;

    let registry_lookup = keyed_rows(registry, "registry")?;

    let states = state_abbrevs();
    let survey_key = survey
        .column_index(JOIN_KEY)
        .ok_or_else(|| ConfigError::MissingColumn(JOIN_KEY.to_string()))?;
    let rate_idx = registry
        .column_index(RATE_COLUMN)
        .ok_or_else(|| ConfigError::MissingColumn(RATE_COLUMN.to_string()))?;
    let cases_idx = registry
        .column_index(CASES_COLUMN)
        .ok_or_else(|| ConfigError::MissingColumn(CASES_COLUMN.to_string()))?;

    let mut headers: Vec<String> = survey.headers().to_vec();
    headers.push("incidence_rate_adj".to_string());
    headers.push("incidence_cases".to_string());

    let mut seen: HashSet<&str> = HashSet::new();
    let mut merged = Vec::new();
    for row in survey.rows() {
        let key = row.get(survey_key).map(String::as_str).unwrap_or("");
        if !states.iter().any(|s| *s == key) {
            continue;
        }
        if !seen.insert(key) {
            return Err(ConfigError::DuplicateMergeKey {
                key: key.to_string(),
                side: "survey",
            }
            .into());
        }

        // Inner join: survey rows without a registry partner are dropped.
        let Some(registry_row) = registry_lookup.get(key) else {
            continue;
        };

        let mut cells = row.clone();
        cells.push(registry_row.get(rate_idx).cloned().unwrap_or_default());
        cells.push(registry_row.get(cases_idx).cloned().unwrap_or_default());
        merged.push(cells);
    }

    info!(rows = merged.len(), "Merged state summaries");
    Ok(Table::new(headers, merged))
}

/// Indexes a table's rows by join key, rejecting duplicates.
fn keyed_rows<'a>(
    table: &'a Table,
    side: &'static str,
) -> Result<HashMap<&'a str, &'a Vec<String>>, ConfigError> {
    let key_idx = table
        .column_index(JOIN_KEY)
        .ok_or_else(|| ConfigError::MissingColumn(JOIN_KEY.to_string()))?;

    let mut lookup = HashMap::new();
    for row in table.rows() {
        let key = row.get(key_idx).map(String::as_str).unwrap_or("");
        if key.is_empty() {
            continue;
        }
        if lookup.insert(key, row).is_some() {
            return Err(ConfigError::DuplicateMergeKey {
                key: key.to_string(),
                side,
            });
        }
    }
    Ok(lookup)
}
