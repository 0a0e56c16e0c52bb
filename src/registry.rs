//! Cancer-registry export processing.
//!
//! Registry exports arrive as loosely-formatted CSV or TSV with shifting
//! column names, footnote markers, thousands separators, and `Suppressed`
//! cells. This module normalizes them into a tidy state-year table and a
//! per-state summary for colon & rectum sites.

use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

use crate::error::ConfigError;
use crate::output::write_table;
use crate::prevalence::utility::mean;
use crate::regions::{TERRITORY_NAMES, abbrev_for_name};
use crate::table::Table;

const STATE_CANDIDATES: &[&str] = &["States", "State", "Residence State", "State Name"];
const YEAR_CANDIDATES: &[&str] = &["Year", "Years"];
const SITE_CANDIDATES: &[&str] = &["Cancer Sites", "Site", "Cancer Site"];
const RATE_CANDIDATES: &[&str] = &[
    "Age-Adjusted Incidence Rate",
    "Age-Adjusted Rate",
    "Age-Adjusted Incidence Rate(†)",
];
const COUNT_CANDIDATES: &[&str] = &["Count", "Case Count", "Number of Cases"];

/// One normalized registry record, before any grouping.
#[derive(Debug, Clone)]
pub struct RegistryRecord {
    pub state: String,
    pub year: i32,
    pub site: String,
    pub rate: Option<f64>,
    pub count: Option<f64>,
}

/// One row of the tidy state-year output table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateYearRow {
    pub state: String,
    pub year: i32,
    pub age_adjusted_rate: Option<f64>,
    pub total_cases: f64,
    pub abbrev: Option<&'static str>,
}

/// One row of the per-state summary output table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistryStateRow {
    pub state: String,
    pub abbrev: Option<&'static str>,
    pub age_adjusted_rate: Option<f64>,
    pub total_cases: f64,
}

/// Options for the registry summarization run.
#[derive(Debug, Clone, Default)]
pub struct RegistryOptions {
    /// Restrict the state summary to a single year instead of averaging
    /// across all years present.
    pub year: Option<i32>,
    /// Drop territory rows from both outputs.
    pub exclude_territories: bool,
}

/// Reads a registry export, falling back to tab-delimited parsing when the
/// file is not comma-delimited. Header whitespace is trimmed and unnamed
/// index columns are dropped.
pub fn read_export(path: &Path) -> Result<Table> {
    let table = match Table::from_path(path) {
        Ok(t) if t.headers().len() > 1 => t,
        _ => {
            debug!(path = %path.display(), "Comma parse failed, retrying as tab-delimited");
            Table::from_path_delimited(path, b'\t')?
        }
    };
    Ok(tidy(table))
}

/// Trims header names and drops `Unnamed`-prefixed columns that spreadsheet
/// round-trips leave behind.
fn tidy(table: Table) -> Table {
    let kept: Vec<(usize, String)> = table
        .headers()
        .iter()
        .enumerate()
        .map(|(i, h)| (i, h.trim().to_string()))
        .filter(|(_, h)| !h.starts_with("Unnamed"))
        .collect();

    let headers = kept.iter().map(|(_, h)| h.clone()).collect();
    let rows = table
        .rows()
        .iter()
        .map(|row| {
            kept.iter()
                .map(|(i, _)| row.get(*i).cloned().unwrap_or_default())
                .collect()
        })
        .collect();

    Table::new(headers, rows)
}

/// First candidate name that exists in the table.
fn first_existing<'a>(table: &Table, candidates: &[&'a str]) -> Option<&'a str> {
    candidates.iter().copied().find(|c| table.has_column(c))
}

/// Parses a registry cell into a number. Suppression markers, placeholder
/// strings, and empty cells are missing; footnote characters and thousands
/// separators are stripped before parsing.
pub fn to_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || matches!(trimmed, "." | "NA" | "N/A") {
        return None;
    }
    if trimmed.to_lowercase().starts_with("suppressed") {
        return None;
    }

    let cleaned: String = trimmed
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

/// Resolves the export's columns and produces normalized records. Rows with
/// a missing state or year are dropped.
///
/// # Errors
///
/// Fails with [`ConfigError::UnresolvedColumns`] naming every required
/// column that could not be matched, plus the available columns.
pub fn normalize(table: &Table) -> Result<Vec<RegistryRecord>, ConfigError> {
    let state_col = first_existing(table, STATE_CANDIDATES);
    let year_col = first_existing(table, YEAR_CANDIDATES);
    let site_col = first_existing(table, SITE_CANDIDATES);
    let rate_col = first_existing(table, RATE_CANDIDATES);
    let count_col = first_existing(table, COUNT_CANDIDATES);

    let missing: Vec<String> = [
        ("States/State", state_col),
        ("Year", year_col),
        ("Cancer Sites", site_col),
        ("Age-Adjusted Rate", rate_col),
    ]
    .iter()
    .filter(|(_, resolved)| resolved.is_none())
    .map(|(label, _)| label.to_string())
    .collect();
    if !missing.is_empty() {
        return Err(ConfigError::UnresolvedColumns {
            missing,
            available: table.headers().to_vec(),
        });
    }

    // The four unwraps above are guarded by the missing-columns check.
    let states = table.column(state_col.unwrap()).unwrap_or_default();
    let years = table.column(year_col.unwrap()).unwrap_or_default();
    let sites = table.column(site_col.unwrap()).unwrap_or_default();
    let rates = table.column(rate_col.unwrap()).unwrap_or_default();
    let counts = count_col.and_then(|c| table.column(c));

    let mut records = Vec::new();
    for i in 0..table.len() {
        let state = states[i].trim();
        if state.is_empty() {
            continue;
        }
        let Some(year) = to_number(years[i])
            .filter(|y| y.fract() == 0.0)
            .map(|y| y as i32)
        else {
            continue;
        };

        records.push(RegistryRecord {
            state: state.to_string(),
            year,
            site: sites[i].to_string(),
            rate: to_number(rates[i]),
            count: counts.as_ref().and_then(|c| to_number(c[i])),
        });
    }

    Ok(records)
}

/// Keeps records whose site names colon & rectum cancers.
pub fn filter_colon(records: Vec<RegistryRecord>) -> Vec<RegistryRecord> {
    records
        .into_iter()
        .filter(|r| {
            let site = r.site.to_lowercase();
            site.contains("colon") || site.contains("colorectal") || site.contains("c18")
        })
        .collect()
}

/// Groups normalized records into the state-year table and the per-state
/// summary. Rates average within a group (missing-aware); counts sum, with
/// missing contributing nothing.
pub fn summarize(
    records: &[RegistryRecord],
    options: &RegistryOptions,
) -> (Vec<StateYearRow>, Vec<RegistryStateRow>) {
    let mut by_state_year: BTreeMap<(String, i32), (Vec<f64>, f64)> = BTreeMap::new();
    for record in records {
        if options.exclude_territories && TERRITORY_NAMES.contains(&record.state.as_str()) {
            continue;
        }
        let entry = by_state_year
            .entry((record.state.clone(), record.year))
            .or_default();
        if let Some(rate) = record.rate {
            entry.0.push(rate);
        }
        entry.1 += record.count.unwrap_or(0.0);
    }

    let state_year: Vec<StateYearRow> = by_state_year
        .into_iter()
        .map(|((state, year), (rates, cases))| {
            let abbrev = abbrev_for_name(&state);
            StateYearRow {
                state,
                year,
                age_adjusted_rate: mean(&rates),
                total_cases: cases,
                abbrev,
            }
        })
        .collect();

    let state_summary = match options.year {
        Some(year) => state_year
            .iter()
            .filter(|row| row.year == year)
            .map(|row| RegistryStateRow {
                state: row.state.clone(),
                abbrev: row.abbrev,
                age_adjusted_rate: row.age_adjusted_rate,
                total_cases: row.total_cases,
            })
            .collect(),
        None => {
            let mut by_state: BTreeMap<String, (Vec<f64>, f64)> = BTreeMap::new();
            for row in &state_year {
                let entry = by_state.entry(row.state.clone()).or_default();
                if let Some(rate) = row.age_adjusted_rate {
                    entry.0.push(rate);
                }
                entry.1 += row.total_cases;
            }
            by_state
                .into_iter()
                .map(|(state, (rates, cases))| {
                    let abbrev = abbrev_for_name(&state);
                    RegistryStateRow {
                        state,
                        abbrev,
                        age_adjusted_rate: mean(&rates),
                        total_cases: cases,
                    }
                })
                .collect()
        }
    };

    (state_year, state_summary)
}

fn format_number(value: f64) -> String {
    format!("{}", value)
}

fn format_optional(value: Option<f64>) -> String {
    value.map(format_number).unwrap_or_default()
}

/// Writes the tidy state-year table.
pub fn write_state_year(path: &Path, rows: &[StateYearRow]) -> Result<()> {
    let headers: Vec<String> = ["State", "Year", "age_adjusted_rate", "total_cases", "Abbrev"]
        .iter()
        .map(|h| h.to_string())
        .collect();
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.state.clone(),
                r.year.to_string(),
                format_optional(r.age_adjusted_rate),
                format_number(r.total_cases),
                r.abbrev.unwrap_or_default().to_string(),
            ]
        })
        .collect();
    write_table(path, &headers, &cells)?;
    info!(path = %path.display(), rows = rows.len(), "Saved state-year table");
    Ok(())
}

/// Writes the per-state summary table.
pub fn write_state_summary(path: &Path, rows: &[RegistryStateRow]) -> Result<()> {
    let headers: Vec<String> = ["State", "Abbrev", "age_adjusted_rate", "total_cases"]
        .iter()
        .map(|h| h.to_string())
        .collect();
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.state.clone(),
                r.abbrev.unwrap_or_default().to_string(),
                format_optional(r.age_adjusted_rate),
                format_number(r.total_cases),
            ]
        })
        .collect();
    write_table(path, &headers, &cells)?;
    info!(path = %path.display(), rows = rows.len(), "Saved state summary table");
    Ok(())
}
