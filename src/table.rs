//! In-memory column-oriented view of a delimited input file.
//!
//! The pipelines read the whole input once, then work against named columns.
//! Individual cell values that fail to parse as numbers degrade to `None`
//! rather than failing the run.

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;

use crate::error::ConfigError;

/// A fully-loaded table: a header row plus string cells, addressed by column
/// name. Built once per run and never mutated afterwards.
#[derive(Debug)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Table { headers, rows }
    }

    /// Reads a comma-delimited file with a header row.
    pub fn from_path(path: &Path) -> Result<Self> {
        Self::from_path_delimited(path, b',')
    }

    /// Reads a delimited file with a header row using an explicit delimiter.
    pub fn from_path_delimited(path: &Path, delimiter: u8) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open input file: {}", path.display()))?;
        let mut rdr = ReaderBuilder::new().delimiter(delimiter).from_reader(file);

        let headers = rdr
            .headers()
            .with_context(|| format!("failed to read header row: {}", path.display()))?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record =
                record.with_context(|| format!("failed to read row: {}", path.display()))?;
            rows.push(record.iter().map(|v| v.to_string()).collect());
        }

        Ok(Table { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    /// Index of a column by exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Raw string cells of a column, or `None` if the column does not exist.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .map(|r| r.get(idx).map(String::as_str).unwrap_or(""))
                .collect(),
        )
    }

    /// A column parsed as numbers, one `Option<f64>` per row. Unparseable or
    /// empty cells become `None`; the column itself must exist.
    pub fn numeric_column(&self, name: &str) -> Option<Vec<Option<f64>>> {
        let cells = self.column(name)?;
        Some(cells.into_iter().map(parse_number).collect())
    }

    /// Fails with a [`ConfigError::MissingColumn`] for the first required
    /// column that is absent. Called before any aggregation starts so a bad
    /// input never produces partial output.
    pub fn require_columns(&self, required: &[&str]) -> Result<(), ConfigError> {
        for name in required {
            if !self.has_column(name) {
                return Err(ConfigError::MissingColumn((*name).to_string()));
            }
        }
        Ok(())
    }
}

/// Parses one cell as a number. Whitespace is trimmed; anything that does not
/// parse cleanly is treated as missing.
pub fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::new(
            vec!["_STATE".into(), "_BMI5".into(), "NOTES".into()],
            vec![
                vec!["6".into(), "3205".into(), "ok".into()],
                vec!["6".into(), "".into(), "blank bmi".into()],
                vec!["9".into(), "not-a-number".into(), "bad bmi".into()],
            ],
        )
    }

    #[test]
    fn test_column_lookup() {
        let t = sample();
        assert!(t.has_column("_STATE"));
        assert!(!t.has_column("_LLCPWT"));
        assert_eq!(t.column("NOTES").unwrap(), vec!["ok", "blank bmi", "bad bmi"]);
        assert!(t.column("MISSING").is_none());
    }

    #[test]
    fn test_numeric_column_degrades_bad_cells() {
        let t = sample();
        let bmi = t.numeric_column("_BMI5").unwrap();
        assert_eq!(bmi, vec![Some(3205.0), None, None]);
    }

    #[test]
    fn test_require_columns() {
        let t = sample();
        assert!(t.require_columns(&["_STATE", "_BMI5"]).is_ok());

        let err = t.require_columns(&["_STATE", "_LLCPWT"]).unwrap_err();
        assert!(err.to_string().contains("_LLCPWT"));
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(" 42.5 "), Some(42.5));
        assert_eq!(parse_number("-3"), Some(-3.0));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("Suppressed"), None);
    }
}
