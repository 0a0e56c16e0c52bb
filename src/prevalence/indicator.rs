//! Indicator extraction: raw survey codes to tri-state booleans.

use crate::table::parse_number;

/// Rule mapping a raw column's numeric values to a "met condition" boolean.
#[derive(Debug, Clone)]
pub enum IndicatorRule {
    /// The value equals one of these codes.
    CodeSet(&'static [f64]),
    /// The value falls in the closed-open interval `lo <= x < hi`.
    Range { lo: f64, hi: f64 },
}

impl IndicatorRule {
    /// Tests a parsed value against the rule.
    pub fn matches(&self, value: f64) -> bool {
        match self {
            IndicatorRule::CodeSet(codes) => codes.iter().any(|c| *c == value),
            IndicatorRule::Range { lo, hi } => value >= *lo && value < *hi,
        }
    }
}

/// Applies a rule to one column of raw cells. Unparseable or empty cells
/// become `None`, never `false`; a malformed value only affects its own row.
pub fn extract(cells: &[&str], rule: &IndicatorRule) -> Vec<Option<bool>> {
    cells
        .iter()
        .map(|cell| parse_number(cell).map(|v| rule.matches(v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_set_membership() {
        let rule = IndicatorRule::CodeSet(&[1.0, 2.0]);
        let out = extract(&["1", "2", "3", "9"], &rule);
        assert_eq!(out, vec![Some(true), Some(true), Some(false), Some(false)]);
    }

    #[test]
    fn test_range_is_closed_open() {
        let rule = IndicatorRule::Range { lo: 3000.0, hi: 9999.0 };
        let out = extract(&["2999", "3000", "9998.9", "9999"], &rule);
        assert_eq!(
            out,
            vec![Some(false), Some(true), Some(true), Some(false)]
        );
    }

    #[test]
    fn test_malformed_cells_become_missing() {
        let rule = IndicatorRule::CodeSet(&[1.0]);
        let out = extract(&["1", "", "yes", "  "], &rule);
        assert_eq!(out, vec![Some(true), None, None, None]);
    }
}
