//! Survey weight column resolution.
//!
//! Survey extracts name their final-weight column inconsistently across
//! years and vendors. Resolution is an ordered chain: explicit override,
//! then well-known names, then a case-insensitive suffix/substring scan.
//! The order is a historical contract; downstream tables depend on which
//! column wins.

use crate::error::ConfigError;

/// Well-known final-weight column names, highest priority first.
const COMMON_WEIGHT_COLUMNS: &[&str] = &["_LLCPWT", "X_LLCPWT", "LLCPWT", "_FINALWT", "FINALWT"];

/// Picks the weight column to use, or `None` when the input carries no
/// recognizable weight (callers then fall back to unweighted means).
///
/// An explicit override must exist in the input; a missing override is a
/// fatal configuration error rather than a silent fallback.
///
/// Deterministic: the first match in priority order wins, and ties in the
/// scan phase resolve to the earliest column in original input order.
pub fn resolve_weight_column(
    columns: &[String],
    override_name: Option<&str>,
) -> Result<Option<String>, ConfigError> {
    if let Some(name) = override_name {
        if columns.iter().any(|c| c == name) {
            return Ok(Some(name.to_string()));
        }
        return Err(ConfigError::WeightColumnNotFound(name.to_string()));
    }

    for candidate in COMMON_WEIGHT_COLUMNS {
        if columns.iter().any(|c| c == candidate) {
            return Ok(Some((*candidate).to_string()));
        }
    }

    for column in columns {
        let upper = column.to_uppercase();
        if upper.ends_with("WT") || upper.contains("WEIGHT") || upper.contains("LLCPWT") {
            return Ok(Some(column.clone()));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_override_found() {
        let columns = cols(&["ID", "MYWEIGHT", "_LLCPWT"]);
        let resolved = resolve_weight_column(&columns, Some("MYWEIGHT")).unwrap();
        assert_eq!(resolved.as_deref(), Some("MYWEIGHT"));
    }

    #[test]
    fn test_override_missing_is_fatal() {
        let columns = cols(&["ID", "_LLCPWT"]);
        let err = resolve_weight_column(&columns, Some("NOPE")).unwrap_err();
        assert!(matches!(err, ConfigError::WeightColumnNotFound(_)));
    }

    #[test]
    fn test_common_name_priority() {
        // _LLCPWT outranks FINALWT even when FINALWT appears first.
        let columns = cols(&["FINALWT", "_LLCPWT"]);
        let resolved = resolve_weight_column(&columns, None).unwrap();
        assert_eq!(resolved.as_deref(), Some("_LLCPWT"));
    }

    #[test]
    fn test_known_name_beats_substring_scan() {
        let columns = cols(&["ID", "FINALWT", "NOTES"]);
        let resolved = resolve_weight_column(&columns, None).unwrap();
        assert_eq!(resolved.as_deref(), Some("FINALWT"));
    }

    #[test]
    fn test_substring_scan_is_case_insensitive() {
        let columns = cols(&["ID", "sample_weight", "NOTES"]);
        let resolved = resolve_weight_column(&columns, None).unwrap();
        assert_eq!(resolved.as_deref(), Some("sample_weight"));

        let columns = cols(&["ID", "finalwt"]);
        let resolved = resolve_weight_column(&columns, None).unwrap();
        assert_eq!(resolved.as_deref(), Some("finalwt"));
    }

    #[test]
    fn test_scan_takes_first_in_column_order() {
        let columns = cols(&["RAKEDWT", "DESIGNWEIGHT"]);
        let resolved = resolve_weight_column(&columns, None).unwrap();
        assert_eq!(resolved.as_deref(), Some("RAKEDWT"));
    }

    #[test]
    fn test_no_weight_column_is_not_an_error() {
        let columns = cols(&["ID", "NOTES", "_STATE"]);
        let resolved = resolve_weight_column(&columns, None).unwrap();
        assert_eq!(resolved, None);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let columns = cols(&["ID", "FINALWT", "sample_weight"]);
        let first = resolve_weight_column(&columns, None).unwrap();
        for _ in 0..3 {
            assert_eq!(resolve_weight_column(&columns, None).unwrap(), first);
        }
    }
}
