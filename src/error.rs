//! Fatal configuration errors for the summary pipelines.
//!
//! Everything here aborts a run before any output is written. Per-value
//! parse problems are not errors; they degrade to missing cells and the
//! run continues.

use thiserror::Error;

/// Configuration problems that make a run impossible to start or finish.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A column the pipeline cannot run without is absent from the input.
    #[error("missing required column in input: {0}")]
    MissingColumn(String),

    /// An explicitly requested weight column does not exist in the input.
    #[error("weight column '{0}' not found in file")]
    WeightColumnNotFound(String),

    /// None of the candidate names for one or more registry columns matched.
    #[error("could not find required columns: {missing:?}; available columns: {available:?}")]
    UnresolvedColumns {
        missing: Vec<String>,
        available: Vec<String>,
    },

    /// A join key appeared more than once on one side of a one-to-one merge.
    #[error("duplicate merge key '{key}' in {side} table")]
    DuplicateMergeKey { key: String, side: &'static str },
}
