//! Survey prevalence computation.
//!
//! This module resolves the sampling-weight column, extracts tri-state
//! indicators from raw survey codes, and reduces them to one weighted
//! prevalence percentage per state.

pub mod aggregate;
pub mod indicator;
pub mod utility;
pub mod weights;
