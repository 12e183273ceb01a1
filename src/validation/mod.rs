//! Validation utilities
//!
//! Checks a produced stream against the timeline recorded for it.

mod output;

pub use output::{validate_output, DURATION_TOLERANCE_SECS};
