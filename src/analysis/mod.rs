//! Track duration measurement
//!
//! The planner asks a `DurationOracle` for the real length of each file and
//! falls back to the declared `M:SS` string when the oracle has no answer.

mod duration;
mod real;
mod stub;
mod traits;

pub use duration::{format_duration, parse_declared_duration};
pub use real::MediaOracle;
pub use stub::UnknownOracle;
pub use traits::DurationOracle;
