//! Lit Up playlist tools
//!
//! Builds the site's appConfig.json from the YAML song list, keeps declared
//! song durations in sync with the audio files, and concatenates the public
//! tracks into one gapless stream with a per-track timeline.

pub mod analysis;
pub mod concat;
pub mod error;
pub mod model;
pub mod songs;
pub mod store;
pub mod tool;
pub mod validation;

pub use concat::{ConcatConfig, ConcatPipeline};
pub use error::ConcatError;
