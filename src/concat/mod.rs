//! Playlist concatenation: planning, execution strategies and orchestration

pub mod config;
pub mod executor;
pub mod pipeline;
pub mod plan;

pub use config::{ConcatConfig, DEFAULT_OUTPUT_FILE};
pub use executor::{execute_bulk, execute_per_file};
pub use pipeline::{create_concatenated_artifact, ConcatPipeline, ConcatenationOutcome, Strategy};
pub use plan::{build_plan, resolve_duration, ConcatenationPlan};
