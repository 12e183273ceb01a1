//! External transcode tool
//!
//! The concatenation executors talk to a `TranscodeTool`; `Ffmpeg` is the
//! production implementation and runs every invocation through a bounded
//! runner (wall-clock timeout, capped diagnostic tail).

mod ffmpeg;
mod process;
mod tail;
mod traits;

pub use ffmpeg::{Ffmpeg, FfmpegConfig, DEFAULT_TIMEOUT};
pub use process::{run_bounded, SPAWN_FAILURE_EXIT_CODE, TIMEOUT_EXIT_CODE};
pub use tail::{read_tail, TailLimits};
pub use traits::{TargetFormat, ToolOutcome, TranscodeTool};
