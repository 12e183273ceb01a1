//! Transcode tool trait and its data types

use std::path::{Path, PathBuf};

/// Fixed output format every concatenated or normalized file is encoded to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetFormat {
    /// Encoder name, e.g. `libmp3lame`
    pub codec: String,
    /// Bitrate in ffmpeg notation, e.g. `192k`
    pub bitrate: String,
    pub sample_rate: u32,
    pub channels: u8,
}

impl Default for TargetFormat {
    fn default() -> Self {
        Self {
            codec: "libmp3lame".to_string(),
            bitrate: "192k".to_string(),
            sample_rate: 44100,
            channels: 2,
        }
    }
}

/// Result of one tool invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutcome {
    pub exit_code: i32,
    /// The invocation hit its wall-clock limit and was killed
    pub timed_out: bool,
    /// Bounded tail of the tool's diagnostic output
    pub diagnostic_tail: String,
}

impl ToolOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == 0 && !self.timed_out
    }
}

/// External transcoder - allows swapping ffmpeg for a scripted fake in tests
///
/// Implementations own the process plumbing: timeouts and diagnostic
/// capture happen inside, callers only see a `ToolOutcome`.
pub trait TranscodeTool {
    /// Check the tool can be run at all
    fn ensure_available(&self) -> Result<(), String>;

    /// Re-encode every input to the target format and concatenate in order
    fn concat_reencode(&self, inputs: &[PathBuf], output: &Path) -> ToolOutcome;

    /// Concatenate already-uniform inputs without re-encoding
    fn concat_copy(&self, inputs: &[PathBuf], output: &Path) -> ToolOutcome;

    /// Re-encode a single file to the target format
    fn normalize(&self, input: &Path, output: &Path) -> ToolOutcome;
}
