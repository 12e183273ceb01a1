//! ffmpeg-backed transcode tool

use super::process::{format_command, run_bounded, SPAWN_FAILURE_EXIT_CODE};
use super::tail::TailLimits;
use super::traits::{TargetFormat, ToolOutcome, TranscodeTool};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

/// Default per-invocation limit: 12 minutes, leaving headroom inside a
/// 15 minute serverless budget
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(12 * 60);

/// ffmpeg invocation settings
#[derive(Debug, Clone)]
pub struct FfmpegConfig {
    /// ffmpeg executable (looked up on PATH when bare)
    pub program: PathBuf,

    /// Wall-clock limit per invocation
    pub timeout: Duration,

    pub format: TargetFormat,

    pub tail_limits: TailLimits,
}

impl Default for FfmpegConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("ffmpeg"),
            timeout: DEFAULT_TIMEOUT,
            format: TargetFormat::default(),
            tail_limits: TailLimits::default(),
        }
    }
}

impl FfmpegConfig {
    pub fn with_program(mut self, program: PathBuf) -> Self {
        self.program = program;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Runs the system ffmpeg
pub struct Ffmpeg {
    config: FfmpegConfig,
}

impl Ffmpeg {
    pub fn new(config: FfmpegConfig) -> Self {
        Self { config }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.config.program);
        cmd.arg("-hide_banner");
        cmd
    }

    /// `-c:a <codec> -b:a <bitrate> -ar <rate> -ac <channels>`
    fn encode_args(&self, cmd: &mut Command) {
        let format = &self.config.format;
        cmd.arg("-c:a")
            .arg(&format.codec)
            .arg("-b:a")
            .arg(&format.bitrate)
            .arg("-ar")
            .arg(format.sample_rate.to_string())
            .arg("-ac")
            .arg(format.channels.to_string());
    }

    fn run(&self, cmd: Command, label: &str) -> ToolOutcome {
        log::debug!("Command: {}", format_command(&cmd));
        run_bounded(cmd, self.config.timeout, self.config.tail_limits, label)
    }

    /// Run the concat demuxer over `inputs`, with `codec_args` deciding
    /// between re-encoding and stream copy
    fn concat(
        &self,
        inputs: &[PathBuf],
        output: &Path,
        label: &str,
        codec_args: impl FnOnce(&mut Command),
    ) -> ToolOutcome {
        // The list file lives next to the output so it shares its cleanup
        let list_dir = output
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let list_file = match write_concat_list(list_dir, inputs) {
            Ok(f) => f,
            Err(e) => {
                log::error!("Failed to write concat list for {}: {}", label, e);
                return ToolOutcome {
                    exit_code: SPAWN_FAILURE_EXIT_CODE,
                    timed_out: false,
                    diagnostic_tail: e.to_string(),
                };
            }
        };

        let mut cmd = self.command();
        cmd.args(["-f", "concat", "-safe", "0", "-i"])
            .arg(list_file.path());
        codec_args(&mut cmd);
        cmd.arg("-y").arg(output);

        self.run(cmd, label)
    }
}

impl TranscodeTool for Ffmpeg {
    fn ensure_available(&self) -> Result<(), String> {
        let status = Command::new(&self.config.program)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| format!("{:?}: {}", self.config.program, e))?;

        if status.success() {
            log::debug!("ffmpeg is available: {:?}", self.config.program);
            Ok(())
        } else {
            Err(format!(
                "{:?} -version exited with {}",
                self.config.program, status
            ))
        }
    }

    fn concat_reencode(&self, inputs: &[PathBuf], output: &Path) -> ToolOutcome {
        self.concat(inputs, output, "concat:main", |cmd| self.encode_args(cmd))
    }

    fn concat_copy(&self, inputs: &[PathBuf], output: &Path) -> ToolOutcome {
        self.concat(inputs, output, "concat:alternative", |cmd| {
            cmd.args(["-c", "copy"]);
        })
    }

    fn normalize(&self, input: &Path, output: &Path) -> ToolOutcome {
        let mut cmd = self.command();
        cmd.arg("-i").arg(input);
        self.encode_args(&mut cmd);
        cmd.arg("-y").arg(output);

        let label = format!(
            "process:{}",
            input.file_stem().unwrap_or_default().to_string_lossy()
        );
        self.run(cmd, &label)
    }
}

/// Write an ffmpeg concat-demuxer list into a temp file inside `dir`
fn write_concat_list(dir: &Path, inputs: &[PathBuf]) -> io::Result<tempfile::NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix(".file_list.")
        .suffix(".txt")
        .tempfile_in(dir)?;

    file.write_all(concat_list(inputs).as_bytes())?;
    file.flush()?;
    Ok(file)
}

/// One `file '<path>'` line per input, absolute paths, quotes escaped
fn concat_list(inputs: &[PathBuf]) -> String {
    inputs
        .iter()
        .map(|input| {
            // Relative entries would resolve against the list file's directory
            let absolute = fs::canonicalize(input).unwrap_or_else(|_| input.clone());
            let escaped = absolute.to_string_lossy().replace('\'', "'\\''");
            format!("file '{}'\n", escaped)
        })
        .collect()
}
