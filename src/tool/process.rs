//! Bounded subprocess execution
//!
//! stderr goes to a temp log file instead of memory; after the process
//! exits (or is killed on timeout) only a capped tail is read back, and the
//! log file is removed when its handle drops.

use super::tail::{read_tail, TailLimits};
use super::traits::ToolOutcome;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Exit code reported when the wall-clock timeout fires
pub const TIMEOUT_EXIT_CODE: i32 = 124;

/// Exit code reported when the process could not be started
pub const SPAWN_FAILURE_EXIT_CODE: i32 = 127;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Run `cmd` to completion or until `timeout` elapses
pub fn run_bounded(
    mut cmd: Command,
    timeout: Duration,
    limits: TailLimits,
    label: &str,
) -> ToolOutcome {
    let command_line = format_command(&cmd);

    let log_file = match tempfile::Builder::new()
        .prefix(".ffmpeg.")
        .suffix(".log")
        .tempfile()
    {
        Ok(f) => f,
        Err(e) => return spawn_failure(label, &command_line, e),
    };

    let stderr = match log_file.reopen() {
        Ok(f) => f,
        Err(e) => return spawn_failure(label, &command_line, e),
    };

    let mut child = match cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::from(stderr))
        .spawn()
    {
        Ok(c) => c,
        Err(e) => return spawn_failure(label, &command_line, e),
    };

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break Ok(Some(status)),
            Ok(None) if Instant::now() >= deadline => break Ok(None),
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(e) => break Err(e),
        }
    };

    match status {
        Ok(Some(status)) => {
            let tail = read_tail(log_file.path(), limits);
            // Killed by a signal: no exit code
            let exit_code = status.code().unwrap_or(-1);
            if exit_code != 0 {
                log::error!("Tool failed ({}) rc={}", label, exit_code);
                log::error!("Command: {}", command_line);
                log::error!("stderr (tail):\n{}", tail);
            }
            ToolOutcome {
                exit_code,
                timed_out: false,
                diagnostic_tail: tail,
            }
        }
        Ok(None) => {
            let _ = child.kill();
            let _ = child.wait();
            let tail = read_tail(log_file.path(), limits);
            log::error!("Tool timed out ({}) after {:?}", label, timeout);
            log::error!("Command: {}", command_line);
            log::error!("stderr (tail):\n{}", tail);
            ToolOutcome {
                exit_code: TIMEOUT_EXIT_CODE,
                timed_out: true,
                diagnostic_tail: tail,
            }
        }
        Err(e) => {
            let _ = child.kill();
            let _ = child.wait();
            log::error!("Failed to wait for {} ({}): {}", label, command_line, e);
            ToolOutcome {
                exit_code: -1,
                timed_out: false,
                diagnostic_tail: e.to_string(),
            }
        }
    }
}

fn spawn_failure(label: &str, command_line: &str, error: std::io::Error) -> ToolOutcome {
    log::error!("Could not start tool ({}): {}", label, error);
    log::error!("Command: {}", command_line);
    ToolOutcome {
        exit_code: SPAWN_FAILURE_EXIT_CODE,
        timed_out: false,
        diagnostic_tail: error.to_string(),
    }
}

/// Render a command as a shell-like line for logs
pub fn format_command(cmd: &Command) -> String {
    std::iter::once(cmd.get_program())
        .chain(cmd.get_args())
        .map(|part| {
            let part = part.to_string_lossy();
            if part.is_empty() || part.contains(|c: char| c.is_whitespace() || c == '\'') {
                format!("'{}'", part.replace('\'', "'\\''"))
            } else {
                part.into_owned()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(script);
        cmd
    }

    #[test]
    fn test_success_has_zero_exit_code() {
        let outcome = run_bounded(
            sh("echo working >&2"),
            Duration::from_secs(10),
            TailLimits::default(),
            "test",
        );
        assert!(outcome.success());
        assert_eq!(outcome.diagnostic_tail, "working");
    }

    #[test]
    fn test_failure_captures_stderr_tail() {
        let outcome = run_bounded(
            sh("i=0; while [ $i -lt 50 ]; do echo line $i >&2; i=$((i+1)); done; exit 3"),
            Duration::from_secs(10),
            TailLimits {
                max_bytes: 4096,
                max_lines: 2,
            },
            "test",
        );
        assert!(!outcome.success());
        assert_eq!(outcome.exit_code, 3);
        assert_eq!(outcome.diagnostic_tail, "line 48\nline 49");
    }

    #[test]
    fn test_timeout_kills_process() {
        let started = Instant::now();
        let outcome = run_bounded(
            sh("echo started >&2; sleep 30"),
            Duration::from_millis(300),
            TailLimits::default(),
            "test",
        );
        assert!(started.elapsed() < Duration::from_secs(10));
        assert!(outcome.timed_out);
        assert_eq!(outcome.exit_code, TIMEOUT_EXIT_CODE);
        assert!(!outcome.success());
    }

    #[test]
    fn test_missing_program_is_spawn_failure() {
        let outcome = run_bounded(
            Command::new("/nonexistent/definitely-not-ffmpeg"),
            Duration::from_secs(1),
            TailLimits::default(),
            "test",
        );
        assert_eq!(outcome.exit_code, SPAWN_FAILURE_EXIT_CODE);
        assert!(!outcome.success());
    }

    #[test]
    fn test_format_command_quotes_spaces() {
        let mut cmd = Command::new("ffmpeg");
        cmd.args(["-i", "my song.mp3", "-y", "out.mp3"]);
        assert_eq!(format_command(&cmd), "ffmpeg -i 'my song.mp3' -y out.mp3");
    }
}
