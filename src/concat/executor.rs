//! Concatenation strategies
//!
//! Bulk: one tool call that re-encodes and concatenates everything. Fast,
//! but a single odd input can break it.
//!
//! Per-file: normalize each input on its own, then stream-copy the uniform
//! results together. N+1 tool calls, used only after bulk fails.

use super::plan::ConcatenationPlan;
use crate::error::ConcatError;
use crate::tool::TranscodeTool;
use std::fs;
use std::path::{Path, PathBuf};

/// Re-encode and concatenate every planned input in one tool invocation
///
/// A failure (including timeout) removes whatever partial output the tool
/// left behind.
pub fn execute_bulk<T: TranscodeTool + ?Sized>(
    tool: &T,
    input_paths: &[PathBuf],
    output: &Path,
) -> Result<(), ConcatError> {
    log::info!(
        "Running bulk concatenation of {} files...",
        input_paths.len()
    );

    let outcome = tool.concat_reencode(input_paths, output);
    if outcome.success() {
        return Ok(());
    }

    remove_partial(output);
    Err(ConcatError::BulkExecution {
        exit_code: outcome.exit_code,
        tail: outcome.diagnostic_tail,
    })
}

/// Normalize each planned input separately, then stream-copy them together
///
/// Normalized files live in a temp directory next to `output` that is
/// removed on every exit path. The first failing normalization aborts the
/// run; a partial set is never concatenated.
pub fn execute_per_file<T: TranscodeTool + ?Sized>(
    tool: &T,
    plan: &ConcatenationPlan,
    output: &Path,
) -> Result<(), ConcatError> {
    let parent = output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let work_dir = tempfile::Builder::new()
        .prefix(".normalized.")
        .tempdir_in(parent)?;

    log::info!("Processing files individually to ensure format consistency...");

    let mut normalized = Vec::with_capacity(plan.len());
    for (i, (input, track)) in plan
        .input_paths()
        .iter()
        .zip(plan.timestamps())
        .enumerate()
    {
        let processed = work_dir.path().join(format!("processed_{:03}.mp3", i));
        log::debug!("Processing {}...", track.title);

        let outcome = tool.normalize(input, &processed);
        if !outcome.success() {
            log::error!("Failed to process {}", track.title);
            return Err(ConcatError::PerFileNormalize {
                track_id: track.id.clone(),
                exit_code: outcome.exit_code,
                tail: outcome.diagnostic_tail,
            });
        }

        normalized.push(processed);
    }

    log::info!("Concatenating processed files...");
    let outcome = tool.concat_copy(&normalized, output);
    if !outcome.success() {
        remove_partial(output);
        return Err(ConcatError::FallbackExecution {
            exit_code: outcome.exit_code,
            tail: outcome.diagnostic_tail,
        });
    }

    Ok(())
}

fn remove_partial(output: &Path) {
    if output.exists() {
        if let Err(e) = fs::remove_file(output) {
            log::warn!("Could not remove partial output {:?}: {}", output, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::UnknownOracle;
    use crate::concat::plan::build_plan;
    use crate::model::Track;
    use crate::tool::ToolOutcome;
    use std::cell::RefCell;
    use tempfile::TempDir;

    /// Tool that writes marker files and fails on request
    #[derive(Default)]
    struct ScriptedTool {
        fail_reencode: bool,
        fail_normalize_at: Option<usize>,
        fail_copy: bool,
        calls: RefCell<Vec<String>>,
    }

    impl ScriptedTool {
        fn outcome(ok: bool) -> ToolOutcome {
            ToolOutcome {
                exit_code: if ok { 0 } else { 1 },
                timed_out: false,
                diagnostic_tail: if ok { String::new() } else { "boom".to_string() },
            }
        }
    }

    impl TranscodeTool for ScriptedTool {
        fn ensure_available(&self) -> Result<(), String> {
            Ok(())
        }

        fn concat_reencode(&self, _inputs: &[PathBuf], output: &Path) -> ToolOutcome {
            self.calls.borrow_mut().push("reencode".to_string());
            fs::write(output, b"partial").unwrap();
            Self::outcome(!self.fail_reencode)
        }

        fn concat_copy(&self, inputs: &[PathBuf], output: &Path) -> ToolOutcome {
            self.calls.borrow_mut().push(format!("copy:{}", inputs.len()));
            for input in inputs {
                assert!(input.exists(), "normalized input missing: {:?}", input);
            }
            fs::write(output, b"joined").unwrap();
            Self::outcome(!self.fail_copy)
        }

        fn normalize(&self, _input: &Path, output: &Path) -> ToolOutcome {
            let index = self
                .calls
                .borrow()
                .iter()
                .filter(|c| c.as_str() == "normalize")
                .count();
            self.calls.borrow_mut().push("normalize".to_string());
            if self.fail_normalize_at == Some(index) {
                return Self::outcome(false);
            }
            fs::write(output, b"normalized").unwrap();
            Self::outcome(true)
        }
    }

    fn setup(count: usize) -> (TempDir, ConcatenationPlan) {
        let dir = TempDir::new().unwrap();
        let songs = dir.path().join("songs");
        fs::create_dir(&songs).unwrap();

        let tracks: Vec<Track> = (0..count)
            .map(|i| {
                let id = format!("s{}", i);
                fs::write(songs.join(format!("{}.mp3", id)), b"audio").unwrap();
                Track::new(id, "Song", "Artist", "1:00").unwrap()
            })
            .collect();

        let plan = build_plan(&tracks, &songs, &UnknownOracle).unwrap();
        (dir, plan)
    }

    #[test]
    fn test_bulk_failure_removes_partial_output() {
        let (dir, plan) = setup(2);
        let output = dir.path().join("playlist.mp3");
        let tool = ScriptedTool {
            fail_reencode: true,
            ..Default::default()
        };

        let result = execute_bulk(&tool, plan.input_paths(), &output);
        assert!(matches!(result, Err(ConcatError::BulkExecution { exit_code: 1, .. })));
        assert!(!output.exists());
    }

    #[test]
    fn test_per_file_success_cleans_work_dir() {
        let (dir, plan) = setup(3);
        let output = dir.path().join("playlist.mp3");
        let tool = ScriptedTool::default();

        execute_per_file(&tool, &plan, &output).unwrap();

        assert_eq!(
            *tool.calls.borrow(),
            vec!["normalize", "normalize", "normalize", "copy:3"]
        );
        assert_eq!(fs::read(&output).unwrap(), b"joined");

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(".normalized."))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_per_file_normalize_failure_aborts_before_concat() {
        let (dir, plan) = setup(3);
        let output = dir.path().join("playlist.mp3");
        let tool = ScriptedTool {
            fail_normalize_at: Some(1),
            ..Default::default()
        };

        let result = execute_per_file(&tool, &plan, &output);
        match result {
            Err(ConcatError::PerFileNormalize { track_id, tail, .. }) => {
                assert_eq!(track_id, "s1");
                assert_eq!(tail, "boom");
            }
            other => panic!("expected normalize failure, got {:?}", other),
        }

        assert_eq!(*tool.calls.borrow(), vec!["normalize", "normalize"]);
        assert!(!output.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1); // only songs/
    }

    #[test]
    fn test_per_file_copy_failure() {
        let (dir, plan) = setup(2);
        let output = dir.path().join("playlist.mp3");
        let tool = ScriptedTool {
            fail_copy: true,
            ..Default::default()
        };

        let result = execute_per_file(&tool, &plan, &output);
        assert!(matches!(result, Err(ConcatError::FallbackExecution { .. })));
        assert!(!output.exists());
    }
}
