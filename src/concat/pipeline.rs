//! Concatenation orchestration

use super::config::ConcatConfig;
use super::executor::{execute_bulk, execute_per_file};
use super::plan::build_plan;
use crate::analysis::DurationOracle;
use crate::error::ConcatError;
use crate::model::{AppConfig, ConcatenatedPlaylist, Track, TrackTimestamp};
use crate::tool::TranscodeTool;
use std::fs;
use std::path::{Path, PathBuf};

/// Which executor produced the artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Bulk,
    PerFile,
}

/// A successfully produced stream and the timeline describing it
#[derive(Debug, Clone)]
pub struct ConcatenationOutcome {
    pub output_path: PathBuf,
    pub timestamps: Vec<TrackTimestamp>,
    pub total_duration: f64,
    pub strategy: Strategy,
}

/// Plan, then run bulk concatenation with a single per-file fallback
///
/// Secret tracks are dropped before planning. All intermediate files live
/// in a staging directory inside `out_dir`; the finished stream is renamed
/// to `out_dir/output_file_name` only once an executor has succeeded, so a
/// failed run leaves no artifact behind.
pub fn create_concatenated_artifact<O, T>(
    tracks: &[Track],
    songs_dir: &Path,
    out_dir: &Path,
    output_file_name: &str,
    oracle: &O,
    tool: &T,
) -> Result<ConcatenationOutcome, ConcatError>
where
    O: DurationOracle + ?Sized,
    T: TranscodeTool + ?Sized,
{
    let public_tracks: Vec<Track> = tracks.iter().filter(|t| !t.is_secret()).cloned().collect();
    log::info!(
        "Processing {} public tracks for concatenation ({} secret excluded)",
        public_tracks.len(),
        tracks.len() - public_tracks.len()
    );

    let plan = build_plan(&public_tracks, songs_dir, oracle)?;
    log::info!(
        "Planned {} tracks for concatenation (total_duration_s={:.1})",
        plan.len(),
        plan.total_duration()
    );

    fs::create_dir_all(out_dir)?;
    let staging = tempfile::Builder::new()
        .prefix(".concat-staging.")
        .tempdir_in(out_dir)?;
    let staged_output = staging.path().join(output_file_name);

    let strategy = match execute_bulk(tool, plan.input_paths(), &staged_output) {
        Ok(()) => Strategy::Bulk,
        Err(ConcatError::BulkExecution { exit_code, .. }) => {
            log::warn!(
                "Bulk concatenation failed (rc={}), trying alternative concatenation approach...",
                exit_code
            );
            execute_per_file(tool, &plan, &staged_output)?;
            Strategy::PerFile
        }
        Err(e) => return Err(e),
    };

    let output_path = out_dir.join(output_file_name);
    fs::rename(&staged_output, &output_path)?;
    log::info!("Concatenated playlist created: {:?}", output_path);

    Ok(ConcatenationOutcome {
        output_path,
        timestamps: plan.timestamps().to_vec(),
        total_duration: plan.total_duration(),
        strategy,
    })
}

/// Full concatenation run: app config in, stream and updated app config out
pub struct ConcatPipeline<O: DurationOracle, T: TranscodeTool> {
    config: ConcatConfig,
    oracle: O,
    tool: T,
}

impl<O: DurationOracle, T: TranscodeTool> ConcatPipeline<O, T> {
    pub fn new(config: ConcatConfig, oracle: O, tool: T) -> Self {
        Self {
            config,
            oracle,
            tool,
        }
    }

    /// Run the whole process
    ///
    /// The app config is rewritten only after the stream is in place; on
    /// any failure it is left exactly as it was.
    pub fn run(&self) -> Result<ConcatenationOutcome, ConcatError> {
        log::info!("Starting playlist concatenation");
        log::info!("Output directory: {:?}", self.config.out_dir);
        log::info!("Target stream: {:?}", self.config.output_path());

        if !self.config.songs_dir.is_dir() {
            return Err(ConcatError::MissingPath {
                what: "songs directory",
                path: self.config.songs_dir.clone(),
            });
        }
        if !self.config.app_config_path.is_file() {
            return Err(ConcatError::MissingPath {
                what: "app config",
                path: self.config.app_config_path.clone(),
            });
        }

        self.tool
            .ensure_available()
            .map_err(ConcatError::ToolUnavailable)?;

        let mut app_config = AppConfig::load(&self.config.app_config_path)?;
        let tracks = app_config.tracks()?;

        let outcome = create_concatenated_artifact(
            &tracks,
            &self.config.songs_dir,
            &self.config.out_dir,
            &self.config.output_file_name,
            &self.oracle,
            &self.tool,
        )?;

        let playlist = ConcatenatedPlaylist::new(
            self.config.public_url.clone(),
            outcome.timestamps.clone(),
            outcome.total_duration,
        );
        app_config.set_concatenated_playlist(&playlist);
        app_config.save(&self.config.app_config_path)?;

        log::info!(
            "Updated app config with {} track timestamps",
            playlist.len()
        );
        log::info!(
            "Total playlist duration: {:.1} seconds ({:.1} minutes)",
            outcome.total_duration,
            outcome.total_duration / 60.0
        );

        Ok(outcome)
    }
}
