use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use litup_playlist::analysis::{format_duration, DurationOracle, MediaOracle, UnknownOracle};
use litup_playlist::songs::{analyze_and_update_durations, generate_app_config};
use litup_playlist::tool::{Ffmpeg, FfmpegConfig};
use litup_playlist::validation::validate_output;
use litup_playlist::{ConcatConfig, ConcatPipeline};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "litup-playlist")]
#[command(about = "Build the Lit Up app config and gapless playlist stream", long_about = None)]
struct Args {
    /// Verbose logging
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate appConfig.json from the YAML song list
    GenerateConfig {
        /// Path to the song list
        #[arg(short = 'c', long, default_value = "lit_up_config.yaml")]
        config: String,

        /// Build output directory
        #[arg(short = 'o', long, default_value = ".out")]
        out_dir: String,
    },

    /// Measure audio files and rewrite declared durations in the song list
    AnalyzeDurations {
        /// Path to the song list
        #[arg(short = 'c', long, default_value = "lit_up_config.yaml")]
        config: String,

        /// Build output directory (audio is read from <out-dir>/songs)
        #[arg(short = 'o', long, default_value = ".out")]
        out_dir: String,
    },

    /// Concatenate public tracks into one stream and record its timeline
    Concat {
        /// Build output directory containing songs/ and appConfig.json
        #[arg(short = 'o', long, default_value = ".out")]
        out_dir: String,

        /// ffmpeg executable
        #[arg(long, default_value = "ffmpeg")]
        ffmpeg: PathBuf,

        /// Per-invocation ffmpeg time limit in seconds
        #[arg(long, default_value = "720")]
        timeout_secs: u64,

        /// Don't probe audio files; use declared durations only
        #[arg(long, conflicts_with = "tags_only")]
        no_probe: bool,

        /// Probe audio files with tag/container properties only (no decoder probe)
        #[arg(long)]
        tags_only: bool,

        /// Skip the post-run check of the produced stream
        #[arg(long)]
        no_validate: bool,
    },

    /// Print the duration of a single MP3 file
    Duration {
        file: String,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    match args.command {
        Command::GenerateConfig { config, out_dir } => {
            let (path, count) = generate_app_config(&expand(&config), &expand(&out_dir))?;
            log::info!("✅ Wrote {} tracks to {:?}", count, path);
        }
        Command::AnalyzeDurations { config, out_dir } => {
            let songs_dir = expand(&out_dir).join("songs");
            log::info!("Analyzing audio files in {:?}", songs_dir);
            analyze_and_update_durations(&expand(&config), &songs_dir, &MediaOracle::new())?;
        }
        Command::Concat {
            out_dir,
            ffmpeg,
            timeout_secs,
            no_probe,
            tags_only,
            no_validate,
        } => {
            let out_dir = std::path::absolute(expand(&out_dir))?;
            let config = ConcatConfig::new(out_dir);
            let tool = Ffmpeg::new(
                FfmpegConfig::default()
                    .with_program(ffmpeg)
                    .with_timeout(Duration::from_secs(timeout_secs)),
            );

            // Declared durations only, or probe the files
            if no_probe {
                log::info!("Probing disabled - using declared durations");
                run_concat(config, UnknownOracle::new(), tool, !no_validate)?;
            } else if tags_only {
                log::info!("Probing tag/container properties only");
                run_concat(config, MediaOracle::new().tags_only(), tool, !no_validate)?;
            } else {
                run_concat(config, MediaOracle::new(), tool, !no_validate)?;
            }
        }
        Command::Duration { file } => {
            let path = expand(&file);
            let is_mp3 = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("mp3"));
            if !is_mp3 {
                bail!("Only MP3 files are supported: {:?}", path);
            }

            let Some(seconds) = MediaOracle::new().duration_of(&path) else {
                bail!("Could not determine duration of {:?}", path);
            };
            println!(
                "Duration: {} ({:.2} seconds)",
                format_duration(Some(seconds)),
                seconds
            );
        }
    }

    Ok(())
}

fn run_concat<O: DurationOracle>(
    config: ConcatConfig,
    oracle: O,
    tool: Ffmpeg,
    validate: bool,
) -> Result<()> {
    let pipeline = ConcatPipeline::new(config, oracle, tool);

    let outcome = match pipeline.run() {
        Ok(outcome) => outcome,
        Err(e) => {
            if let Some(tail) = e.diagnostic_tail() {
                log::error!("ffmpeg stderr (tail):\n{}", tail);
            }
            log::error!("Concatenation failed: {}", e);
            return Err(e.into());
        }
    };

    log::info!(
        "Playlist ready at {:?} ({:?} strategy)",
        outcome.output_path,
        outcome.strategy
    );

    if validate {
        log::info!("Running post-concatenation validation...");
        validate_output(&outcome.output_path, outcome.total_duration, &MediaOracle::new())?;
    }

    Ok(())
}

fn expand(path: &str) -> PathBuf {
    Path::new(shellexpand::tilde(path).as_ref()).to_path_buf()
}
