//! Media-backed duration oracle
//!
//! Reads container/tag properties with lofty first. When lofty cannot open
//! the file or reports a zero length, symphonia probes the container and
//! derives the length from the frame count.

use super::traits::DurationOracle;
use lofty::file::AudioFile;
use lofty::probe::Probe;
use std::path::Path;
use symphonia::core::codecs::CODEC_TYPE_NULL;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Oracle that inspects the actual media file
#[derive(Debug, Clone, Default)]
pub struct MediaOracle {
    /// Skip the symphonia probe when lofty comes up empty
    tags_only: bool,
}

impl MediaOracle {
    pub fn new() -> Self {
        Self { tags_only: false }
    }

    /// Only trust tag/container properties read by lofty
    pub fn tags_only(mut self) -> Self {
        self.tags_only = true;
        self
    }
}

impl DurationOracle for MediaOracle {
    fn duration_of(&self, path: &Path) -> Option<f64> {
        if let Some(seconds) = lofty_duration(path) {
            return Some(seconds);
        }

        if self.tags_only {
            log::warn!("Could not determine duration for {:?}", path);
            return None;
        }

        match symphonia_duration(path) {
            Some(seconds) => Some(seconds),
            None => {
                log::warn!("Could not determine duration for {:?}", path);
                None
            }
        }
    }
}

fn lofty_duration(path: &Path) -> Option<f64> {
    let tagged_file = match Probe::open(path).and_then(|probe| probe.read()) {
        Ok(f) => f,
        Err(e) => {
            log::debug!("lofty could not read {:?}: {}", path, e);
            return None;
        }
    };

    let properties = tagged_file.properties();
    log::debug!(
        "Audio: {:?}: {:?}Hz, {:?}ch, {:?}kbps",
        path.file_name().unwrap_or_default(),
        properties.sample_rate(),
        properties.channels(),
        properties.audio_bitrate()
    );

    let seconds = properties.duration().as_secs_f64();
    (seconds > 0.0).then_some(seconds)
}

fn symphonia_duration(path: &Path) -> Option<f64> {
    let file = std::fs::File::open(path).ok()?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = match symphonia::default::get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    ) {
        Ok(p) => p,
        Err(e) => {
            log::debug!("symphonia could not probe {:?}: {}", path, e);
            return None;
        }
    };

    let track = probed
        .format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)?;

    let n_frames = track.codec_params.n_frames?;
    let seconds = match (track.codec_params.time_base, track.codec_params.sample_rate) {
        (Some(time_base), _) => {
            let time = time_base.calc_time(n_frames);
            time.seconds as f64 + time.frac
        }
        (None, Some(sample_rate)) if sample_rate > 0 => n_frames as f64 / sample_rate as f64,
        _ => return None,
    };

    (seconds > 0.0).then_some(seconds)
}
