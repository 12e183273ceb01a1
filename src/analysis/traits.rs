//! Duration oracle trait

use std::path::Path;

/// Measures the playback length of a media file
///
/// Implementations never fail: an unreadable or corrupt file degrades to
/// `None` ("unknown"). A returned value is seconds and never negative.
pub trait DurationOracle {
    fn duration_of(&self, path: &Path) -> Option<f64>;
}

impl<F> DurationOracle for F
where
    F: Fn(&Path) -> Option<f64>,
{
    fn duration_of(&self, path: &Path) -> Option<f64> {
        self(path)
    }
}
