//! Song list (lit_up_config.yaml) handling
//!
//! The YAML song list is the hand-edited source of truth. From it we
//! generate appConfig.json for the web client, and we can rewrite its
//! declared durations from the downloaded audio files.

mod durations;
mod generate;
mod list;
mod model;

pub use durations::{analyze_and_update_durations, update_durations, DurationReport};
pub use generate::{build_app_config, generate_app_config, AppTrack, GeneratedConfig};
pub use list::{load_song_list, SongList};
pub use model::SongEntry;
