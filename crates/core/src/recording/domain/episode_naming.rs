use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::shared::constants::{
    EPISODE_FILE_EXTENSION, EPISODE_FILE_PREFIX, EPISODE_TIMESTAMP_FORMAT,
};

/// Source of episode start timestamps.
pub type Clock = Box<dyn Fn() -> NaiveDateTime + Send>;

/// Wall clock in the local time zone.
pub fn local_clock() -> Clock {
    Box::new(|| chrono::Local::now().naive_local())
}

/// `fire_<YYYY-MM-DD_HH-MM-SS>.mp4`
pub fn episode_file_name(started_at: NaiveDateTime) -> String {
    format!(
        "{EPISODE_FILE_PREFIX}{}.{EPISODE_FILE_EXTENSION}",
        started_at.format(EPISODE_TIMESTAMP_FORMAT)
    )
}

/// Output path for an episode starting at `started_at`.
///
/// Episodes starting within the same second would share a name; later ones
/// get `_2`, `_3`, ... so an earlier clip is never overwritten.
pub fn episode_path(dir: &Path, started_at: NaiveDateTime) -> PathBuf {
    let candidate = dir.join(episode_file_name(started_at));
    if !candidate.exists() {
        return candidate;
    }
    let stem = format!(
        "{EPISODE_FILE_PREFIX}{}",
        started_at.format(EPISODE_TIMESTAMP_FORMAT)
    );
    (2..)
        .map(|n| dir.join(format!("{stem}_{n}.{EPISODE_FILE_EXTENSION}")))
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}
