//! Track records and the per-track aggregation rules.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::VideoId;

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// Movement label of one observation, or the majority label of a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Backward,
    /// No prior position to compare against.
    Unknown,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Backward => "backward",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Direction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "forward" => Ok(Self::Forward),
            "backward" => Ok(Self::Backward),
            "unknown" => Ok(Self::Unknown),
            other => Err(CoreError::Validation(format!(
                "Invalid direction '{other}'. Must be one of: forward, backward, unknown"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Durable summary of one tracked subject in one video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackRecord {
    /// `<raw tracker id>_<video file stem>`.
    pub track_id: String,
    pub video_id: VideoId,
    /// Seconds from video start to the track's last sampled observation.
    pub duration: f64,
    pub direction: Direction,
}

/// A single sampled sighting of a track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub elapsed_secs: f64,
    pub direction: Direction,
}

// ---------------------------------------------------------------------------
// Track keys
// ---------------------------------------------------------------------------

/// File name of `video_path` up to its first `.`.
///
/// `cam-2024-05-01 10:00:00.mp4` becomes `cam-2024-05-01 10:00:00`.
pub fn video_stem(video_path: &Path) -> String {
    video_path
        .file_name()
        .map(|name| name.to_string_lossy())
        .and_then(|name| name.split('.').next().map(str::to_string))
        .unwrap_or_default()
}

/// Globally unique key for a tracker id within one video.
pub fn track_key(raw_track_id: i64, stem: &str) -> String {
    format!("{raw_track_id}_{stem}")
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Most frequent direction in `labels`.
///
/// Ties go to the label that appears first in `labels`. Returns `Unknown`
/// for an empty slice.
pub fn majority_direction(labels: &[Direction]) -> Direction {
    // (label, count) in first-seen order.
    let mut tally: Vec<(Direction, usize)> = Vec::with_capacity(3);
    for &label in labels {
        match tally.iter_mut().find(|(l, _)| *l == label) {
            Some((_, count)) => *count += 1,
            None => tally.push((label, 1)),
        }
    }

    let mut best: Option<(Direction, usize)> = None;
    for (label, count) in tally {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((label, count));
        }
    }
    best.map(|(label, _)| label).unwrap_or(Direction::Unknown)
}

/// Collapse a track's observation history into one record.
///
/// Returns `None` when the history is empty.
pub fn summarize(
    track_id: &str,
    video_id: &str,
    history: &[Observation],
) -> Option<TrackRecord> {
    if history.is_empty() {
        return None;
    }
    let duration = history
        .iter()
        .map(|o| o.elapsed_secs)
        .fold(f64::MIN, f64::max);
    let labels: Vec<Direction> = history.iter().map(|o| o.direction).collect();

    Some(TrackRecord {
        track_id: track_id.to_string(),
        video_id: video_id.to_string(),
        duration,
        direction: majority_direction(&labels),
    })
}
