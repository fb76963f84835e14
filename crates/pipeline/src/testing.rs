//! Fakes shared by the unit tests in this crate.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use galeria_core::error::PersistenceError;
use galeria_core::store::TrackStore;
use galeria_core::track::TrackRecord;

use crate::error::TrackerError;
use crate::probe::{ProbeError, VideoProbe};
use crate::tracker::{Detection, FrameStream, TrackedFrame, Tracker};

// ---------------------------------------------------------------------------
// Frames
// ---------------------------------------------------------------------------

pub fn frame(index: u64, detections: &[(i64, [f32; 4])]) -> TrackedFrame {
    TrackedFrame {
        index,
        detections: detections
            .iter()
            .map(|&(id, xyxy)| Detection {
                track_id: Some(id),
                xyxy,
            })
            .collect(),
    }
}

/// One subject walking right by `dx` pixels per frame for `seconds`.
pub fn walking_frames(track_id: i64, fps: u64, seconds: u64, dx: f32) -> Vec<TrackedFrame> {
    (0..fps * seconds)
        .map(|i| {
            let x = 50.0 + i as f32 * dx;
            frame(i, &[(track_id, [x, 100.0, x + 40.0, 180.0])])
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Probe
// ---------------------------------------------------------------------------

pub struct FakeProbe {
    fps: f64,
    require_file: bool,
}

impl FakeProbe {
    pub fn fps(fps: f64) -> Self {
        Self {
            fps,
            require_file: false,
        }
    }

    /// Fail with `VideoNotFound` for paths that do not exist on disk.
    pub fn requiring_files(mut self) -> Self {
        self.require_file = true;
        self
    }
}

#[async_trait]
impl VideoProbe for FakeProbe {
    async fn frame_rate(&self, path: &Path) -> Result<f64, ProbeError> {
        if self.require_file && !path.exists() {
            return Err(ProbeError::VideoNotFound(path.display().to_string()));
        }
        Ok(self.fps)
    }
}

// ---------------------------------------------------------------------------
// Tracker
// ---------------------------------------------------------------------------

enum Script {
    Frames(Vec<TrackedFrame>),
    FailAfter(Vec<TrackedFrame>),
    FailToStart,
    Hang,
}

/// Tracker returning canned frames per video path. Unknown paths produce an
/// empty stream.
#[derive(Default)]
pub struct ScriptedTracker {
    scripts: HashMap<PathBuf, Script>,
}

impl ScriptedTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(mut self, path: impl AsRef<Path>, frames: Vec<TrackedFrame>) -> Self {
        self.scripts
            .insert(path.as_ref().to_path_buf(), Script::Frames(frames));
        self
    }

    pub fn fail_after(mut self, path: impl AsRef<Path>, frames: Vec<TrackedFrame>) -> Self {
        self.scripts
            .insert(path.as_ref().to_path_buf(), Script::FailAfter(frames));
        self
    }

    pub fn fail_to_start(mut self, path: impl AsRef<Path>) -> Self {
        self.scripts
            .insert(path.as_ref().to_path_buf(), Script::FailToStart);
        self
    }

    pub fn hang(mut self, path: impl AsRef<Path>) -> Self {
        self.scripts.insert(path.as_ref().to_path_buf(), Script::Hang);
        self
    }
}

#[async_trait]
impl Tracker for ScriptedTracker {
    async fn track(&self, video_path: &Path) -> Result<FrameStream, TrackerError> {
        match self.scripts.get(video_path) {
            None => Ok(stream::empty().boxed()),
            Some(Script::Frames(frames)) => Ok(stream::iter(frames.clone().into_iter().map(Ok)).boxed()),
            Some(Script::FailAfter(frames)) => {
                let items = frames
                    .clone()
                    .into_iter()
                    .map(Ok)
                    .chain(std::iter::once(Err(TrackerError::Exited { code: Some(1) })));
                Ok(stream::iter(items).boxed())
            }
            Some(Script::FailToStart) => Err(TrackerError::Spawn {
                program: "scripted".to_string(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            }),
            Some(Script::Hang) => Ok(stream::pending().boxed()),
        }
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// In-memory insert-or-ignore store keyed by `track_id`.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<TrackRecord>>,
    /// Video ids whose inserts fail with an integrity violation.
    rejected_videos: Vec<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting(video_ids: &[&str]) -> Self {
        Self {
            rows: Mutex::default(),
            rejected_videos: video_ids.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn rows(&self) -> Vec<TrackRecord> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl TrackStore for MemoryStore {
    async fn insert_tracks(&self, records: &[TrackRecord]) -> Result<u64, PersistenceError> {
        if let Some(r) = records
            .iter()
            .find(|r| self.rejected_videos.contains(&r.video_id))
        {
            return Err(PersistenceError::Integrity(format!(
                "video {} is not registered",
                r.video_id
            )));
        }

        let mut rows = self.rows.lock().unwrap();
        let mut inserted = 0;
        for record in records {
            if !rows.iter().any(|r| r.track_id == record.track_id) {
                rows.push(record.clone());
                inserted += 1;
            }
        }
        Ok(inserted)
    }
}
