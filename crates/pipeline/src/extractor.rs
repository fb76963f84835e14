//! Per-video track extraction.
//!
//! Samples tracker output about five times per second of video, derives a
//! direction label per sample from the track's previous center, and folds
//! each track's samples into one [`TrackRecord`].

use std::collections::HashMap;
use std::path::Path;

use futures::StreamExt;
use galeria_core::geometry::{classify, displacement_angle, Point, DIRECTION_THRESHOLD_DEG};
use galeria_core::track::{summarize, track_key, video_stem, Direction, Observation, TrackRecord};
use indexmap::IndexMap;

use crate::error::{ExtractError, UnusableVideo};
use crate::probe::VideoProbe;
use crate::tracker::{TrackedFrame, Tracker};

/// Target number of sampled frames per second of video.
pub const SAMPLES_PER_SECOND: u32 = 5;

/// Frame interval between samples, or `None` when `fps` is too low to
/// sample at all.
pub fn sampling_stride(fps: u32) -> Option<u32> {
    let stride = fps / SAMPLES_PER_SECOND;
    (stride > 0).then_some(stride)
}

// ---------------------------------------------------------------------------
// Accumulator
// ---------------------------------------------------------------------------

/// Ephemeral state for one video: last center and sample history per track.
#[derive(Debug)]
pub struct TrackAccumulator {
    stem: String,
    fps: u32,
    stride: u32,
    previous_positions: HashMap<String, Point>,
    /// Keyed by track key, in first-seen order.
    history: IndexMap<String, Vec<Observation>>,
}

impl TrackAccumulator {
    /// `stride` must be non-zero; see [`sampling_stride`].
    pub fn new(stem: impl Into<String>, fps: u32, stride: u32) -> Self {
        Self {
            stem: stem.into(),
            fps,
            stride,
            previous_positions: HashMap::new(),
            history: IndexMap::new(),
        }
    }

    /// Feed one frame. Frames off the sampling grid, and frames with any
    /// untracked detection, are ignored.
    pub fn observe(&mut self, frame: &TrackedFrame) {
        if frame.index % u64::from(self.stride) != 0 || !frame.has_track_ids() {
            return;
        }
        let elapsed_secs = frame.index as f64 / f64::from(self.fps);

        for detection in &frame.detections {
            let Some(raw_id) = detection.track_id else {
                continue;
            };
            let center = Point::center_of(detection.xyxy);
            let key = track_key(raw_id, &self.stem);

            let direction = match self.previous_positions.insert(key.clone(), center) {
                Some(previous) => {
                    classify(displacement_angle(previous, center), DIRECTION_THRESHOLD_DEG)
                }
                None => Direction::Unknown,
            };

            self.history.entry(key).or_default().push(Observation {
                elapsed_secs,
                direction,
            });
        }
    }

    /// Number of distinct tracks seen so far.
    pub fn track_count(&self) -> usize {
        self.history.len()
    }

    /// One record per track, in first-seen order.
    pub fn finish(self, video_id: &str) -> Vec<TrackRecord> {
        self.history
            .iter()
            .filter_map(|(key, history)| summarize(key, video_id, history))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Extractor
// ---------------------------------------------------------------------------

/// Runs the tracker over one video and summarizes its tracks.
///
/// Touches neither the store nor the filesystem beyond reading the video.
pub struct TrackExtractor<P, T> {
    probe: P,
    tracker: T,
}

impl<P: VideoProbe, T: Tracker> TrackExtractor<P, T> {
    pub fn new(probe: P, tracker: T) -> Self {
        Self { probe, tracker }
    }

    /// Extract one summarized record per track in `video_path`.
    ///
    /// A video without tracked detections yields `Ok` with no records.
    pub async fn extract(
        &self,
        video_path: &Path,
        video_id: &str,
    ) -> Result<Vec<TrackRecord>, ExtractError> {
        let raw_fps = self
            .probe
            .frame_rate(video_path)
            .await
            .map_err(UnusableVideo::CannotOpen)?;
        // Also rejects NaN.
        if !(raw_fps > 0.0) {
            return Err(UnusableVideo::InvalidFrameRate(raw_fps).into());
        }
        let fps = raw_fps as u32;
        let stride = sampling_stride(fps).ok_or(UnusableVideo::ZeroStride { fps })?;

        tracing::debug!(
            video_id,
            path = %video_path.display(),
            fps,
            stride,
            "Extracting tracks",
        );

        let mut accumulator = TrackAccumulator::new(video_stem(video_path), fps, stride);
        let mut frames = self.tracker.track(video_path).await?;
        while let Some(frame) = frames.next().await {
            accumulator.observe(&frame?);
        }

        let records = accumulator.finish(video_id);
        tracing::info!(video_id, tracks = records.len(), "Extracted tracks");
        Ok(records)
    }
}
