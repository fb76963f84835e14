//! The batch worker: extract, commit, then delete, one video at a time.
//!
//! Every per-video failure is contained here. A video's source file is
//! removed only after its own transaction has committed.

use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt;
use galeria_core::error::PersistenceError;
use galeria_core::store::TrackStore;
use galeria_core::track::TrackRecord;
use galeria_core::types::PendingVideo;
use serde::Serialize;

use crate::cleanup::{delete_source, CleanupOutcome};
use crate::error::{CleanupError, ExtractError, TrackerError};
use crate::extractor::TrackExtractor;
use crate::probe::VideoProbe;
use crate::tracker::Tracker;

/// Result of processing one video.
#[derive(Debug)]
pub enum VideoOutcome {
    /// Tracks committed; `cleanup` reports what happened to the source file.
    Committed {
        inserted: u64,
        cleanup: Result<CleanupOutcome, CleanupError>,
    },
    /// Extraction succeeded but found no tracks. Nothing written, file kept.
    NoTracks,
    /// Extraction failed. Nothing written, file kept.
    Skipped(ExtractError),
    /// The store rejected the video's unit of work. Rolled back, file kept.
    PersistFailed(PersistenceError),
    /// Processing the video panicked. File kept.
    Panicked,
}

/// Per-worker counters.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub committed: usize,
    pub no_tracks: usize,
    pub skipped: usize,
    pub failed: usize,
    pub tracks_inserted: u64,
    pub files_deleted: usize,
    pub cleanup_failures: usize,
}

impl BatchSummary {
    pub fn record(&mut self, outcome: &VideoOutcome) {
        match outcome {
            VideoOutcome::Committed { inserted, cleanup } => {
                self.committed += 1;
                self.tracks_inserted += inserted;
                match cleanup {
                    Ok(CleanupOutcome::Deleted) => self.files_deleted += 1,
                    Ok(CleanupOutcome::AlreadyAbsent) => {}
                    Err(_) => self.cleanup_failures += 1,
                }
            }
            VideoOutcome::NoTracks => self.no_tracks += 1,
            VideoOutcome::Skipped(_) => self.skipped += 1,
            VideoOutcome::PersistFailed(_) | VideoOutcome::Panicked => self.failed += 1,
        }
    }

    /// Add another worker's counters into this one.
    pub fn merge(&mut self, other: &BatchSummary) {
        self.committed += other.committed;
        self.no_tracks += other.no_tracks;
        self.skipped += other.skipped;
        self.failed += other.failed;
        self.tracks_inserted += other.tracks_inserted;
        self.files_deleted += other.files_deleted;
        self.cleanup_failures += other.cleanup_failures;
    }

    pub fn videos(&self) -> usize {
        self.committed + self.no_tracks + self.skipped + self.failed
    }
}

/// Processes one partition of pending videos against one store.
pub struct BatchWorker<P, T, S> {
    extractor: TrackExtractor<P, T>,
    store: S,
    video_timeout: Option<Duration>,
}

impl<P, T, S> BatchWorker<P, T, S>
where
    P: VideoProbe,
    T: Tracker,
    S: TrackStore,
{
    pub fn new(extractor: TrackExtractor<P, T>, store: S) -> Self {
        Self {
            extractor,
            store,
            video_timeout: None,
        }
    }

    /// Bound the extraction of each video. On expiry the tracker is dropped.
    pub fn with_video_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.video_timeout = timeout;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Process `videos` in order. Never stops early.
    pub async fn run_batch(&self, videos: &[PendingVideo]) -> BatchSummary {
        let mut summary = BatchSummary::default();
        for video in videos {
            let outcome = AssertUnwindSafe(self.process_video(video))
                .catch_unwind()
                .await
                .unwrap_or_else(|_| {
                    tracing::error!(video_id = %video.video_id, "Video processing panicked");
                    VideoOutcome::Panicked
                });
            summary.record(&outcome);
        }
        tracing::info!(
            videos = summary.videos(),
            committed = summary.committed,
            skipped = summary.skipped,
            failed = summary.failed,
            tracks = summary.tracks_inserted,
            "Batch finished",
        );
        summary
    }

    /// Extract, persist and clean up a single video.
    pub async fn process_video(&self, video: &PendingVideo) -> VideoOutcome {
        let video_id = video.video_id.as_str();
        tracing::info!(video_id, path = %video.path.display(), "Processing video");

        let records = match self.extract(video).await {
            Ok(records) if records.is_empty() => {
                tracing::info!(video_id, "No tracks found; keeping video file");
                return VideoOutcome::NoTracks;
            }
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(video_id, error = %e, "Skipping video");
                return VideoOutcome::Skipped(e);
            }
        };

        let inserted = match self.store.insert_tracks(&records).await {
            Ok(inserted) => inserted,
            Err(e) => {
                tracing::error!(video_id, error = %e, "Failed to persist tracks; keeping video file");
                return VideoOutcome::PersistFailed(e);
            }
        };
        tracing::info!(
            video_id,
            inserted,
            duplicates = records.len() as u64 - inserted,
            "Committed tracks",
        );

        let cleanup = delete_source(&video.path).await;
        if let Err(e) = &cleanup {
            tracing::error!(video_id, error = %e, "Error deleting video file");
        }
        VideoOutcome::Committed { inserted, cleanup }
    }

    async fn extract(&self, video: &PendingVideo) -> Result<Vec<TrackRecord>, ExtractError> {
        let extraction = self.extractor.extract(&video.path, &video.video_id);
        match self.video_timeout {
            Some(limit) => tokio::time::timeout(limit, extraction)
                .await
                .unwrap_or(Err(ExtractError::Tracker(TrackerError::TimedOut(limit)))),
            None => extraction.await,
        }
    }
}
