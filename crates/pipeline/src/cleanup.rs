//! Removal of source videos whose tracks are committed.

use std::io::ErrorKind;
use std::path::Path;

use galeria_core::types::PendingVideo;

use crate::error::CleanupError;

/// What happened to a committed video's source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupOutcome {
    Deleted,
    /// The file was already gone. Treated as success.
    AlreadyAbsent,
}

/// Delete `path`, tolerating a file that no longer exists.
pub async fn delete_source(path: &Path) -> Result<CleanupOutcome, CleanupError> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {
            tracing::info!(path = %path.display(), "Deleted video file");
            Ok(CleanupOutcome::Deleted)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "Video file not found");
            Ok(CleanupOutcome::AlreadyAbsent)
        }
        Err(source) => Err(CleanupError {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Counters from one [`sweep_committed`] pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepSummary {
    pub deleted: usize,
    pub failed: usize,
}

/// Remove source files that outlived their committed tracks.
///
/// Files already gone are skipped silently; this runs over every committed
/// video, and most of them were deleted right after their commit.
pub async fn sweep_committed(videos: &[PendingVideo]) -> SweepSummary {
    let mut summary = SweepSummary::default();
    for video in videos {
        if !tokio::fs::try_exists(&video.path).await.unwrap_or(true) {
            continue;
        }
        match delete_source(&video.path).await {
            Ok(CleanupOutcome::Deleted) => summary.deleted += 1,
            Ok(CleanupOutcome::AlreadyAbsent) => {}
            Err(e) => {
                tracing::error!(video_id = %video.video_id, error = %e, "Error deleting leftover video file");
                summary.failed += 1;
            }
        }
    }
    if summary.deleted > 0 || summary.failed > 0 {
        tracing::info!(
            deleted = summary.deleted,
            failed = summary.failed,
            "Swept leftover files of committed videos",
        );
    }
    summary
}
