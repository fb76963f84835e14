use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Video identifiers are opaque strings assigned by the catalog.
pub type VideoId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// A downloaded video registered in the store.
///
/// Read-only to the pipeline: rows outlive the file they point at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub id: VideoId,
    /// Relative to the configured video root.
    pub path: String,
    pub date_observed: Timestamp,
}

impl VideoRecord {
    /// Resolve this record into a unit of batch work under `root`.
    pub fn to_pending(&self, root: &std::path::Path) -> PendingVideo {
        PendingVideo {
            video_id: self.id.clone(),
            path: root.join(&self.path),
        }
    }
}

/// One (file, id) pair handed to a batch worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingVideo {
    pub video_id: VideoId,
    pub path: PathBuf,
}
