//! Video registry rows.

use galeria_core::types::{Timestamp, VideoRecord};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `video_recorded` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VideoRecorded {
    pub id: String,
    pub camera: Option<String>,
    pub path: String,
    pub date_observed: Timestamp,
}

impl From<VideoRecorded> for VideoRecord {
    fn from(row: VideoRecorded) -> Self {
        VideoRecord {
            id: row.id,
            path: row.path,
            date_observed: row.date_observed,
        }
    }
}

/// DTO for registering a downloaded video.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateVideoRecorded {
    pub id: String,
    pub camera: Option<String>,
    pub path: String,
    pub date_observed: Timestamp,
}
