//! Track summary rows.

use galeria_core::error::CoreError;
use galeria_core::track::TrackRecord;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `tracks` table. `direction` is stored as text.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Track {
    pub track_id: String,
    pub video_id: String,
    pub duration: f64,
    pub direction: String,
}

impl TryFrom<Track> for TrackRecord {
    type Error = CoreError;

    fn try_from(row: Track) -> Result<Self, Self::Error> {
        Ok(TrackRecord {
            direction: row.direction.parse()?,
            track_id: row.track_id,
            video_id: row.video_id,
            duration: row.duration,
        })
    }
}
