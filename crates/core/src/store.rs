//! The persistence seam used by batch workers.
//!
//! The Postgres implementation lives in `galeria-db`; tests supply in-memory
//! stores.

use async_trait::async_trait;

use crate::error::PersistenceError;
use crate::track::TrackRecord;

#[async_trait]
pub trait TrackStore: Send + Sync {
    /// Insert `records` as a single unit of work.
    ///
    /// Records whose `track_id` already exists are skipped. Returns how many
    /// rows were actually inserted. On error nothing from `records` is kept.
    async fn insert_tracks(&self, records: &[TrackRecord]) -> Result<u64, PersistenceError>;
}
