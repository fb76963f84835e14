use async_trait::async_trait;
use galeria_core::error::PersistenceError;
use galeria_core::store::TrackStore;
use galeria_core::track::TrackRecord;

use crate::error::classify_sqlx_error;
use crate::repositories::TrackRepo;
use crate::DbPool;

/// [`TrackStore`] backed by a worker's own Postgres pool.
#[derive(Debug, Clone)]
pub struct PgTrackStore {
    pool: DbPool,
}

impl PgTrackStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Close the underlying pool, waiting for in-flight connections.
    pub async fn close(self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl TrackStore for PgTrackStore {
    async fn insert_tracks(&self, records: &[TrackRecord]) -> Result<u64, PersistenceError> {
        TrackRepo::insert_batch(&self.pool, records)
            .await
            .map_err(|e| classify_sqlx_error(&e))
    }
}
