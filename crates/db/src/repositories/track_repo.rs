//! Repository for the `tracks` table.

use galeria_core::track::TrackRecord;
use sqlx::PgPool;

use crate::models::track::Track;

const COLUMNS: &str = "track_id, video_id, duration, direction";

/// Insert-or-ignore writes and read-back queries for track summaries.
pub struct TrackRepo;

impl TrackRepo {
    /// Insert all `records` in one transaction.
    ///
    /// Rows whose `track_id` already exists are skipped. Any other failure
    /// rolls back the whole batch. Returns the number of rows inserted.
    pub async fn insert_batch(pool: &PgPool, records: &[TrackRecord]) -> Result<u64, sqlx::Error> {
        if records.is_empty() {
            return Ok(0);
        }

        let mut tx = pool.begin().await?;
        let inserted = Self::insert_batch_inner(&mut tx, records).await?;
        tx.commit().await?;
        Ok(inserted)
    }

    /// List tracks for one video, ordered by `track_id`.
    pub async fn list_by_video(pool: &PgPool, video_id: &str) -> Result<Vec<Track>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tracks WHERE video_id = $1 ORDER BY track_id"
        );
        sqlx::query_as::<_, Track>(&query)
            .bind(video_id)
            .fetch_all(pool)
            .await
    }

    /// List every track, grouped by video.
    pub async fn list(pool: &PgPool) -> Result<Vec<Track>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tracks ORDER BY video_id, track_id");
        sqlx::query_as::<_, Track>(&query).fetch_all(pool).await
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    async fn insert_batch_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        records: &[TrackRecord],
    ) -> Result<u64, sqlx::Error> {
        let mut inserted = 0;
        for record in records {
            let result = sqlx::query(
                "INSERT INTO tracks (track_id, video_id, duration, direction) \
                 VALUES ($1, $2, $3, $4) \
                 ON CONFLICT (track_id) DO NOTHING",
            )
            .bind(&record.track_id)
            .bind(&record.video_id)
            .bind(record.duration)
            .bind(record.direction.as_str())
            .execute(&mut **tx)
            .await?;
            inserted += result.rows_affected();
        }
        Ok(inserted)
    }
}
