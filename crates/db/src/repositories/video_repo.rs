//! Repository for the `video_recorded` table.

use sqlx::PgPool;

use crate::models::video::{CreateVideoRecorded, VideoRecorded};

const COLUMNS: &str = "id, camera, path, date_observed";

/// Read access to the video registry, plus the insert-or-ignore
/// registration the download stage performs.
pub struct VideoRepo;

impl VideoRepo {
    /// Register a downloaded video. A row with the same `id` is left as is.
    ///
    /// Returns `true` if a new row was inserted.
    pub async fn create(pool: &PgPool, input: &CreateVideoRecorded) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO video_recorded (id, camera, path, date_observed) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(&input.id)
        .bind(&input.camera)
        .bind(&input.path)
        .bind(input.date_observed)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Find a video by its catalog ID.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<VideoRecorded>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM video_recorded WHERE id = $1");
        sqlx::query_as::<_, VideoRecorded>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Videos that have no tracks yet, oldest observation first.
    pub async fn list_pending(pool: &PgPool) -> Result<Vec<VideoRecorded>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM video_recorded v \
             WHERE NOT EXISTS (SELECT 1 FROM tracks t WHERE t.video_id = v.id) \
             ORDER BY date_observed, id"
        );
        sqlx::query_as::<_, VideoRecorded>(&query)
            .fetch_all(pool)
            .await
    }

    /// Videos that already have tracks. Their source files should be gone;
    /// any that remain are leftovers from a failed delete.
    pub async fn list_committed(pool: &PgPool) -> Result<Vec<VideoRecorded>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM video_recorded v \
             WHERE EXISTS (SELECT 1 FROM tracks t WHERE t.video_id = v.id) \
             ORDER BY date_observed, id"
        );
        sqlx::query_as::<_, VideoRecorded>(&query)
            .fetch_all(pool)
            .await
    }
}
