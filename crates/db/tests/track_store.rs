//! Integration tests for the track persistence gateway.
//!
//! Exercises the repository layer and `PgTrackStore` against a real database:
//! - Insert-or-ignore idempotence
//! - Per-video rollback on foreign key violations
//! - Pending-video selection
//! - SQLSTATE classification against real constraint violations

use assert_matches::assert_matches;
use chrono::{TimeZone, Utc};
use galeria_core::error::PersistenceError;
use galeria_core::store::TrackStore;
use galeria_core::track::{Direction, TrackRecord};
use galeria_db::error::classify_sqlx_error;
use galeria_db::models::video::CreateVideoRecorded;
use galeria_db::repositories::{TrackRepo, VideoRepo};
use galeria_db::PgTrackStore;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_video(id: &str, hour: u32) -> CreateVideoRecorded {
    CreateVideoRecorded {
        id: id.to_string(),
        camera: Some("entrada".to_string()),
        path: format!("arlo/{id}.mp4"),
        date_observed: Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap(),
    }
}

fn record(track_id: &str, video_id: &str, direction: Direction) -> TrackRecord {
    TrackRecord {
        track_id: track_id.to_string(),
        video_id: video_id.to_string(),
        duration: 4.2,
        direction,
    }
}

/// Plain insert without the conflict clause, so a repeated key errors.
async fn insert_track_raw(pool: &PgPool, track_id: &str) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO tracks (track_id, video_id, duration, direction) \
         VALUES ($1, 'clip', 1.0, 'forward')",
    )
    .bind(track_id)
    .execute(pool)
    .await?;
    Ok(())
}

async fn track_count(pool: &PgPool) -> i64 {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tracks")
        .fetch_one(pool)
        .await
        .unwrap();
    count.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_health_check(pool: PgPool) {
    galeria_db::health_check(&pool).await.unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_insert_twice_is_idempotent(pool: PgPool) {
    VideoRepo::create(&pool, &new_video("clip", 10)).await.unwrap();
    let store = PgTrackStore::new(pool.clone());
    let records = vec![
        record("1_clip", "clip", Direction::Forward),
        record("2_clip", "clip", Direction::Backward),
    ];

    assert_eq!(store.insert_tracks(&records).await.unwrap(), 2);
    assert_eq!(store.insert_tracks(&records).await.unwrap(), 0);

    let rows = TrackRepo::list_by_video(&pool, "clip").await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].track_id, "1_clip");
    assert_eq!(rows[0].direction, "forward");
    assert_eq!(rows[1].direction, "backward");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_does_not_overwrite(pool: PgPool) {
    VideoRepo::create(&pool, &new_video("clip", 10)).await.unwrap();
    let store = PgTrackStore::new(pool.clone());

    store
        .insert_tracks(&[record("1_clip", "clip", Direction::Forward)])
        .await
        .unwrap();
    let inserted = store
        .insert_tracks(&[
            record("1_clip", "clip", Direction::Backward),
            record("2_clip", "clip", Direction::Unknown),
        ])
        .await
        .unwrap();

    assert_eq!(inserted, 1);
    let rows = TrackRepo::list_by_video(&pool, "clip").await.unwrap();
    let first: TrackRecord = rows[0].clone().try_into().unwrap();
    assert_eq!(first.direction, Direction::Forward);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_video_rolls_back_whole_batch(pool: PgPool) {
    VideoRepo::create(&pool, &new_video("clip", 10)).await.unwrap();
    let store = PgTrackStore::new(pool.clone());

    let err = store
        .insert_tracks(&[
            record("1_clip", "clip", Direction::Forward),
            record("1_ghost", "ghost", Direction::Forward),
        ])
        .await
        .unwrap_err();

    assert_matches!(err, PersistenceError::Integrity(_));
    assert_eq!(track_count(&pool).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_pending_skips_tracked_videos(pool: PgPool) {
    VideoRepo::create(&pool, &new_video("late", 12)).await.unwrap();
    VideoRepo::create(&pool, &new_video("early", 9)).await.unwrap();
    VideoRepo::create(&pool, &new_video("done", 8)).await.unwrap();
    TrackRepo::insert_batch(&pool, &[record("1_done", "done", Direction::Forward)])
        .await
        .unwrap();

    let pending = VideoRepo::list_pending(&pool).await.unwrap();
    let ids: Vec<&str> = pending.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, vec!["early", "late"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_video_is_insert_or_ignore(pool: PgPool) {
    assert!(VideoRepo::create(&pool, &new_video("clip", 10)).await.unwrap());
    assert!(!VideoRepo::create(&pool, &new_video("clip", 11)).await.unwrap());

    let row = VideoRepo::find_by_id(&pool, "clip").await.unwrap().unwrap();
    assert_eq!(row.date_observed.format("%H").to_string(), "10");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_empty_batch_is_noop(pool: PgPool) {
    assert_eq!(TrackRepo::insert_batch(&pool, &[]).await.unwrap(), 0);
    assert!(TrackRepo::list(&pool).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_video_row_survives_track_commit(pool: PgPool) {
    VideoRepo::create(&pool, &new_video("clip", 10)).await.unwrap();
    let store = PgTrackStore::new(pool.clone());

    store
        .insert_tracks(&[record("1_clip", "clip", Direction::Forward)])
        .await
        .unwrap();

    let row = VideoRepo::find_by_id(&pool, "clip").await.unwrap();
    assert_eq!(row.map(|v| v.id), Some("clip".to_string()));
    assert!(VideoRepo::list_pending(&pool).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_committed_returns_tracked_videos(pool: PgPool) {
    VideoRepo::create(&pool, &new_video("open", 9)).await.unwrap();
    VideoRepo::create(&pool, &new_video("done", 8)).await.unwrap();
    TrackRepo::insert_batch(&pool, &[record("1_done", "done", Direction::Backward)])
        .await
        .unwrap();

    let committed = VideoRepo::list_committed(&pool).await.unwrap();
    let ids: Vec<&str> = committed.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, vec!["done"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unique_violation_is_duplicate(pool: PgPool) {
    VideoRepo::create(&pool, &new_video("clip", 10)).await.unwrap();
    insert_track_raw(&pool, "1_clip").await.unwrap();

    let err = insert_track_raw(&pool, "1_clip").await.unwrap_err();

    assert_matches!(classify_sqlx_error(&err), PersistenceError::Duplicate(_));
}
