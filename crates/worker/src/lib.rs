//! `galeria-worker` library crate.
//!
//! Loads the pending videos once, sweeps files left behind by failed
//! deletes, fans the pending videos out to concurrent batch workers, and
//! reports the outcome. The binary entrypoint lives in
//! `main.rs`.

pub mod config;
pub mod coordinator;

use galeria_core::types::{PendingVideo, VideoRecord};
use galeria_db::models::video::VideoRecorded;
use galeria_db::repositories::VideoRepo;
use galeria_db::PgTrackStore;
use galeria_pipeline::cleanup::sweep_committed;
use galeria_pipeline::probe::FfprobeProbe;
use galeria_pipeline::tracker::CommandTracker;
use galeria_pipeline::{BatchSummary, BatchWorker, TrackExtractor};

use crate::config::WorkerConfig;
use crate::coordinator::{dispatch, DispatchReport};

/// Connections for the registry pool used before dispatch.
const REGISTRY_POOL_SIZE: u32 = 2;

/// Each worker owns exactly one connection.
const WORKER_POOL_SIZE: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run one full pass over the pending videos.
pub async fn run(config: WorkerConfig) -> Result<DispatchReport, WorkerError> {
    let WorkList { pending, committed } = load_work(&config).await?;
    sweep_committed(&committed).await;

    if pending.is_empty() {
        tracing::info!("No videos found in the database");
        return Ok(DispatchReport::default());
    }
    tracing::info!(
        videos = pending.len(),
        workers = config.worker_count,
        "Dispatching pending videos",
    );

    let report = dispatch(&pending, config.worker_count, |index, partition| {
        run_worker(config.clone(), index, partition)
    })
    .await;

    let totals = report.totals();
    tracing::info!(
        committed = totals.committed,
        no_tracks = totals.no_tracks,
        skipped = totals.skipped,
        failed = totals.failed,
        tracks = totals.tracks_inserted,
        files_deleted = totals.files_deleted,
        all_workers_completed = report.all_completed(),
        "Processing completed",
    );
    Ok(report)
}

/// Videos read from the registry before dispatch, resolved under the video root.
struct WorkList {
    pending: Vec<PendingVideo>,
    committed: Vec<PendingVideo>,
}

/// Connect, migrate, and read the work list.
async fn load_work(config: &WorkerConfig) -> Result<WorkList, WorkerError> {
    let pool = galeria_db::create_pool(&config.database_url, REGISTRY_POOL_SIZE).await?;
    tracing::info!("Database connection pool created");

    galeria_db::health_check(&pool).await?;
    galeria_db::run_migrations(&pool).await?;
    tracing::info!("Database migrations applied");

    let pending = VideoRepo::list_pending(&pool).await?;
    let committed = VideoRepo::list_committed(&pool).await?;
    pool.close().await;

    let resolve = |rows: Vec<VideoRecorded>| -> Vec<PendingVideo> {
        rows.into_iter()
            .map(|row| VideoRecord::from(row).to_pending(&config.video_root))
            .collect()
    };
    Ok(WorkList {
        pending: resolve(pending),
        committed: resolve(committed),
    })
}

/// One worker: open a private connection, process the partition, close.
async fn run_worker(
    config: WorkerConfig,
    index: usize,
    partition: Vec<PendingVideo>,
) -> Result<BatchSummary, WorkerError> {
    if partition.is_empty() {
        return Ok(BatchSummary::default());
    }

    let pool = galeria_db::create_pool(&config.database_url, WORKER_POOL_SIZE).await?;
    tracing::info!(worker = index, videos = partition.len(), "Worker started");

    let extractor = TrackExtractor::new(
        FfprobeProbe::new(&config.ffprobe_bin),
        CommandTracker::new(&config.tracker_command, &config.tracker),
    );
    let worker = BatchWorker::new(extractor, PgTrackStore::new(pool))
        .with_video_timeout(config.video_timeout);

    let summary = worker.run_batch(&partition).await;
    worker.into_store().close().await;
    Ok(summary)
}
