//! `galeria-worker` -- pedestrian track extraction over downloaded videos.
//!
//! Reads pending videos from Postgres, runs the tracker over each one in
//! `WORKER_COUNT` concurrent workers, stores one summary row per track, and
//! deletes each video file once its tracks are committed. See
//! [`galeria_worker::config`] for the environment variables.

use galeria_worker::config::WorkerConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "galeria_worker=info,galeria_pipeline=info,galeria_db=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = WorkerConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    });

    tracing::info!(
        workers = config.worker_count,
        video_root = %config.video_root.display(),
        tracker = %config.tracker_command,
        "Starting galeria-worker",
    );

    match galeria_worker::run(config).await {
        Ok(report) if !report.all_completed() => {
            tracing::warn!("Some workers did not complete; their videos remain pending");
        }
        Ok(_) => {}
        Err(e) => {
            tracing::error!(error = %e, "Track processing failed");
            std::process::exit(1);
        }
    }
}
