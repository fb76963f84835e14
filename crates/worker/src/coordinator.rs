//! Splits the pending list across workers and waits for all of them.
//!
//! Workers share nothing but the store. The coordinator learns only whether
//! each worker completed, failed to start, or panicked; per-video detail
//! stays in the worker's [`BatchSummary`] and logs.

use std::fmt::Display;
use std::future::Future;

use galeria_core::partition::split_balanced;
use galeria_core::types::PendingVideo;
use galeria_pipeline::BatchSummary;

/// How one worker ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerExit {
    Completed(BatchSummary),
    /// The worker could not run its batch (e.g. no database connection).
    Failed(String),
    Panicked,
}

/// Exit status of every worker, indexed by partition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub workers: Vec<WorkerExit>,
}

impl DispatchReport {
    /// Counters summed over the workers that completed.
    pub fn totals(&self) -> BatchSummary {
        let mut total = BatchSummary::default();
        for exit in &self.workers {
            if let WorkerExit::Completed(summary) = exit {
                total.merge(summary);
            }
        }
        total
    }

    pub fn all_completed(&self) -> bool {
        self.workers
            .iter()
            .all(|w| matches!(w, WorkerExit::Completed(_)))
    }
}

/// Run `worker_count` concurrent workers over balanced partitions of
/// `videos` and block until every one has finished.
///
/// `spawn_worker` receives the worker index and its partition and returns
/// the worker's future. Every worker is launched, even with an empty
/// partition.
pub async fn dispatch<F, Fut, E>(
    videos: &[PendingVideo],
    worker_count: usize,
    spawn_worker: F,
) -> DispatchReport
where
    F: Fn(usize, Vec<PendingVideo>) -> Fut,
    Fut: Future<Output = Result<BatchSummary, E>> + Send + 'static,
    E: Display + Send + 'static,
{
    let partitions = split_balanced(videos, worker_count);

    let handles: Vec<_> = partitions
        .into_iter()
        .enumerate()
        .map(|(index, partition)| {
            tracing::info!(worker = index, videos = partition.len(), "Launching worker");
            tokio::spawn(spawn_worker(index, partition))
        })
        .collect();

    let mut workers = Vec::with_capacity(handles.len());
    for (index, handle) in handles.into_iter().enumerate() {
        let exit = match handle.await {
            Ok(Ok(summary)) => {
                tracing::info!(worker = index, committed = summary.committed, "Worker finished");
                WorkerExit::Completed(summary)
            }
            Ok(Err(e)) => {
                tracing::error!(worker = index, error = %e, "Worker failed");
                WorkerExit::Failed(e.to_string())
            }
            Err(join_err) => {
                tracing::error!(worker = index, error = %join_err, "Worker panicked");
                WorkerExit::Panicked
            }
        };
        workers.push(exit);
    }

    DispatchReport { workers }
}
