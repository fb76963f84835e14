//! `galeria-pipeline` -- turns tracker output into persisted track summaries.
//!
//! - [`probe`]: frame-rate probing via ffprobe.
//! - [`tracker`]: the tracking-capability seam and its child-process
//!   implementation.
//! - [`extractor`]: per-video sampling and aggregation.
//! - [`batch`]: the per-partition worker loop.
//! - [`cleanup`]: source-file removal after a commit, and the sweep for
//!   files a failed delete left behind.

pub mod batch;
pub mod cleanup;
pub mod error;
pub mod extractor;
pub mod probe;
pub mod tracker;

pub use batch::{BatchSummary, BatchWorker, VideoOutcome};
pub use extractor::TrackExtractor;

#[cfg(test)]
mod testing;
