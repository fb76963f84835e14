//! Per-video failure types.
//!
//! None of these cross the batch worker boundary: they are recorded in the
//! [`crate::batch::BatchSummary`] and logged.

use std::path::PathBuf;
use std::time::Duration;

use crate::probe::ProbeError;

/// Why a video produced no track records.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("unusable video: {0}")]
    Unusable(#[from] UnusableVideo),

    #[error("tracker failure: {0}")]
    Tracker(#[from] TrackerError),
}

/// The video cannot be sampled at all.
#[derive(Debug, thiserror::Error)]
pub enum UnusableVideo {
    #[error("cannot open video: {0}")]
    CannotOpen(#[from] ProbeError),

    #[error("invalid frame rate {0}")]
    InvalidFrameRate(f64),

    #[error("frame rate {fps} is below one sample per stride")]
    ZeroStride { fps: u32 },
}

/// The tracking capability failed to start, failed mid-stream, or hung.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("failed to start tracker `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error reading tracker output: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed tracker frame `{line}`: {source}")]
    MalformedFrame {
        line: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("tracker exited with code {code:?}")]
    Exited { code: Option<i32> },

    #[error("tracking did not finish within {0:?}")]
    TimedOut(Duration),
}

/// Removing a committed video's source file failed for a reason other than
/// the file already being gone.
#[derive(Debug, thiserror::Error)]
#[error("failed to delete {}: {source}", path.display())]
pub struct CleanupError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}
