//! The object-tracking capability.
//!
//! A [`Tracker`] turns a video file into a stream of [`TrackedFrame`]s. The
//! production implementation, [`CommandTracker`], runs an external tracking
//! command and reads one JSON frame per stdout line:
//!
//! ```text
//! {"frame": 12, "detections": [{"id": 3, "xyxy": [104.0, 220.5, 161.2, 390.0]}]}
//! ```
//!
//! `id` is `null` when the model detected a box but has not assigned it a
//! track yet.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use tokio::process::{Child, ChildStdout, Command};

use crate::error::TrackerError;

/// Maximum number of characters of a bad line kept in the error.
const MAX_ERROR_LINE_LEN: usize = 200;

// ---------------------------------------------------------------------------
// Frames
// ---------------------------------------------------------------------------

/// One detection in a frame.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Detection {
    #[serde(rename = "id")]
    pub track_id: Option<i64>,
    /// `[x1, y1, x2, y2]` in pixels.
    pub xyxy: [f32; 4],
}

/// Tracker output for one decoded frame.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrackedFrame {
    /// Zero-based frame index in the video.
    #[serde(rename = "frame")]
    pub index: u64,
    #[serde(default)]
    pub detections: Vec<Detection>,
}

impl TrackedFrame {
    /// Whether every detection in the frame carries a track identity.
    pub fn has_track_ids(&self) -> bool {
        self.detections.iter().all(|d| d.track_id.is_some())
    }
}

pub type FrameStream = BoxStream<'static, Result<TrackedFrame, TrackerError>>;

#[async_trait]
pub trait Tracker: Send + Sync {
    /// Start tracking `video_path`. Frames arrive in video order.
    async fn track(&self, video_path: &Path) -> Result<FrameStream, TrackerError>;
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Model parameters forwarded to the tracking command.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerSettings {
    pub model: String,
    /// Tracker algorithm config, e.g. `botsort.yaml`.
    pub tracker_config: String,
    pub confidence: f32,
    pub iou: f32,
    /// Detector class to keep. `0` is "person".
    pub class_id: u32,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            model: "best.pt".to_string(),
            tracker_config: "botsort.yaml".to_string(),
            confidence: 0.55,
            iou: 0.6,
            class_id: 0,
        }
    }
}

impl TrackerSettings {
    pub fn to_args(&self) -> Vec<String> {
        vec![
            "--model".to_string(),
            self.model.clone(),
            "--tracker".to_string(),
            self.tracker_config.clone(),
            "--conf".to_string(),
            self.confidence.to_string(),
            "--iou".to_string(),
            self.iou.to_string(),
            "--classes".to_string(),
            self.class_id.to_string(),
        ]
    }
}

// ---------------------------------------------------------------------------
// Child-process tracker
// ---------------------------------------------------------------------------

/// [`Tracker`] backed by an external command.
///
/// Invoked as `<program> <args...> <video path>`. The child is killed if its
/// frame stream is dropped before it finishes.
#[derive(Debug, Clone)]
pub struct CommandTracker {
    program: String,
    args: Vec<String>,
}

impl CommandTracker {
    pub fn new(program: impl Into<String>, settings: &TrackerSettings) -> Self {
        Self::with_args(program, settings.to_args())
    }

    pub fn with_args<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl Tracker for CommandTracker {
    async fn track(&self, video_path: &Path) -> Result<FrameStream, TrackerError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(video_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| TrackerError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let stdout = child.stdout.take().ok_or_else(|| TrackerError::Spawn {
            program: self.program.clone(),
            source: std::io::Error::other("stdout was not captured"),
        })?;

        tracing::debug!(program = %self.program, path = %video_path.display(), "Tracker started");

        let state = ChildFrames {
            lines: BufReader::new(stdout).lines(),
            child,
        };
        Ok(futures::stream::try_unfold(state, next_frame).boxed())
    }
}

struct ChildFrames {
    lines: Lines<BufReader<ChildStdout>>,
    child: Child,
}

/// Read the next non-blank frame line; at EOF, check the exit status.
async fn next_frame(
    mut state: ChildFrames,
) -> Result<Option<(TrackedFrame, ChildFrames)>, TrackerError> {
    loop {
        match state.lines.next_line().await? {
            Some(line) if line.trim().is_empty() => continue,
            Some(line) => {
                let frame = parse_frame_line(&line)?;
                return Ok(Some((frame, state)));
            }
            None => {
                let status = state.child.wait().await?;
                if status.success() {
                    return Ok(None);
                }
                return Err(TrackerError::Exited {
                    code: status.code(),
                });
            }
        }
    }
}

/// Parse one line of tracker output.
pub fn parse_frame_line(line: &str) -> Result<TrackedFrame, TrackerError> {
    serde_json::from_str(line).map_err(|source| TrackerError::MalformedFrame {
        line: line.chars().take(MAX_ERROR_LINE_LEN).collect(),
        source,
    })
}
