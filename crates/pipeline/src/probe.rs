//! Frame-rate probing.
//!
//! [`FfprobeProbe`] shells out to `ffprobe` and reads the first video
//! stream's average frame rate, falling back to `r_frame_rate`.

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;

/// Error type for ffprobe operations.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("ffprobe binary not found: {0}")]
    NotFound(std::io::Error),

    #[error("ffprobe execution failed (exit code {exit_code:?}): {stderr}")]
    ExecutionFailed {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("failed to parse ffprobe output: {0}")]
    ParseError(String),

    #[error("video file not found: {0}")]
    VideoNotFound(String),

    #[error("no video stream in {0}")]
    NoVideoStream(String),
}

/// Reports a video's frame rate in frames per second.
#[async_trait]
pub trait VideoProbe: Send + Sync {
    async fn frame_rate(&self, path: &Path) -> Result<f64, ProbeError>;
}

// ---------------------------------------------------------------------------
// ffprobe JSON output structures
// ---------------------------------------------------------------------------

/// Top-level ffprobe JSON output (`-print_format json -show_streams`).
#[derive(Debug, Deserialize)]
pub struct FfprobeOutput {
    #[serde(default)]
    pub streams: Vec<FfprobeStream>,
}

/// A single stream from ffprobe output.
#[derive(Debug, Deserialize)]
pub struct FfprobeStream {
    pub index: i32,
    pub codec_type: Option<String>,
    /// e.g. "30/1" or "24000/1001"
    pub r_frame_rate: Option<String>,
    /// "0/0" when the container does not record one.
    pub avg_frame_rate: Option<String>,
}

// ---------------------------------------------------------------------------
// ffprobe-backed probe
// ---------------------------------------------------------------------------

/// [`VideoProbe`] that runs the `ffprobe` binary.
#[derive(Debug, Clone)]
pub struct FfprobeProbe {
    binary: String,
}

impl FfprobeProbe {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Run ffprobe on `path` and return the parsed JSON output.
    pub async fn probe(&self, path: &Path) -> Result<FfprobeOutput, ProbeError> {
        if !path.exists() {
            return Err(ProbeError::VideoNotFound(path.to_string_lossy().to_string()));
        }

        let output = tokio::process::Command::new(&self.binary)
            .args(["-v", "quiet", "-print_format", "json", "-show_streams"])
            .arg(path)
            .output()
            .await
            .map_err(ProbeError::NotFound)?;

        if !output.status.success() {
            return Err(ProbeError::ExecutionFailed {
                exit_code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        serde_json::from_str::<FfprobeOutput>(&stdout)
            .map_err(|e| ProbeError::ParseError(format!("{e}: {stdout}")))
    }
}

impl Default for FfprobeProbe {
    fn default() -> Self {
        Self::new("ffprobe")
    }
}

#[async_trait]
impl VideoProbe for FfprobeProbe {
    async fn frame_rate(&self, path: &Path) -> Result<f64, ProbeError> {
        let probe = self.probe(path).await?;
        parse_framerate(&probe)
            .ok_or_else(|| ProbeError::NoVideoStream(path.to_string_lossy().to_string()))
    }
}

// ---------------------------------------------------------------------------
// Parsing helpers
// ---------------------------------------------------------------------------

/// Find the first video stream in the ffprobe output.
fn first_video_stream(probe: &FfprobeOutput) -> Option<&FfprobeStream> {
    probe
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
}

/// Frame rate of the first video stream, or `None` without one.
///
/// A positive `avg_frame_rate` wins; `r_frame_rate` can be the timebase on
/// variable-rate footage. Neither parsing reads as `0.0`.
pub fn parse_framerate(probe: &FfprobeOutput) -> Option<f64> {
    first_video_stream(probe).map(|s| {
        s.avg_frame_rate
            .as_deref()
            .map(parse_fraction)
            .filter(|fps| *fps > 0.0)
            .unwrap_or_else(|| s.r_frame_rate.as_deref().map_or(0.0, parse_fraction))
    })
}

/// Parse a fraction string like `"30/1"` into a float.
fn parse_fraction(s: &str) -> f64 {
    if let Some((num, den)) = s.split_once('/') {
        let num = num.parse::<f64>().unwrap_or(0.0);
        let den = den.parse::<f64>().unwrap_or(0.0);
        return if den > 0.0 { num / den } else { 0.0 };
    }
    s.parse::<f64>().unwrap_or(0.0)
}
