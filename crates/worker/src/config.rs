//! Worker configuration from environment variables.
//!
//! | Variable             | Required | Default         |
//! |----------------------|----------|-----------------|
//! | `DATABASE_URL`       | yes      | --              |
//! | `VIDEO_ROOT`         | no       | `videosGaleria` |
//! | `WORKER_COUNT`       | no       | `3`             |
//! | `TRACKER_COMMAND`    | no       | `galeria-track` |
//! | `TRACKER_MODEL`      | no       | `best.pt`       |
//! | `TRACKER_CONFIG`     | no       | `botsort.yaml`  |
//! | `TRACKER_CONFIDENCE` | no       | `0.55`          |
//! | `TRACKER_IOU`        | no       | `0.6`           |
//! | `TRACKER_CLASS`      | no       | `0`             |
//! | `FFPROBE_BIN`        | no       | `ffprobe`       |
//! | `VIDEO_TIMEOUT_SECS` | no       | unset           |

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use galeria_core::error::CoreError;
use galeria_pipeline::tracker::TrackerSettings;

pub const DEFAULT_VIDEO_ROOT: &str = "videosGaleria";
pub const DEFAULT_WORKER_COUNT: usize = 3;
pub const DEFAULT_TRACKER_COMMAND: &str = "galeria-track";
pub const DEFAULT_FFPROBE_BIN: &str = "ffprobe";

/// Upper bound on concurrent workers. Each one holds a database connection
/// and runs a tracker process.
const MAX_WORKER_COUNT: usize = 64;

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub database_url: String,
    pub video_root: PathBuf,
    pub worker_count: usize,
    pub tracker_command: String,
    pub tracker: TrackerSettings,
    pub ffprobe_bin: String,
    pub video_timeout: Option<Duration>,
}

impl WorkerConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` to resolve variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.is_empty())
            .ok_or(CoreError::MissingConfig("DATABASE_URL"))?;

        let defaults = TrackerSettings::default();
        let tracker = TrackerSettings {
            model: lookup("TRACKER_MODEL").unwrap_or(defaults.model),
            tracker_config: lookup("TRACKER_CONFIG").unwrap_or(defaults.tracker_config),
            confidence: parse_or(&lookup, "TRACKER_CONFIDENCE", defaults.confidence)?,
            iou: parse_or(&lookup, "TRACKER_IOU", defaults.iou)?,
            class_id: parse_or(&lookup, "TRACKER_CLASS", defaults.class_id)?,
        };

        let video_timeout = match lookup("VIDEO_TIMEOUT_SECS") {
            Some(raw) => Some(Duration::from_secs(parse_value("VIDEO_TIMEOUT_SECS", &raw)?)),
            None => None,
        };

        let config = Self {
            database_url,
            video_root: lookup("VIDEO_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_VIDEO_ROOT)),
            worker_count: parse_or(&lookup, "WORKER_COUNT", DEFAULT_WORKER_COUNT)?,
            tracker_command: lookup("TRACKER_COMMAND")
                .unwrap_or_else(|| DEFAULT_TRACKER_COMMAND.to_string()),
            tracker,
            ffprobe_bin: lookup("FFPROBE_BIN").unwrap_or_else(|| DEFAULT_FFPROBE_BIN.to_string()),
            video_timeout,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_worker_count(self.worker_count)?;
        validate_unit_interval("TRACKER_CONFIDENCE", self.tracker.confidence)?;
        validate_unit_interval("TRACKER_IOU", self.tracker.iou)?;
        if self.tracker_command.trim().is_empty() {
            return Err(CoreError::Validation(
                "TRACKER_COMMAND must not be empty".to_string(),
            ));
        }
        if self.video_timeout == Some(Duration::ZERO) {
            return Err(CoreError::Validation(
                "VIDEO_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Worker count must be in `1..=MAX_WORKER_COUNT`.
pub fn validate_worker_count(count: usize) -> Result<(), CoreError> {
    if count == 0 || count > MAX_WORKER_COUNT {
        return Err(CoreError::Validation(format!(
            "WORKER_COUNT must be between 1 and {MAX_WORKER_COUNT}, got {count}"
        )));
    }
    Ok(())
}

fn validate_unit_interval(name: &str, value: f32) -> Result<(), CoreError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(CoreError::Validation(format!(
            "{name} must be between 0 and 1, got {value}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Parsing helpers
// ---------------------------------------------------------------------------

fn parse_value<T: FromStr>(name: &str, raw: &str) -> Result<T, CoreError> {
    raw.trim()
        .parse()
        .map_err(|_| CoreError::Validation(format!("{name} has invalid value '{raw}'")))
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> Result<T, CoreError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(raw) => parse_value(name, &raw),
        None => Ok(default),
    }
}
