#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Missing configuration: {0}")]
    MissingConfig(&'static str),
}

/// Failure writing a video's tracks to the store.
///
/// Produced by [`crate::store::TrackStore`] implementations. The whole unit of
/// work for the video has been rolled back when any of these is returned.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// A unique constraint rejected a statement outright.
    #[error("Duplicate track: {0}")]
    Duplicate(String),

    /// Foreign key, check or other integrity constraint violation.
    #[error("Integrity violation: {0}")]
    Integrity(String),

    /// Connection, pool or protocol failure.
    #[error("Store unavailable: {0}")]
    Connectivity(String),
}
