//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod track_repo;
pub mod video_repo;

pub use track_repo::TrackRepo;
pub use video_repo::VideoRepo;
