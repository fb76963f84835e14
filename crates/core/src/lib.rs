//! `galeria-core` -- domain types and pure logic for the track pipeline.
//!
//! Has no internal dependencies; the `db`, `pipeline` and `worker` crates
//! all build on it.

pub mod error;
pub mod geometry;
pub mod partition;
pub mod store;
pub mod track;
pub mod types;
