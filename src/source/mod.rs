//! Telemetry acquisition for the monitor pipeline.
//!
//! This module provides a trait-based abstraction for fetching device
//! snapshot batches from the external sensor engine (file polling,
//! in-memory channels, etc.).

mod channel;
mod file;
mod snapshot;

pub use channel::ChannelSource;
pub use file::FileSource;
pub use snapshot::{DeviceSnapshot, SnapshotBatch};

use std::fmt::Debug;

use thiserror::Error;

/// Errors a telemetry source can surface for one fetch.
///
/// Both variants are transient: the monitor loop reports them and skips
/// the cycle rather than terminating.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The engine's channel cannot be reached (producer not started,
    /// file missing, channel torn down).
    #[error("telemetry source unavailable: {0}")]
    Unavailable(String),

    /// The retrieved data cannot be parsed into a snapshot batch.
    #[error("malformed telemetry batch: {0}")]
    Malformed(String),
}

/// Trait for fetching telemetry batches from the sensor engine.
///
/// Implementations must be swappable without touching the rest of the
/// pipeline: the monitor loop only sees this trait.
///
/// # Example
///
/// ```
/// use sentinel_v::source::{FileSource, TelemetrySource};
///
/// let mut source = FileSource::new("live_stream.csv");
/// match source.fetch_latest() {
///     Ok(batch) => println!("{} devices", batch.len()),
///     Err(e) => eprintln!("{}", e),
/// }
/// ```
pub trait TelemetrySource: Send + Debug {
    /// Fetch the most recently available batch.
    ///
    /// Must not block for a meaningful fraction of the sampling tick, and
    /// must not wait for the producer to emit a *new* value: returning the
    /// same batch on consecutive calls (a stale read) is acceptable. A
    /// producer that has started but not yet emitted data yields an empty
    /// batch, which is distinct from [`SourceError::Unavailable`].
    fn fetch_latest(&mut self) -> Result<SnapshotBatch, SourceError>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;
}
