//! Channel-based telemetry source.
//!
//! Receives snapshot batches via a tokio watch channel. Useful when the
//! engine is embedded in the same process (or in tests) and pushes
//! batches instead of writing a file.

use tokio::sync::watch;

use super::{SnapshotBatch, SourceError, TelemetrySource};

/// A telemetry source fed through a watch channel.
///
/// The producer sends complete batches through the channel at its own
/// cadence; each fetch returns the most recent value. A watch channel
/// holds exactly one batch, so a slow consumer sees the latest reading
/// rather than a backlog.
///
/// # Example
///
/// ```
/// use sentinel_v::source::ChannelSource;
///
/// let (tx, source) = ChannelSource::create("embedded engine");
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: watch::Receiver<SnapshotBatch>,
    description: String,
}

impl ChannelSource {
    /// Create a new channel source from the receiving end of a watch channel.
    pub fn new(receiver: watch::Receiver<SnapshotBatch>, source_description: &str) -> Self {
        Self {
            receiver,
            description: format!("channel: {}", source_description),
        }
    }

    /// Create a channel pair for pushing batches to a ChannelSource.
    ///
    /// The channel starts out holding an empty batch, which fetches as
    /// "no data yet" until the producer sends its first reading.
    pub fn create(source_description: &str) -> (watch::Sender<SnapshotBatch>, Self) {
        let (tx, rx) = watch::channel(SnapshotBatch::default());
        (tx, Self::new(rx, source_description))
    }
}

impl TelemetrySource for ChannelSource {
    fn fetch_latest(&mut self) -> Result<SnapshotBatch, SourceError> {
        // A dropped sender means the producer is gone for good.
        if self.receiver.has_changed().is_err() {
            return Err(SourceError::Unavailable(
                "telemetry channel closed".to_string(),
            ));
        }
        Ok(self.receiver.borrow_and_update().clone())
    }

    fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::DeviceSnapshot;

    #[test]
    fn test_channel_source_starts_with_no_data() {
        let (_tx, mut source) = ChannelSource::create("test");
        assert!(source.fetch_latest().unwrap().is_empty());
    }

    #[test]
    fn test_channel_source_returns_latest_batch() {
        let (tx, mut source) = ChannelSource::create("test");

        tx.send(SnapshotBatch::from_records(vec![DeviceSnapshot::new(
            "Main_Motor_A",
            0.42,
        )]))
        .unwrap();

        let batch = source.fetch_latest().unwrap();
        assert_eq!(batch.len(), 1);

        // Stale read: no new value, same batch again
        let again = source.fetch_latest().unwrap();
        assert_eq!(batch, again);
    }

    #[test]
    fn test_channel_source_unavailable_after_sender_drop() {
        let (tx, mut source) = ChannelSource::create("test");
        drop(tx);
        assert!(matches!(
            source.fetch_latest(),
            Err(SourceError::Unavailable(_))
        ));
    }

    #[test]
    fn test_channel_source_description() {
        let (_tx, source) = ChannelSource::create("embedded engine");
        assert_eq!(source.description(), "channel: embedded engine");
    }
}
