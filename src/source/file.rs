//! File-based telemetry source.
//!
//! Polls the telemetry file the sensor engine rewrites every tick.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::{SnapshotBatch, SourceError, TelemetrySource};

/// A telemetry source that polls a file written by the sensor engine.
///
/// This is the traditional mode of operation: the engine rewrites its
/// output file at 10 Hz and this source re-reads it on each fetch.
///
/// The source tracks the file's modification time and only re-parses
/// when the file has actually changed; between changes it returns the
/// cached batch, which gives the stale-read semantics the monitor loop
/// expects from a fetch.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
    last_modified: Option<SystemTime>,
    cached: Option<SnapshotBatch>,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self {
            path,
            description,
            last_modified: None,
            cached: None,
        }
    }

    /// Returns the path being polled.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn modified_time(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).ok()?.modified().ok()
    }
}

impl TelemetrySource for FileSource {
    fn fetch_latest(&mut self) -> Result<SnapshotBatch, SourceError> {
        let current_modified = self.modified_time();

        let changed = match (&self.last_modified, &current_modified) {
            (None, _) => true, // first fetch, always read
            (Some(_), None) => {
                // File disappeared after we had read it: the producer's
                // channel is gone, not merely quiet.
                return Err(SourceError::Unavailable(format!(
                    "{} no longer exists",
                    self.path.display()
                )));
            }
            (Some(last), Some(current)) => current > last,
        };

        if changed {
            let content = fs::read_to_string(&self.path)
                .map_err(|e| SourceError::Unavailable(format!("{}: {}", self.path.display(), e)))?;
            let batch = SnapshotBatch::parse(&content)?;
            self.last_modified = current_modified;
            self.cached = Some(batch);
        }

        // Unchanged file between engine ticks: return the latest batch again.
        Ok(self.cached.clone().unwrap_or_default())
    }

    fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn sample_csv() -> &'static str {
        "device_name,smooth_mag\nMain_Motor_A,0.42\n"
    }

    #[test]
    fn test_file_source_new() {
        let source = FileSource::new("/tmp/live_stream.csv");
        assert_eq!(source.path(), Path::new("/tmp/live_stream.csv"));
        assert_eq!(source.description(), "file: /tmp/live_stream.csv");
    }

    #[test]
    fn test_file_source_reads_batch() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", sample_csv()).unwrap();
        file.flush().unwrap();

        let mut source = FileSource::new(file.path());
        let batch = source.fetch_latest().unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.get("Main_Motor_A").unwrap().magnitude, 0.42);
    }

    #[test]
    fn test_file_source_returns_cached_batch_when_unchanged() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", sample_csv()).unwrap();
        file.flush().unwrap();

        let mut source = FileSource::new(file.path());
        let first = source.fetch_latest().unwrap();
        // Stale read: same batch again, not an error and not empty
        let second = source.fetch_latest().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_file_source_missing_file_is_unavailable() {
        let mut source = FileSource::new("/nonexistent/live_stream.csv");
        assert!(matches!(
            source.fetch_latest(),
            Err(SourceError::Unavailable(_))
        ));
    }

    #[test]
    fn test_file_source_empty_file_is_empty_batch() {
        let file = NamedTempFile::new().unwrap();
        let mut source = FileSource::new(file.path());
        assert!(source.fetch_latest().unwrap().is_empty());
    }

    #[test]
    fn test_file_source_garbage_is_malformed() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "no header here\njust,noise").unwrap();
        file.flush().unwrap();

        let mut source = FileSource::new(file.path());
        assert!(matches!(
            source.fetch_latest(),
            Err(SourceError::Malformed(_))
        ));
    }
}
