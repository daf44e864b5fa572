//! Append-only CSV metric log

use crate::logging::Logger;
use crate::models::{MetricRecord, CSV_HEADER};
use crate::output::MetricSink;
use crate::types::Result;
use async_trait::async_trait;
use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Sink appending one CSV row per metric record.
///
/// The header row is written once when the destination is newly created.
/// Write failures are logged and swallowed: persistence problems must never
/// abort probing.
pub struct CsvSink {
    path: PathBuf,
    failures: u64,
    logger: Logger,
}

impl CsvSink {
    /// Create a CSV sink for the given destination.
    ///
    /// A directory destination gets a generated `ping_YYYYMMDD_HHMMSS.csv`
    /// filename inside it.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: Self::resolve_path(path.as_ref()),
            failures: 0,
            logger: Logger::new("CSV".to_string()),
        }
    }

    fn resolve_path(path: &Path) -> PathBuf {
        if path.is_dir() {
            let name = format!("ping_{}.csv", Local::now().format("%Y%m%d_%H%M%S"));
            path.join(name)
        } else {
            path.to_path_buf()
        }
    }

    /// Destination file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of rows that failed to persist
    pub fn failures(&self) -> u64 {
        self.failures
    }

    fn append(&self, record: &MetricRecord) -> Result<()> {
        let newfile = !self.path.exists();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        if newfile {
            writeln!(file, "{}", CSV_HEADER)?;
        }
        writeln!(file, "{}", record.csv_row())?;
        Ok(())
    }
}

#[async_trait]
impl MetricSink for CsvSink {
    async fn on_record(&mut self, record: &MetricRecord) {
        if let Err(err) = self.append(record) {
            self.failures += 1;
            self.logger
                .warn(&format!(
                    "Failed to write CSV row for {}: {}",
                    record.target, err
                ))
                .field("path", self.path.display().to_string())
                .field("failures", self.failures)
                .log()
                .await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(target: &str, rtt_ms: Option<f64>) -> MetricRecord {
        MetricRecord {
            target: target.to_string(),
            timestamp: 1_700_000_000.5,
            rtt_ms,
            sent: 2,
            received: 1,
            window_loss_pct: 50.0,
            jitter_ms: 0.125,
        }
    }

    #[tokio::test]
    async fn test_header_written_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log.csv");
        let mut sink = CsvSink::new(&path);

        sink.on_record(&record("a", Some(14.2))).await;
        sink.on_record(&record("a", None)).await;

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_HEADER);
        assert!(lines[1].contains("14.200"));
        // Absent RTT leaves the field empty
        assert!(lines[2].contains(",a,,"));
        assert_eq!(sink.failures(), 0);
    }

    #[tokio::test]
    async fn test_appends_to_existing_file_without_new_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log.csv");

        {
            let mut sink = CsvSink::new(&path);
            sink.on_record(&record("a", Some(1.0))).await;
        }
        {
            let mut sink = CsvSink::new(&path);
            sink.on_record(&record("a", Some(2.0))).await;
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        let headers = contents
            .lines()
            .filter(|line| *line == CSV_HEADER)
            .count();
        assert_eq!(headers, 1);
        assert_eq!(contents.lines().count(), 3);
    }

    #[tokio::test]
    async fn test_directory_destination_gets_generated_name() {
        let dir = tempdir().unwrap();
        let sink = CsvSink::new(dir.path());
        let name = sink.path().file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("ping_"));
        assert!(name.ends_with(".csv"));
    }

    #[tokio::test]
    async fn test_write_failure_is_swallowed() {
        let mut sink = CsvSink::new("/nonexistent-root-dir/sub/log.csv");
        sink.on_record(&record("a", Some(1.0))).await;
        assert_eq!(sink.failures(), 1);
    }
}
