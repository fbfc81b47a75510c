//! Per-run outcome tracking and the end-of-run summary.

use std::fmt;
use std::time::{Duration, Instant};

/// Why a needed file did not end up on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The lookup succeeded but no candidate title resolved to an image.
    NotFound,
    /// The batch lookup itself failed.
    LookupFailed(String),
    /// A URL resolved but fetching or writing it failed.
    DownloadFailed(String),
    /// The payload was not a PNG.
    Rejected,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => f.write_str("not found"),
            Self::LookupFailed(e) => write!(f, "lookup failed: {e}"),
            Self::DownloadFailed(e) => write!(f, "download failed: {e}"),
            Self::Rejected => f.write_str("not a PNG"),
        }
    }
}

/// A needed file that was not fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub filename: String,
    pub reason: FailureReason,
}

/// Outcome of a whole run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Files written, in the order they were downloaded.
    pub downloaded: Vec<String>,
    /// Files that failed, in the order they were recorded.
    pub failed: Vec<Failure>,
    /// Bytes written to disk.
    pub total_bytes: u64,
    /// Wall time of the run.
    pub elapsed: Duration,
}

impl RunReport {
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.downloaded.len()
    }

    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failed.len()
    }

    /// Names of the failed files, in order.
    #[must_use]
    pub fn failed_names(&self) -> Vec<&str> {
        self.failed.iter().map(|f| f.filename.as_str()).collect()
    }

    /// Renders the final tally and failure list.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut out = format!(
            "Result: {} succeeded / {} failed ({} in {})",
            self.success_count(),
            self.failure_count(),
            format_bytes(self.total_bytes),
            format_duration(self.elapsed),
        );
        if !self.failed.is_empty() {
            out.push_str("\nFailed:");
            for failure in &self.failed {
                out.push_str(&format!("\n  - {} ({})", failure.filename, failure.reason));
            }
        }
        out
    }
}

/// Accumulates outcomes while a run progresses.
pub struct RunReportBuilder {
    report: RunReport,
    start_time: Instant,
}

impl Default for RunReportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RunReportBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            report: RunReport::default(),
            start_time: Instant::now(),
        }
    }

    /// Records a written file.
    pub fn add_download(&mut self, filename: &str, bytes: u64) {
        self.report.downloaded.push(filename.to_string());
        self.report.total_bytes += bytes;
    }

    /// Records a failed file.
    pub fn add_failure(&mut self, filename: &str, reason: FailureReason) {
        self.report.failed.push(Failure {
            filename: filename.to_string(),
            reason,
        });
    }

    #[must_use]
    pub fn build(mut self) -> RunReport {
        self.report.elapsed = self.start_time.elapsed();
        self.report
    }
}

/// Formats a byte count as a human-readable string (B, KB, MB).
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [(&str, u64); 2] = [("MB", 1024 * 1024), ("KB", 1024)];
    UNITS
        .iter()
        .find(|(_, size)| bytes >= *size)
        .map_or_else(
            || format!("{bytes} B"),
            |(unit, size)| format!("{:.2} {unit}", bytes as f64 / *size as f64),
        )
}

/// Formats a duration as e.g. "4.2s" or "3m 07s".
#[must_use]
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs >= 60 {
        format!("{}m {:02}s", secs / 60, secs % 60)
    } else {
        format!("{}.{:01}s", secs, d.subsec_millis() / 100)
    }
}
