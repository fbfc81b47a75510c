//! Terminal progress lines and the end-of-run summary.

use std::io::{self, Write};
use std::sync::Mutex;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::job::FetchProgress;
use crate::report::{FailureReason, RunReport, format_bytes, format_duration};
use crate::Error;

const SEPARATOR: &str = "────────────────────────────────────────────────────────────";

/// Creates the bar that tracks batches.
fn make_batch_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} batch {pos}/{len} [{bar:40.cyan/blue}] {msg}")
            .expect("progress template is valid")
            .progress_chars("━━╌"),
    );
    bar
}

/// [`FetchProgress`] that prints a line per file above a batch bar.
///
/// Lines go to `out` whether or not the bar is drawn, so they survive
/// runs where stderr is not a terminal.
pub struct CliProgress {
    bar: ProgressBar,
    out: Mutex<Box<dyn Write + Send>>,
}

impl CliProgress {
    #[must_use]
    pub fn new(total_batches: usize) -> Self {
        Self::with_output(
            make_batch_bar(total_batches as u64),
            Box::new(io::stdout()),
        )
    }

    /// Uses the given bar and line sink.
    #[must_use]
    pub fn with_output(bar: ProgressBar, out: Box<dyn Write + Send>) -> Self {
        Self {
            bar,
            out: Mutex::new(out),
        }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    fn emit(&self, line: &str) {
        self.bar.suspend(|| {
            if let Ok(mut out) = self.out.lock() {
                let _ = writeln!(out, "{line}");
                let _ = out.flush();
            }
        });
    }
}

impl FetchProgress for CliProgress {
    fn on_batch_start(&self, index: usize, total: usize, files: &[String]) {
        self.bar.set_length(total as u64);
        self.bar.set_position(index.saturating_sub(1) as u64);
        if let (Some(first), Some(last)) = (files.first(), files.last()) {
            self.bar.set_message(format!("{first} .. {last}"));
        }
    }

    fn on_downloaded(&self, filename: &str, bytes: u64) {
        self.emit(&format!(
            "  {} {filename} ({})",
            style("OK:").green(),
            format_bytes(bytes)
        ));
    }

    fn on_missed(&self, filename: &str, reason: &FailureReason) {
        self.emit(&format!(
            "  {} {filename} ({reason})",
            style("MISS:").yellow()
        ));
    }

    fn on_lookup_error(&self, files: &[String], error: &Error) {
        self.emit(&format!(
            "  {} {error} ({} file(s) skipped)",
            style("API Error:").red(),
            files.len()
        ));
    }
}

/// Prints the final tally and failure list.
pub fn print_summary(report: &RunReport) {
    println!("\n{SEPARATOR}");
    println!(
        "  Downloaded: {}  Failed: {}",
        style(report.success_count()).green(),
        style(report.failure_count()).red()
    );
    println!(
        "  {} written in {}",
        format_bytes(report.total_bytes),
        format_duration(report.elapsed)
    );

    if !report.failed.is_empty() {
        println!("{SEPARATOR}");
        println!("Failed:");
        for failure in &report.failed {
            println!("  - {} ({})", failure.filename, failure.reason);
        }
    }
    println!("{SEPARATOR}");
}
