//! Batch summary: what was found, classified and written.

use serde::Serialize;
use std::path::PathBuf;
use tessera_core::{DispatchStats, WorkerFault};

use super::types::SummaryFormat;

/// Outcome of one `tessera classify` run.
#[derive(Debug, Default, Serialize)]
pub struct Summary {
    /// Image files discovered
    pub found: usize,

    /// Files that could not be decoded (never dispatched)
    pub unreadable: Vec<PathBuf>,

    /// Files the classifier returned no result for
    pub unclassified: Vec<PathBuf>,

    /// Result images written
    pub written: usize,

    /// Files whose result could not be written
    pub write_failed: Vec<PathBuf>,

    /// Dispatcher counters
    pub dispatch: DispatchStats,

    /// Worker faults, if any
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub faults: Vec<WorkerFault>,

    /// Directory results were written to
    pub output_dir: PathBuf,
}

impl Summary {
    /// Print in the requested format: JSON to stdout, tables to stderr.
    pub fn print(&self, format: SummaryFormat) -> anyhow::Result<()> {
        match format {
            SummaryFormat::Json => println!("{}", serde_json::to_string_pretty(self)?),
            SummaryFormat::Pretty => self.print_table(),
        }
        Ok(())
    }

    fn print_table(&self) {
        let seconds = self.dispatch.elapsed_ms as f64 / 1000.0;
        let rate = if seconds > 0.0 {
            self.dispatch.succeeded as f64 / seconds
        } else {
            0.0
        };

        eprintln!();
        eprintln!("  ====================================");
        eprintln!("               Summary");
        eprintln!("  ====================================");
        eprintln!("    Found:        {:>8}", self.found);
        eprintln!("    Classified:   {:>8}", self.dispatch.succeeded);
        if !self.unclassified.is_empty() {
            eprintln!("    Failed:       {:>8}", self.unclassified.len());
        }
        if !self.unreadable.is_empty() {
            eprintln!("    Unreadable:   {:>8}", self.unreadable.len());
        }
        eprintln!("    Written:      {:>8}", self.written);
        if !self.write_failed.is_empty() {
            eprintln!("    Not written:  {:>8}", self.write_failed.len());
        }
        eprintln!("  ------------------------------------");
        eprintln!("    Threads:      {:>8}", self.dispatch.workers);
        eprintln!("    Duration:     {:>7.1}s", seconds);
        eprintln!("    Rate:         {:>7.1} img/sec", rate);
        eprintln!("  ====================================");
        for path in &self.unclassified {
            eprintln!("    no result: {}", path.display());
        }
        for path in &self.write_failed {
            eprintln!("    not written: {}", path.display());
        }
        for fault in &self.faults {
            eprintln!(
                "    worker {} faulted: {} ({} image(s) skipped)",
                fault.worker,
                fault.message,
                fault.abandoned.len()
            );
        }
    }
}
