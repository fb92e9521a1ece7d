//! Observability hooks for the dispatcher.
//!
//! The observer is injected into each dispatch and shared by all workers.
//! [`TracingObserver`] is the default and routes everything to `tracing`.

use crate::error::ClassifyError;

use super::batch::{DispatchStats, WorkerFault};

/// Receives dispatch events. Every hook defaults to doing nothing.
pub trait DispatchObserver: Send + Sync {
    /// A non-empty batch was partitioned and workers are about to start.
    fn batch_started(&self, _jobs: usize, _workers: usize, _thread_hint: usize) {}

    /// Image `index` was classified by `worker`.
    fn job_finished(&self, _index: usize, _worker: usize) {}

    /// The classifier returned no result for image `index`.
    fn job_failed(&self, _index: usize, _worker: usize, _error: &ClassifyError) {}

    /// A worker died before finishing its assignment.
    fn worker_faulted(&self, _fault: &WorkerFault) {}

    /// All workers have been joined.
    fn batch_finished(&self, _stats: &DispatchStats) {}
}

/// Logs dispatch events through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl DispatchObserver for TracingObserver {
    fn batch_started(&self, jobs: usize, workers: usize, thread_hint: usize) {
        tracing::info!(
            jobs,
            workers,
            thread_hint,
            "Processing {} image(s) in {} thread(s)",
            jobs,
            workers
        );
    }

    fn job_finished(&self, index: usize, worker: usize) {
        tracing::debug!(index, worker, "Processed image {} in thread {}", index + 1, worker + 1);
    }

    fn job_failed(&self, index: usize, worker: usize, error: &ClassifyError) {
        tracing::warn!(index, worker, "Image {} could not be classified: {}", index, error);
    }

    fn worker_faulted(&self, fault: &WorkerFault) {
        tracing::error!(
            worker = fault.worker,
            abandoned = fault.abandoned.len(),
            "Worker {} faulted: {} ({} image(s) left unclassified)",
            fault.worker,
            fault.message,
            fault.abandoned.len()
        );
    }

    fn batch_finished(&self, stats: &DispatchStats) {
        tracing::info!(
            succeeded = stats.succeeded,
            failed = stats.failed,
            elapsed_ms = stats.elapsed_ms,
            "Batch finished: {}/{} image(s) classified",
            stats.succeeded,
            stats.jobs
        );
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl DispatchObserver for NoopObserver {}
