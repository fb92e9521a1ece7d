//! Progress reporting.
//!
//! Sinks are called from every worker thread, in no particular order. Only
//! the number of `advance` calls is meaningful: one per finished image.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Receiver for batch progress signals.
pub trait ProgressSink: Send + Sync {
    /// A new batch of `total` images is starting.
    fn reset(&self, total: usize, message: &str);

    /// One more image has finished, successfully or not.
    fn advance(&self);
}

/// Forwards every signal to each registered sink.
#[derive(Clone, Default)]
pub struct ProgressFanout {
    sinks: Vec<Arc<dyn ProgressSink>>,
}

impl ProgressFanout {
    /// Create an empty fan-out (no reporting).
    pub fn new() -> Self {
        Self::default()
    }

    /// Register another sink.
    pub fn push(&mut self, sink: Arc<dyn ProgressSink>) {
        self.sinks.push(sink);
    }

    /// Number of registered sinks.
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub(crate) fn reset(&self, total: usize, message: &str) {
        for sink in &self.sinks {
            sink.reset(total, message);
        }
    }

    pub(crate) fn advance(&self) {
        for sink in &self.sinks {
            sink.advance();
        }
    }
}

impl FromIterator<Arc<dyn ProgressSink>> for ProgressFanout {
    fn from_iter<T: IntoIterator<Item = Arc<dyn ProgressSink>>>(iter: T) -> Self {
        Self {
            sinks: iter.into_iter().collect(),
        }
    }
}

impl fmt::Debug for ProgressFanout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressFanout")
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

/// A lock-free sink that counts the signals it receives.
#[derive(Debug, Default)]
pub struct ProgressCounter {
    total: AtomicUsize,
    resets: AtomicUsize,
    advanced: AtomicUsize,
}

impl ProgressCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total announced by the most recent `reset`.
    pub fn total(&self) -> usize {
        self.total.load(Ordering::Acquire)
    }

    /// Number of `reset` calls received.
    pub fn resets(&self) -> usize {
        self.resets.load(Ordering::Acquire)
    }

    /// Number of `advance` calls since the last `reset`.
    pub fn advanced(&self) -> usize {
        self.advanced.load(Ordering::Acquire)
    }

    /// Fraction of the current batch completed, in 0.0..=1.0.
    pub fn fraction(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => (self.advanced() as f64 / total as f64).min(1.0),
        }
    }
}

impl ProgressSink for ProgressCounter {
    fn reset(&self, total: usize, _message: &str) {
        self.advanced.store(0, Ordering::Release);
        self.total.store(total, Ordering::Release);
        self.resets.fetch_add(1, Ordering::AcqRel);
    }

    fn advance(&self) {
        self.advanced.fetch_add(1, Ordering::AcqRel);
    }
}
