//! The ordered outcome of one dispatch.

use serde::Serialize;

/// A worker that stopped before finishing its assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkerFault {
    /// Zero-based worker id
    pub worker: usize,

    /// Panic or spawn failure message
    pub message: String,

    /// Job indices the worker never got to (their slots are absent)
    pub abandoned: Vec<usize>,
}

/// Counters describing one dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DispatchStats {
    /// Images in the batch
    pub jobs: usize,

    /// Worker threads started
    pub workers: usize,

    /// Internal thread hint passed to the classifier
    pub thread_hint: usize,

    /// Images with a result
    pub succeeded: usize,

    /// Images without a result (classifier failure or worker fault)
    pub failed: usize,

    /// Workers that faulted
    pub faulted_workers: usize,

    /// Wall-clock time of the dispatch in milliseconds
    pub elapsed_ms: u64,
}

/// One entry per input image, in input order. `None` marks an image that
/// could not be classified.
#[derive(Debug)]
pub struct ResultBatch<O> {
    results: Vec<Option<O>>,
    faults: Vec<WorkerFault>,
    stats: DispatchStats,
}

impl<O> ResultBatch<O> {
    pub(crate) fn new(results: Vec<Option<O>>, faults: Vec<WorkerFault>, stats: DispatchStats) -> Self {
        Self {
            results,
            faults,
            stats,
        }
    }

    pub(crate) fn empty() -> Self {
        Self::new(Vec::new(), Vec::new(), DispatchStats::default())
    }

    /// Number of entries (equals the number of input images).
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Result for image `index`, if it was classified.
    pub fn get(&self, index: usize) -> Option<&O> {
        self.results.get(index).and_then(Option::as_ref)
    }

    /// All entries in input order.
    pub fn results(&self) -> &[Option<O>] {
        &self.results
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&O>> {
        self.results.iter().map(Option::as_ref)
    }

    /// Indices of images without a result, ascending.
    pub fn failed_indices(&self) -> Vec<usize> {
        self.results
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.is_none().then_some(i))
            .collect()
    }

    /// Workers that faulted during this dispatch.
    pub fn faults(&self) -> &[WorkerFault] {
        &self.faults
    }

    pub fn stats(&self) -> &DispatchStats {
        &self.stats
    }

    pub fn into_results(self) -> Vec<Option<O>> {
        self.results
    }
}

impl<O> IntoIterator for ResultBatch<O> {
    type Item = Option<O>;
    type IntoIter = std::vec::IntoIter<Option<O>>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}
