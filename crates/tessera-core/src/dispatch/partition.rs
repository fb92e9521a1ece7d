//! Round-robin striping of jobs across workers.
//!
//! Job `i` goes to worker `i % workers`. The mapping depends only on the job
//! count and the worker count, so the same batch is always split the same way.

use std::iter::StepBy;
use std::ops::Range;

use crate::error::DispatchError;

/// Number of workers for a batch: never more than the jobs, never more than
/// the budget, and at least one when there is any work. A zero budget is
/// treated as one.
pub fn worker_count(jobs: usize, budget: usize) -> usize {
    jobs.min(budget.max(1))
}

/// Threads the classifier may use internally once the pool is sized:
/// the leftover budget spread over the jobs, rounded up, plus one.
pub fn thread_hint(budget: usize, workers: usize, jobs: usize) -> usize {
    if jobs == 0 {
        return 1;
    }
    budget.saturating_sub(workers).div_ceil(jobs) + 1
}

/// The job indices owned by one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerAssignment {
    worker: usize,
    workers: usize,
    jobs: usize,
}

impl WorkerAssignment {
    /// Zero-based worker id.
    pub fn worker(&self) -> usize {
        self.worker
    }

    /// Owned job indices in ascending order.
    pub fn indices(&self) -> StepBy<Range<usize>> {
        (self.worker..self.jobs).step_by(self.workers)
    }

    /// Number of jobs owned by this worker.
    pub fn len(&self) -> usize {
        if self.worker >= self.jobs {
            0
        } else {
            (self.jobs - self.worker).div_ceil(self.workers)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether job `index` belongs to this worker.
    pub fn owns(&self, index: usize) -> bool {
        index < self.jobs && index % self.workers == self.worker
    }
}

/// Split `jobs` indices across `workers` workers.
///
/// Fails when a non-empty batch gets no workers, or when there would be
/// idle workers (more workers than jobs).
pub fn partition(jobs: usize, workers: usize) -> Result<Vec<WorkerAssignment>, DispatchError> {
    if jobs == 0 {
        return Ok(Vec::new());
    }
    if workers == 0 || workers > jobs {
        return Err(DispatchError::InvalidBatch { jobs, workers });
    }
    Ok((0..workers)
        .map(|worker| WorkerAssignment {
            worker,
            workers,
            jobs,
        })
        .collect())
}
