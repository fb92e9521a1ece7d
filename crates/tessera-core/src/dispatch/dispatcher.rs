//! Batch dispatch across a per-call pool of OS threads.

use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use crate::config::DispatchConfig;
use crate::error::DispatchError;

use super::batch::{DispatchStats, ResultBatch, WorkerFault};
use super::classifier::{Classifier, ClassifyRequest};
use super::observer::{DispatchObserver, TracingObserver};
use super::partition::{partition, thread_hint, worker_count, WorkerAssignment};
use super::progress::{ProgressFanout, ProgressSink};
use super::slots::ResultSlots;

/// Classifies batches of images in parallel with a borrowed classifier.
///
/// Each call to [`classify_batch`](Self::classify_batch) starts a fresh set of
/// worker threads, stripes the images across them, and joins all of them
/// before returning. A failed image never fails the batch.
pub struct Dispatcher<'c, C: Classifier> {
    classifier: &'c C,
    config: DispatchConfig,
    progress: ProgressFanout,
    observer: Arc<dyn DispatchObserver>,
}

impl<'c, C: Classifier> Dispatcher<'c, C> {
    /// Create a dispatcher that logs through `tracing` and reports no progress.
    pub fn new(classifier: &'c C, config: DispatchConfig) -> Self {
        Self {
            classifier,
            config,
            progress: ProgressFanout::new(),
            observer: Arc::new(TracingObserver),
        }
    }

    /// Register a progress sink.
    pub fn with_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.progress.push(sink);
        self
    }

    /// Replace the observer.
    pub fn with_observer(mut self, observer: Arc<dyn DispatchObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Classify every image, returning one entry per image in input order.
    ///
    /// An empty batch returns immediately without starting workers or
    /// touching the progress sinks. Otherwise every sink gets one `reset`
    /// and then exactly `images.len()` `advance` calls, even when workers
    /// fault. `Err` is reserved for contract violations.
    pub fn classify_batch(
        &self,
        images: &[C::Input],
    ) -> Result<ResultBatch<C::Output>, DispatchError> {
        let jobs = images.len();
        if jobs == 0 {
            return Ok(ResultBatch::empty());
        }

        let start = Instant::now();
        let budget = self.config.parallelism_budget();
        let workers = worker_count(jobs, budget);
        let assignments = partition(jobs, workers)?;
        let hint = thread_hint(budget, workers, jobs);

        let slots = ResultSlots::new(jobs);
        let processed: Vec<AtomicUsize> = (0..workers).map(|_| AtomicUsize::new(0)).collect();

        self.observer.batch_started(jobs, workers, hint);
        self.progress.reset(
            jobs,
            &format!("Processing {} image(s) in {} thread(s)", jobs, workers),
        );

        let exits: Vec<WorkerExit> = thread::scope(|scope| {
            let handles: Vec<_> = assignments
                .iter()
                .zip(&processed)
                .map(|(&assignment, processed)| {
                    let worker = Worker {
                        assignment,
                        classifier: self.classifier,
                        images,
                        slots: &slots,
                        progress: &self.progress,
                        observer: self.observer.as_ref(),
                        processed,
                        probability_maps: self.config.probability_maps,
                        thread_hint: hint,
                    };
                    thread::Builder::new()
                        .name(format!(
                            "{}-{}",
                            self.config.thread_name_prefix,
                            assignment.worker()
                        ))
                        .spawn_scoped(scope, move || worker.run())
                })
                .collect();

            handles
                .into_iter()
                .map(|spawned| match spawned {
                    Ok(handle) => match handle.join() {
                        Ok(Ok(())) => WorkerExit::Finished,
                        Ok(Err(violation)) => WorkerExit::Violation(violation),
                        Err(payload) => WorkerExit::Faulted(panic_message(payload.as_ref())),
                    },
                    Err(e) => WorkerExit::Faulted(format!("failed to spawn worker thread: {}", e)),
                })
                .collect()
        });

        let mut faults = Vec::new();
        let mut violation = None;
        for ((assignment, processed), exit) in assignments.iter().zip(&processed).zip(exits) {
            match exit {
                WorkerExit::Finished => {}
                WorkerExit::Violation(e) => {
                    violation.get_or_insert(e);
                }
                WorkerExit::Faulted(message) => {
                    let done = processed.load(Ordering::Acquire);
                    let abandoned: Vec<usize> = assignment
                        .indices()
                        .skip(done)
                        .filter(|&i| !slots.is_filled(i))
                        .collect();
                    for _ in &abandoned {
                        self.progress.advance();
                    }
                    let fault = WorkerFault {
                        worker: assignment.worker(),
                        message,
                        abandoned,
                    };
                    self.observer.worker_faulted(&fault);
                    faults.push(fault);
                }
            }
        }
        if let Some(e) = violation {
            return Err(e);
        }

        let results = slots.into_results();
        if results.len() != jobs {
            return Err(DispatchError::ResultSizeMismatch {
                expected: jobs,
                actual: results.len(),
            });
        }

        let succeeded = results.iter().filter(|r| r.is_some()).count();
        let stats = DispatchStats {
            jobs,
            workers,
            thread_hint: hint,
            succeeded,
            failed: jobs - succeeded,
            faulted_workers: faults.len(),
            elapsed_ms: start.elapsed().as_millis() as u64,
        };
        self.observer.batch_finished(&stats);

        Ok(ResultBatch::new(results, faults, stats))
    }

    /// Classify one image through the same machinery as a batch of one.
    pub fn classify_single(&self, image: &C::Input) -> Result<Option<C::Output>, DispatchError> {
        let batch = self.classify_batch(std::slice::from_ref(image))?;
        Ok(batch.into_results().pop().flatten())
    }
}

/// How a worker thread ended.
enum WorkerExit {
    Finished,
    Violation(DispatchError),
    Faulted(String),
}

/// Everything one worker needs, borrowed from the dispatch call.
struct Worker<'s, C: Classifier> {
    assignment: WorkerAssignment,
    classifier: &'s C,
    images: &'s [C::Input],
    slots: &'s ResultSlots<C::Output>,
    progress: &'s ProgressFanout,
    observer: &'s dyn DispatchObserver,
    processed: &'s AtomicUsize,
    probability_maps: bool,
    thread_hint: usize,
}

impl<C: Classifier> Worker<'_, C> {
    fn run(self) -> Result<(), DispatchError> {
        let worker = self.assignment.worker();
        for index in self.assignment.indices() {
            let request = ClassifyRequest {
                index,
                probability_maps: self.probability_maps,
                thread_hint: self.thread_hint,
            };

            let outcome = self.classifier.classify(&self.images[index], &request);
            let failure = match outcome {
                Ok(result) => {
                    self.slots.fill(index, result)?;
                    None
                }
                Err(e) => Some(e),
            };

            // Counted before any hook runs, so a panicking hook never
            // reports this index as abandoned.
            self.processed.fetch_add(1, Ordering::Release);
            self.progress.advance();

            match failure {
                None => self.observer.job_finished(index, worker),
                Some(e) => self.observer.job_failed(index, worker, &e),
            }
        }
        Ok(())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{classifier_fn, ProgressCounter};
    use crate::error::ClassifyError;
    use std::sync::Mutex;

    fn config(parallelism: usize) -> DispatchConfig {
        DispatchConfig {
            parallelism,
            ..DispatchConfig::default()
        }
    }

    #[test]
    fn test_identity_preserves_order() {
        let identity = classifier_fn(|x: &u32, _: &ClassifyRequest| Ok(*x));
        let images: Vec<u32> = (0..5).collect();

        let batch = Dispatcher::new(&identity, config(2))
            .classify_batch(&images)
            .unwrap();

        assert_eq!(batch.stats().workers, 2);
        assert_eq!(batch.into_results(), (0..5).map(Some).collect::<Vec<_>>());
    }

    #[test]
    fn test_workers_follow_stripes() {
        let seen = Mutex::new(Vec::new());
        let recorder = classifier_fn(|x: &usize, _: &ClassifyRequest| {
            let name = thread::current().name().unwrap_or_default().to_string();
            seen.lock().unwrap().push((name, *x));
            Ok(())
        });
        let images: Vec<usize> = (0..5).collect();

        Dispatcher::new(&recorder, config(2))
            .classify_batch(&images)
            .unwrap();

        let seen = seen.into_inner().unwrap();
        let on = |name: &str| -> Vec<usize> {
            seen.iter()
                .filter(|(n, _)| n == name)
                .map(|(_, i)| *i)
                .collect()
        };
        assert_eq!(on("tessera-worker-0"), vec![0, 2, 4]);
        assert_eq!(on("tessera-worker-1"), vec![1, 3]);
    }

    #[test]
    fn test_empty_batch_touches_nothing() {
        let calls = AtomicUsize::new(0);
        let counting = classifier_fn(|_: &u8, _: &ClassifyRequest| {
            calls.fetch_add(1, Ordering::Relaxed);
            Ok(0u8)
        });
        let counter = Arc::new(ProgressCounter::new());

        let batch = Dispatcher::new(&counting, config(4))
            .with_sink(counter.clone())
            .classify_batch(&[])
            .unwrap();

        assert!(batch.is_empty());
        assert_eq!(calls.load(Ordering::Relaxed), 0);
        assert_eq!(counter.resets(), 0);
        assert_eq!(counter.advanced(), 0);
    }

    #[test]
    fn test_failure_is_isolated() {
        let flaky = classifier_fn(|x: &i32, req: &ClassifyRequest| {
            if req.index == 1 {
                Err(ClassifyError::Unsupported("bad slice".into()))
            } else {
                Ok(x * 10)
            }
        });

        let batch = Dispatcher::new(&flaky, config(3))
            .classify_batch(&[1, 2, 3])
            .unwrap();

        assert_eq!(batch.results(), &[Some(10), None, Some(30)]);
        assert_eq!(batch.failed_indices(), vec![1]);
        assert!(batch.faults().is_empty());
        assert_eq!(batch.stats().failed, 1);
    }

    #[test]
    fn test_classify_single() {
        let negate = classifier_fn(|x: &i64, _: &ClassifyRequest| Ok(-x));
        let dispatcher = Dispatcher::new(&negate, config(8));
        assert_eq!(dispatcher.classify_single(&7).unwrap(), Some(-7));

        let refuse = classifier_fn(|_: &i64, _: &ClassifyRequest| {
            Err::<i64, _>(ClassifyError::Internal("nope".into()))
        });
        let dispatcher = Dispatcher::new(&refuse, config(8));
        assert_eq!(dispatcher.classify_single(&7).unwrap(), None);
    }

    #[test]
    fn test_request_carries_mode_and_hint() {
        let echo = classifier_fn(|_: &(), req: &ClassifyRequest| Ok(*req));
        let cfg = DispatchConfig {
            parallelism: 8,
            probability_maps: true,
            ..DispatchConfig::default()
        };

        let batch = Dispatcher::new(&echo, cfg).classify_batch(&[(), ()]).unwrap();

        for (i, req) in batch.iter().enumerate() {
            let req = req.unwrap();
            assert_eq!(req.index, i);
            assert!(req.probability_maps);
            assert_eq!(req.thread_hint, 4);
        }
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
        let payload: Box<dyn Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(payload.as_ref()), "worker panicked");
    }
}
