//! Parallel batch classification.
//!
//! - **classifier**: the port every image is pushed through
//! - **partition**: round-robin striping of jobs onto workers
//! - **slots**: write-once result storage shared by the workers
//! - **progress**: progress sinks and fan-out
//! - **observer**: injected logging hooks
//! - **dispatcher**: pool lifecycle, worker loop and fault accounting

mod batch;
pub mod classifier;
mod dispatcher;
pub mod observer;
pub mod partition;
pub mod progress;
pub mod slots;

// Re-exports for convenient access
pub use batch::{DispatchStats, ResultBatch, WorkerFault};
pub use classifier::{classifier_fn, Classifier, ClassifyRequest, FnClassifier};
pub use dispatcher::Dispatcher;
pub use observer::{DispatchObserver, NoopObserver, TracingObserver};
pub use partition::{partition, thread_hint, worker_count, WorkerAssignment};
pub use progress::{ProgressCounter, ProgressFanout, ProgressSink};
pub use slots::ResultSlots;
