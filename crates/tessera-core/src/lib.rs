//! Tessera Core - parallel batch dispatch for pixel classifiers.
//!
//! Tessera pushes a batch of images through an external, thread-safe
//! classifier on a fixed-size pool of OS threads and hands back the results
//! in input order. One image failing never fails the batch: its entry is
//! simply absent.
//!
//! # Architecture
//!
//! ```text
//! images ─▶ partition (i % W) ─▶ W worker threads ─▶ classifier ─▶ write-once slots
//!                                      │
//!                                      └─▶ progress sinks / observer
//! ```
//!
//! # Usage
//!
//! ```rust
//! use tessera_core::config::DispatchConfig;
//! use tessera_core::dispatch::{classifier_fn, ClassifyRequest, Dispatcher};
//!
//! let square = classifier_fn(|x: &f32, _req: &ClassifyRequest| Ok(x * x));
//! let dispatcher = Dispatcher::new(&square, DispatchConfig::default());
//!
//! let batch = dispatcher.classify_batch(&[1.0, 2.0, 3.0]).unwrap();
//! assert_eq!(batch.into_results(), vec![Some(1.0), Some(4.0), Some(9.0)]);
//! ```

// Module declarations
pub mod config;
pub mod dispatch;
pub mod error;
pub mod pipeline;
pub mod plane;

// Re-exports for convenient access
pub use config::Config;
pub use dispatch::{
    Classifier, ClassifyRequest, DispatchStats, Dispatcher, ProgressSink, ResultBatch,
    WorkerFault,
};
pub use error::{
    ClassifyError, ConfigError, DispatchError, PipelineError, PipelineResult, Result,
    TesseraError,
};
pub use pipeline::{DiscoveredFile, FileDiscovery};
pub use plane::{Image, Plane, ThresholdClassifier};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
