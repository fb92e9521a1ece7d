//! The classifier port: the one external capability the dispatcher calls.

use std::marker::PhantomData;

use crate::error::ClassifyError;

/// Per-call parameters handed to a [`Classifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifyRequest {
    /// Position of the image in the batch (for diagnostics only)
    pub index: usize,

    /// Produce per-class probability maps instead of a label map
    pub probability_maps: bool,

    /// Threads the classifier may use internally.
    /// Derived from the parallelism budget left over after sizing the pool;
    /// always at least 1.
    pub thread_hint: usize,
}

/// A pixel classifier that turns one image into one result.
///
/// The dispatcher calls `classify` concurrently from several worker threads
/// through a shared reference and adds no locking of its own. Implementations
/// must therefore be immutable after construction or synchronize internally.
pub trait Classifier: Send + Sync {
    /// The image type accepted by this classifier.
    type Input: Sync;

    /// The result produced for one image.
    type Output: Send + Sync;

    /// Classify a single image. `Err` means "no result" for this image only.
    fn classify(
        &self,
        input: &Self::Input,
        request: &ClassifyRequest,
    ) -> Result<Self::Output, ClassifyError>;
}

/// A [`Classifier`] backed by a closure. See [`classifier_fn`].
pub struct FnClassifier<F, I, O> {
    f: F,
    _marker: PhantomData<fn(&I) -> O>,
}

/// Wrap a closure as a [`Classifier`].
///
/// ```rust
/// use tessera_core::dispatch::{classifier_fn, Classifier, ClassifyRequest};
///
/// let double = classifier_fn(|x: &u32, _req: &ClassifyRequest| Ok(x * 2));
/// let req = ClassifyRequest { index: 0, probability_maps: false, thread_hint: 1 };
/// assert_eq!(double.classify(&21, &req), Ok(42));
/// ```
pub fn classifier_fn<I, O, F>(f: F) -> FnClassifier<F, I, O>
where
    F: Fn(&I, &ClassifyRequest) -> Result<O, ClassifyError> + Send + Sync,
{
    FnClassifier {
        f,
        _marker: PhantomData,
    }
}

impl<F, I, O> Classifier for FnClassifier<F, I, O>
where
    F: Fn(&I, &ClassifyRequest) -> Result<O, ClassifyError> + Send + Sync,
    I: Sync,
    O: Send + Sync,
{
    type Input = I;
    type Output = O;

    fn classify(&self, input: &I, request: &ClassifyRequest) -> Result<O, ClassifyError> {
        (self.f)(input, request)
    }
}
