//! The pipe tree: lazy, pull-based dispatch of [`DataBatch`]es from a
//! pipe to its registered successors.
//!
//! Grounded on `ModelProcessingPipe`/`FormatDetectionPipe` in
//! `core/deserialization/abstract/pipeline_deserialization/pipeline.py`.
//! Python's `_process` is a generator; each produced batch is pushed
//! into every successor before the next is pulled, so a later pipe can
//! start consuming while an earlier one is still producing. Rust's
//! `?Sized` trait objects can't return `impl Iterator` portably, so
//! `process` here returns a materialized `Vec<DataBatch>` instead --
//! the tree is still pull-driven one level at a time by
//! [`PipeRunner::run`], it just doesn't additionally interleave within
//! a single pipe's own output.

use crate::builder::UmlModelBuilder;
use crate::errors::{TranslationError, TranslationResult};
use crate::pipeline::batch::DataBatch;

/// One stage in a format's processing tree.
pub trait Pipe {
    /// Whether this pipe's `process` is applicable to `batch` at all,
    /// checked before `process` is ever called.
    fn can_process(&self, batch: &DataBatch) -> bool;

    /// Consume `batch`, registering whatever canonical entities it
    /// contains with `builder`, and return the batches to hand to this
    /// pipe's successors (e.g. one batch per child XML element).
    ///
    /// Implementations that detect a structural violation (not merely
    /// "wrong format") return [`TranslationError::InvalidFormat`].
    fn process(&self, batch: DataBatch, builder: &mut UmlModelBuilder) -> TranslationResult<Vec<DataBatch>>;

    /// A short name for diagnostics and strategy registration.
    fn name(&self) -> &str;
}

/// A node in the pipe tree: a pipe plus the successors it hands its
/// output batches to, in registration order.
pub struct PipeNode {
    pipe: Box<dyn Pipe>,
    successors: Vec<PipeNode>,
}

impl PipeNode {
    /// Wrap a leaf pipe with no successors yet.
    pub fn new(pipe: Box<dyn Pipe>) -> Self {
        Self {
            pipe,
            successors: Vec::new(),
        }
    }

    /// Register `successor` to run on every batch this node produces.
    pub fn add_next(mut self, successor: PipeNode) -> Self {
        self.successors.push(successor);
        self
    }

    /// Run this node (if applicable) and recursively every successor,
    /// against `builder`.
    pub fn run(&self, batch: DataBatch, builder: &mut UmlModelBuilder) -> TranslationResult<()> {
        if !self.pipe.can_process(&batch) {
            return Ok(());
        }
        let produced = self.pipe.process(batch, builder)?;
        for next_batch in produced {
            for successor in &self.successors {
                successor.run(next_batch.clone(), builder)?;
            }
        }
        Ok(())
    }
}

impl Pipe for Box<dyn Pipe> {
    fn can_process(&self, batch: &DataBatch) -> bool {
        (**self).can_process(batch)
    }

    fn process(&self, batch: DataBatch, builder: &mut UmlModelBuilder) -> TranslationResult<Vec<DataBatch>> {
        (**self).process(batch, builder)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Wraps a [`Pipe`] to turn its fallibility into a plain boolean,
/// recovering only from [`TranslationError::UnsupportedFormat`] (the
/// one recoverable outcome -- "the latter is fatal", per the redesign
/// notes on exceptions-as-control-flow). Any other error propagates.
pub struct FormatDetectionPipe<P: Pipe> {
    inner: P,
}

impl<P: Pipe> FormatDetectionPipe<P> {
    /// Wrap a detection pipe.
    pub fn new(inner: P) -> Self {
        Self { inner }
    }

    /// Whether `batch` matches this pipe's dialect. `Ok(false)` means
    /// "not this format"; `Err` means a real failure the caller must
    /// not swallow.
    pub fn is_supported_format(
        &self,
        batch: DataBatch,
        builder: &mut UmlModelBuilder,
    ) -> TranslationResult<bool> {
        if !self.inner.can_process(&batch) {
            return Ok(false);
        }
        match self.inner.process(batch, builder) {
            Ok(_) => Ok(true),
            Err(err) if err.is_unsupported_format() => Ok(false),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    struct AlwaysUnsupported;

    impl Pipe for AlwaysUnsupported {
        fn can_process(&self, _batch: &DataBatch) -> bool {
            true
        }

        fn process(&self, _batch: DataBatch, _builder: &mut UmlModelBuilder) -> TranslationResult<Vec<DataBatch>> {
            Err(TranslationError::unsupported("root tag mismatch"))
        }

        fn name(&self) -> &str {
            "always-unsupported"
        }
    }

    struct AlwaysMalformed;

    impl Pipe for AlwaysMalformed {
        fn can_process(&self, _batch: &DataBatch) -> bool {
            true
        }

        fn process(&self, _batch: DataBatch, _builder: &mut UmlModelBuilder) -> TranslationResult<Vec<DataBatch>> {
            Err(TranslationError::invalid_format("missing xmi:id", "packagedElement"))
        }

        fn name(&self) -> &str {
            "always-malformed"
        }
    }

    #[test]
    fn test_unsupported_format_recovers_to_false() {
        let mut builder = UmlModelBuilder::new("m1");
        let detector = FormatDetectionPipe::new(AlwaysUnsupported);
        let result = detector.is_supported_format(DataBatch::new(Value::Null), &mut builder);
        assert_eq!(result.unwrap(), false);
    }

    #[test]
    fn test_invalid_format_propagates() {
        let mut builder = UmlModelBuilder::new("m1");
        let detector = FormatDetectionPipe::new(AlwaysMalformed);
        let result = detector.is_supported_format(DataBatch::new(Value::Null), &mut builder);
        assert!(result.unwrap_err().is_invalid_format());
    }
}
