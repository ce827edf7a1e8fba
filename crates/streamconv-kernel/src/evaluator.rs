use serde::{Deserialize, Serialize};
use streamconv_core::Word;

use crate::{
    accelerator::{AcceleratedKernel, EmulatedAccelerator},
    error::KernelError,
    weights::KernelWeights,
    window::Window,
};

/// Something that turns a 3x3 window into one filtered word.
///
/// Weights are loaded once with [`KernelEvaluator::configure`] before any window
/// is evaluated. A rejected configuration leaves the previous weights in effect.
pub trait KernelEvaluator {
    /// Load the kernel weights.
    fn configure(&mut self, weights: KernelWeights) -> Result<(), KernelError>;

    /// Evaluate the kernel on one window.
    fn evaluate(&mut self, window: &Window) -> Result<Word, KernelError>;

    /// Drop any partially evaluated window. Loaded weights are kept.
    fn reset(&mut self) {}
}

impl<K: KernelEvaluator + ?Sized> KernelEvaluator for Box<K> {
    fn configure(&mut self, weights: KernelWeights) -> Result<(), KernelError> {
        (**self).configure(weights)
    }

    fn evaluate(&mut self, window: &Window) -> Result<Word, KernelError> {
        (**self).evaluate(window)
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

/// Evaluates the closed-form weighted sum on the host.
#[derive(Debug, Clone, Default)]
pub struct LocalKernel {
    weights: KernelWeights,
}

impl LocalKernel {
    /// Create a local kernel with the given weights.
    pub fn new(weights: KernelWeights) -> Self {
        Self { weights }
    }

    /// The weights currently in effect.
    pub fn weights(&self) -> KernelWeights {
        self.weights
    }
}

impl KernelEvaluator for LocalKernel {
    fn configure(&mut self, weights: KernelWeights) -> Result<(), KernelError> {
        self.weights = weights;
        Ok(())
    }

    fn evaluate(&mut self, window: &Window) -> Result<Word, KernelError> {
        Ok(self.weights.apply(window))
    }
}

/// Selects where the weighted sum is computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum KernelBackend {
    /// Compute the sum on the host.
    #[default]
    Local,
    /// Delegate the sum to the push/pull accelerator.
    Accelerator,
}

impl KernelBackend {
    /// Build an unconfigured evaluator for this backend.
    ///
    /// The accelerator backend is served by the [`EmulatedAccelerator`] model.
    pub fn build(&self) -> Box<dyn KernelEvaluator> {
        match self {
            KernelBackend::Local => Box::new(LocalKernel::default()),
            KernelBackend::Accelerator => {
                Box::new(AcceleratedKernel::new(EmulatedAccelerator::new()))
            }
        }
    }
}
