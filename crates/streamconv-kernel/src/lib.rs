#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Push/pull accelerator interface and its software model.
pub mod accelerator;

/// Error types for the kernel module.
pub mod error;

/// Kernel evaluation backends.
pub mod evaluator;

/// Kernel weights.
pub mod weights;

/// The 3x3 neighborhood fed to one evaluation.
pub mod window;

pub use crate::accelerator::{AcceleratedKernel, Accelerator, EmulatedAccelerator};
pub use crate::error::KernelError;
pub use crate::evaluator::{KernelBackend, KernelEvaluator, LocalKernel};
pub use crate::weights::{KernelWeights, ACCELERATOR_WEIGHT_RANGE};
pub use crate::window::Window;
