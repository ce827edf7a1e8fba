use streamconv_core::MemoryError;
use streamconv_kernel::KernelError;

/// An error type for the convolution engine.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The configuration cannot describe a valid pass.
    #[error("Invalid engine configuration: {0}")]
    InvalidConfig(String),

    /// Error related to the external memory.
    #[error(transparent)]
    Memory(#[from] MemoryError),

    /// Error related to the kernel evaluation.
    #[error(transparent)]
    Kernel(#[from] KernelError),
}
