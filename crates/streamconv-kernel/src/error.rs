/// An error type for kernel configuration and evaluation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum KernelError {
    /// A weight does not fit the representable range of the backend.
    #[error("Weight w{index} = {value} is outside the range [{min}, {max}]")]
    OutOfRange {
        /// One-based position of the weight (1 = corners, 2 = edges, 3 = center).
        index: usize,
        /// The rejected value.
        value: i32,
        /// Smallest representable weight.
        min: i32,
        /// Largest representable weight.
        max: i32,
    },

    /// A sample was pushed while a complete window was waiting to be pulled.
    #[error("Accelerator input queue is full, pull the pending result first")]
    FifoOverflow,

    /// A result was pulled before a complete window was pushed.
    #[error("Accelerator has no result, {pushed} of 9 samples pushed")]
    FifoUnderflow {
        /// Samples pushed for the current window.
        pushed: usize,
    },

    /// Samples were streamed before any weights were loaded.
    #[error("Kernel weights have not been configured")]
    NotConfigured,
}
