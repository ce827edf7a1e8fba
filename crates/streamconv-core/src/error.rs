/// An error type for the external memory and address sequencing.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    /// The medium reported an exception while reading the address.
    #[error("Memory fault while reading address {addr:#010x}")]
    Fault {
        /// The faulting address.
        addr: u32,
    },

    /// A stream was advanced past the number of words it owns.
    #[error("Address sequence exhausted after {limit} words")]
    SequenceExhausted {
        /// The number of words the stream was allowed to consume.
        limit: usize,
    },

    /// A cursor was rewound past its origin.
    #[error("Cannot rewind a cursor that has not been advanced")]
    RewindUnderflow,

    /// The address is not a multiple of the word stride.
    #[error("Address {addr:#010x} is not aligned to the word stride ({stride})")]
    Misaligned {
        /// The misaligned address.
        addr: u32,
        /// The expected stride in bytes.
        stride: u32,
    },
}
