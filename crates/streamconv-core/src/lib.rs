#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Sequential read and write address generation.
pub mod address;

/// Error types for the memory module.
pub mod error;

/// The external memory port abstraction and fault policies.
pub mod port;

/// In-process external memory model.
pub mod ram;

/// Image size representation.
pub mod size;

pub use crate::address::{AddressCursor, AddressSequencer};
pub use crate::error::MemoryError;
pub use crate::port::{ExternalMemoryPort, FaultPolicy};
pub use crate::ram::{Access, AccessKind, ExternalRam};
pub use crate::size::ImageSize;

/// The atomic unit of external memory traffic.
pub type Word = u32;

/// Distance in bytes between two consecutive words.
pub const WORD_STRIDE: u32 = 4;
