use serde::{Deserialize, Serialize};

use crate::{error::MemoryError, Word};

/// A word-addressable memory that lives outside of the processing core.
///
/// Reads can fail when the medium raises an exception for an address. Writes are
/// fire-and-forget: the medium gives no acknowledgement and write faults are not
/// reported back to the caller.
pub trait ExternalMemoryPort {
    /// Read the word stored at `addr`.
    fn read(&mut self, addr: u32) -> Result<Word, MemoryError>;

    /// Store `word` at `addr`.
    fn write(&mut self, addr: u32, word: Word);
}

impl<M: ExternalMemoryPort + ?Sized> ExternalMemoryPort for &mut M {
    fn read(&mut self, addr: u32) -> Result<Word, MemoryError> {
        (**self).read(addr)
    }

    fn write(&mut self, addr: u32, word: Word) {
        (**self).write(addr, word)
    }
}

/// What a reader does with a read that faulted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaultPolicy {
    /// Replace the faulted sample with zero and keep going.
    ///
    /// Example: ...a b | fault | c d... -> ...a b 0 c d...
    #[default]
    ZeroSubstitute,

    /// Hand the fault back to the caller.
    Propagate,
}

impl FaultPolicy {
    /// Resolve the outcome of a read according to the policy.
    ///
    /// Returns `Ok(0)` for a fault under [`FaultPolicy::ZeroSubstitute`] and the
    /// fault itself under [`FaultPolicy::Propagate`].
    pub fn resolve(&self, read: Result<Word, MemoryError>) -> Result<Word, MemoryError> {
        match (self, read) {
            (_, Ok(word)) => Ok(word),
            (FaultPolicy::ZeroSubstitute, Err(MemoryError::Fault { addr })) => {
                log::warn!("substituting zero for faulted read at {addr:#010x}");
                Ok(0)
            }
            (_, Err(err)) => Err(err),
        }
    }
}
