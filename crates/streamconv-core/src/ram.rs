use std::collections::HashMap;

use crate::{error::MemoryError, port::ExternalMemoryPort, Word, WORD_STRIDE};

/// Direction of a memory access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    /// A word was read.
    Read,
    /// A word was written.
    Write,
}

/// One access issued against an [`ExternalRam`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Access {
    /// Direction of the access.
    pub kind: AccessKind,
    /// Physical byte address.
    pub addr: u32,
}

/// A linear block of words mapped at a base address.
///
/// Addresses outside `[base, base + len * stride)` fault on read and are dropped on
/// write. Individual addresses can be made to fault, either permanently or for a
/// number of reads, to exercise the fault paths of a reader. Every access is
/// recorded in issue order.
#[derive(Debug, Clone)]
pub struct ExternalRam {
    base: u32,
    stride: u32,
    words: Vec<Word>,
    // remaining faulting reads per address, `None` means always
    faults: HashMap<u32, Option<usize>>,
    accesses: Vec<Access>,
    dropped_writes: usize,
}

impl ExternalRam {
    /// Create a zero-initialized memory of `len` words mapped at `base`.
    pub fn new(base: u32, len: usize) -> Self {
        Self::from_words(base, vec![0; len])
    }

    /// Create a memory mapped at `base` holding `words`.
    pub fn from_words(base: u32, words: Vec<Word>) -> Self {
        Self {
            base,
            stride: WORD_STRIDE,
            words,
            faults: HashMap::new(),
            accesses: Vec::new(),
            dropped_writes: 0,
        }
    }

    /// Use a word stride other than [`WORD_STRIDE`].
    pub fn with_stride(mut self, stride: u32) -> Self {
        self.stride = stride;
        self
    }

    /// Base address of the memory.
    pub fn base(&self) -> u32 {
        self.base
    }

    /// Number of words held by the memory.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the memory holds no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Copy `data` into memory starting at `addr` without recording accesses.
    pub fn load(&mut self, addr: u32, data: &[Word]) -> Result<(), MemoryError> {
        let start = self.index_of(addr)?;
        let end = start + data.len();
        if end > self.words.len() {
            return Err(MemoryError::Fault {
                addr: self.addr_of(self.words.len()),
            });
        }
        self.words[start..end].copy_from_slice(data);
        Ok(())
    }

    /// Copy `len` words starting at `addr` out of memory without recording accesses.
    pub fn dump(&self, addr: u32, len: usize) -> Result<Vec<Word>, MemoryError> {
        let start = self.index_of(addr)?;
        let end = start + len;
        if end > self.words.len() {
            return Err(MemoryError::Fault {
                addr: self.addr_of(self.words.len()),
            });
        }
        Ok(self.words[start..end].to_vec())
    }

    /// Make every read of `addr` fault.
    pub fn inject_fault(&mut self, addr: u32) {
        self.faults.insert(addr, None);
    }

    /// Make the next `times` reads of `addr` fault.
    pub fn inject_transient_fault(&mut self, addr: u32, times: usize) {
        self.faults.insert(addr, Some(times));
    }

    /// Remove all injected faults.
    pub fn clear_faults(&mut self) {
        self.faults.clear();
    }

    /// All accesses issued so far, in issue order.
    pub fn accesses(&self) -> &[Access] {
        &self.accesses
    }

    /// Addresses of the accesses of one kind, in issue order.
    pub fn addresses(&self, kind: AccessKind) -> Vec<u32> {
        self.accesses
            .iter()
            .filter(|access| access.kind == kind)
            .map(|access| access.addr)
            .collect()
    }

    /// Forget the recorded accesses.
    pub fn clear_accesses(&mut self) {
        self.accesses.clear();
    }

    /// Number of writes that targeted an unmapped address.
    pub fn dropped_writes(&self) -> usize {
        self.dropped_writes
    }

    fn addr_of(&self, index: usize) -> u32 {
        self.base
            .wrapping_add((index as u32).wrapping_mul(self.stride))
    }

    fn index_of(&self, addr: u32) -> Result<usize, MemoryError> {
        let offset = addr
            .checked_sub(self.base)
            .ok_or(MemoryError::Fault { addr })?;
        if offset % self.stride != 0 {
            return Err(MemoryError::Misaligned {
                addr,
                stride: self.stride,
            });
        }
        let index = (offset / self.stride) as usize;
        if index >= self.words.len() {
            return Err(MemoryError::Fault { addr });
        }
        Ok(index)
    }

    fn take_injected_fault(&mut self, addr: u32) -> bool {
        match self.faults.get_mut(&addr) {
            Some(None) => true,
            Some(Some(0)) => {
                self.faults.remove(&addr);
                false
            }
            Some(Some(remaining)) => {
                *remaining -= 1;
                true
            }
            None => false,
        }
    }
}

impl ExternalMemoryPort for ExternalRam {
    fn read(&mut self, addr: u32) -> Result<Word, MemoryError> {
        self.accesses.push(Access {
            kind: AccessKind::Read,
            addr,
        });
        if self.take_injected_fault(addr) {
            return Err(MemoryError::Fault { addr });
        }
        let word = self.words[self.index_of(addr)?];
        log::trace!("read {addr:#010x} -> {word:#010x}");
        Ok(word)
    }

    fn write(&mut self, addr: u32, word: Word) {
        self.accesses.push(Access {
            kind: AccessKind::Write,
            addr,
        });
        match self.index_of(addr) {
            Ok(index) => {
                log::trace!("write {addr:#010x} <- {word:#010x}");
                self.words[index] = word;
            }
            Err(err) => {
                log::warn!("dropping write of {word:#010x}: {err}");
                self.dropped_writes += 1;
            }
        }
    }
}
