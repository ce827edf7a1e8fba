use crate::{error::MemoryError, WORD_STRIDE};

/// A monotonically advancing byte offset for one direction of streaming I/O.
///
/// The first call to [`AddressCursor::next`] returns offset 0, every following call
/// returns the previous offset plus the stride. No bounds are enforced here; the
/// owner of the cursor knows how many words the stream holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressCursor {
    // next offset to hand out
    offset: u32,
    stride: u32,
}

impl AddressCursor {
    /// Create a cursor advancing by `stride` bytes per word.
    pub fn new(stride: u32) -> Self {
        Self { offset: 0, stride }
    }

    /// Return the next unused offset and advance by one stride.
    pub fn next(&mut self) -> u32 {
        let offset = self.offset;
        self.offset = self.offset.wrapping_add(self.stride);
        offset
    }

    /// Move the cursor back by one stride so the last offset is handed out again.
    pub fn rewind(&mut self) -> Result<(), MemoryError> {
        if self.offset < self.stride {
            return Err(MemoryError::RewindUnderflow);
        }
        self.offset -= self.stride;
        Ok(())
    }

    /// Number of words handed out so far.
    pub fn consumed(&self) -> usize {
        if self.stride == 0 {
            return 0;
        }
        (self.offset / self.stride) as usize
    }

    /// The offset that the next call to [`AddressCursor::next`] will return.
    pub fn peek(&self) -> u32 {
        self.offset
    }

    /// The stride in bytes.
    pub fn stride(&self) -> u32 {
        self.stride
    }
}

impl Default for AddressCursor {
    fn default() -> Self {
        Self::new(WORD_STRIDE)
    }
}

/// Two independent cursors, one for the read stream and one for the write stream.
///
/// The write stream trails the read stream by roughly one image row, so the two
/// advance independently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressSequencer {
    read: AddressCursor,
    write: AddressCursor,
}

impl AddressSequencer {
    /// Create a sequencer whose cursors both advance by `stride` bytes.
    pub fn new(stride: u32) -> Self {
        Self {
            read: AddressCursor::new(stride),
            write: AddressCursor::new(stride),
        }
    }

    /// Next offset of the read stream.
    pub fn next_read(&mut self) -> u32 {
        self.read.next()
    }

    /// Next offset of the write stream.
    pub fn next_write(&mut self) -> u32 {
        self.write.next()
    }

    /// Step the read stream back by one word.
    pub fn rewind_read(&mut self) -> Result<(), MemoryError> {
        self.read.rewind()
    }

    /// Step the write stream back by one word.
    pub fn rewind_write(&mut self) -> Result<(), MemoryError> {
        self.write.rewind()
    }

    /// The read cursor.
    pub fn read_cursor(&self) -> &AddressCursor {
        &self.read
    }

    /// The write cursor.
    pub fn write_cursor(&self) -> &AddressCursor {
        &self.write
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_advances_by_stride() {
        let mut cursor = AddressCursor::default();
        let offsets = (0..4).map(|_| cursor.next()).collect::<Vec<_>>();
        assert_eq!(offsets, vec![0, 4, 8, 12]);
        assert_eq!(cursor.consumed(), 4);
        assert_eq!(cursor.peek(), 16);
    }

    #[test]
    fn cursor_rewind() -> Result<(), MemoryError> {
        let mut cursor = AddressCursor::new(2);
        assert_eq!(cursor.stride(), 2);
        assert_eq!(cursor.rewind(), Err(MemoryError::RewindUnderflow));

        cursor.next();
        let offset = cursor.next();
        cursor.rewind()?;
        assert_eq!(cursor.next(), offset);
        assert_eq!(cursor.consumed(), 2);
        Ok(())
    }

    #[test]
    fn sequencer_streams_are_independent() -> Result<(), MemoryError> {
        let mut seq = AddressSequencer::new(4);
        assert_eq!(seq.next_read(), 0);
        assert_eq!(seq.next_read(), 4);
        assert_eq!(seq.next_read(), 8);
        assert_eq!(seq.next_write(), 0);

        seq.rewind_read()?;
        assert_eq!(seq.next_read(), 8);
        assert_eq!(seq.next_write(), 4);

        seq.rewind_write()?;
        seq.rewind_write()?;
        assert_eq!(seq.rewind_write(), Err(MemoryError::RewindUnderflow));
        assert_eq!(seq.read_cursor().consumed(), 3);
        assert_eq!(seq.write_cursor().consumed(), 0);
        Ok(())
    }
}
