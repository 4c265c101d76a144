// # Window Reader
//
// Read side of the shared window. The reader never copies: every slice it returns borrows from the
// window with the window's lifetime, so decoded records can point straight into the mapped page.

use crate::{align_up, check_span, WindowError};

/// Cursor over an immutable view of a shared window.
#[derive(Debug, Clone)]
pub struct WindowReader<'w> {
    buf: &'w [u8],
    pos: usize,
}

impl<'w> WindowReader<'w> {
    /// Creates a reader positioned at the start of `buf`.
    pub fn new(buf: &'w [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Total number of bytes in the window.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Current cursor offset from the start of the window.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left between the cursor and the end of the window.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    /// Returns `true` once the cursor sits exactly at the end of the window.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.buf.len()
    }

    /// Returns the next `len` bytes and advances past them.
    ///
    /// On error the cursor does not move.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'w [u8], WindowError> {
        let end = check_span(self.pos, len, self.buf.len())?;
        let bytes = self.buf.get(self.pos..end).ok_or(WindowError::OutOfBounds {
            position: self.pos,
            requested: len,
            capacity: self.buf.len(),
        })?;
        self.pos = end;
        Ok(bytes)
    }

    /// Returns the next `len` bytes without advancing.
    pub fn peek_bytes(&self, len: usize) -> Result<&'w [u8], WindowError> {
        let end = check_span(self.pos, len, self.buf.len())?;
        self.buf.get(self.pos..end).ok_or(WindowError::OutOfBounds {
            position: self.pos,
            requested: len,
            capacity: self.buf.len(),
        })
    }

    /// Reads one byte.
    pub fn read_u8(&mut self) -> Result<u8, WindowError> {
        let bytes = self.read_bytes(1)?;
        Ok(bytes[0])
    }

    /// Reads a little-endian `u16`.
    pub fn read_u16_le(&mut self) -> Result<u16, WindowError> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    /// Reads a little-endian `u32`.
    pub fn read_u32_le(&mut self) -> Result<u32, WindowError> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Advances the cursor by `len` bytes.
    pub fn skip(&mut self, len: usize) -> Result<(), WindowError> {
        self.pos = check_span(self.pos, len, self.buf.len())?;
        Ok(())
    }

    /// Advances the cursor to the next multiple of `align`.
    ///
    /// Fails without moving if the padding would run past the end of the window.
    pub fn skip_to_alignment(&mut self, align: usize) -> Result<(), WindowError> {
        let target = align_up(self.pos, align).ok_or(WindowError::OutOfBounds {
            position: self.pos,
            requested: align,
            capacity: self.buf.len(),
        })?;
        self.skip(target - self.pos)
    }

    /// Bytes from the cursor to the end of the window, without advancing.
    pub fn rest(&self) -> &'w [u8] {
        self.buf.get(self.pos..).unwrap_or(&[])
    }
}
