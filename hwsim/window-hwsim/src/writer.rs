// # Window Writer
//
// Write side of the shared window. Writes are all-or-nothing per call: if the bytes do not fit
// between the cursor and the window capacity nothing is copied and the cursor stays put.

use crate::{align_up, check_span, WindowError};

/// Cursor over a mutable, fixed-capacity window.
#[derive(Debug)]
pub struct WindowWriter<'b> {
    buf: &'b mut [u8],
    pos: usize,
}

impl<'b> WindowWriter<'b> {
    /// Creates a writer positioned at the start of `buf`. The capacity is `buf.len()`.
    pub fn new(buf: &'b mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Total number of bytes in the window.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Number of bytes written so far.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left between the cursor and the end of the window.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    /// Copies all of `data` into the window at the cursor.
    pub fn write_all(&mut self, data: &[u8]) -> Result<(), WindowError> {
        let end = check_span(self.pos, data.len(), self.buf.len())?;
        let capacity = self.buf.len();
        let dst = self
            .buf
            .get_mut(self.pos..end)
            .ok_or(WindowError::OutOfBounds {
                position: self.pos,
                requested: data.len(),
                capacity,
            })?;
        dst.copy_from_slice(data);
        self.pos = end;
        Ok(())
    }

    /// Writes one byte.
    pub fn write_u8(&mut self, value: u8) -> Result<(), WindowError> {
        self.write_all(&[value])
    }

    /// Writes a little-endian `u16`.
    pub fn write_u16_le(&mut self, value: u16) -> Result<(), WindowError> {
        self.write_all(&value.to_le_bytes())
    }

    /// Writes a little-endian `u32`.
    pub fn write_u32_le(&mut self, value: u32) -> Result<(), WindowError> {
        self.write_all(&value.to_le_bytes())
    }

    /// Writes zero bytes up to the next multiple of `align`.
    pub fn pad_to_alignment(&mut self, align: usize) -> Result<(), WindowError> {
        let target = align_up(self.pos, align).ok_or(WindowError::OutOfBounds {
            position: self.pos,
            requested: align,
            capacity: self.buf.len(),
        })?;
        const ZEROS: [u8; 8] = [0; 8];
        let pad = target - self.pos;
        let mut left = pad;
        check_span(self.pos, pad, self.buf.len())?;
        while left > 0 {
            let n = left.min(ZEROS.len());
            self.write_all(&ZEROS[..n])?;
            left -= n;
        }
        Ok(())
    }

    /// Consumes the writer and returns the written prefix of the window.
    pub fn into_written(self) -> &'b [u8] {
        let pos = self.pos;
        let buf: &'b [u8] = self.buf;
        buf.get(..pos).unwrap_or(&[])
    }
}
