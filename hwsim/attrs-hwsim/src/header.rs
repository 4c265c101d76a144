//! # Message Header
//!
//! Every hwsim message in the shared window starts with a 4-byte header:
//!
//! - `cmd`: an `8`-bit [`crate::HwsimCmd`] id.
//! - `version`: an `8`-bit family version, [`HWSIM_GENL_VERSION`] for messages this crate writes.
//! - `attrs_len`: a `16`-bit little-endian length of the attribute block that follows, excluding
//!   the header itself.

use window_hwsim::{WindowReader, WindowWriter};

use crate::Error;

/// Family version written into outgoing headers.
pub const HWSIM_GENL_VERSION: u8 = 1;

/// Header preceding the attribute block of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader {
    pub cmd: u8,
    pub version: u8,
    pub attrs_len: u16,
}

impl MessageHeader {
    pub const SIZE: usize = 4;

    pub fn new(cmd: u8, attrs_len: u16) -> Self {
        Self {
            cmd,
            version: HWSIM_GENL_VERSION,
            attrs_len,
        }
    }

    /// Reads a header from the start of `bytes`. Trailing bytes are ignored.
    #[inline]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() < Self::SIZE {
            return Err(Error::HeaderTooShort(bytes.len()));
        }
        let mut reader = WindowReader::new(bytes);
        Ok(Self {
            cmd: reader.read_u8()?,
            version: reader.read_u8()?,
            attrs_len: reader.read_u16_le()?,
        })
    }

    /// Writes the header at the writer's cursor.
    pub fn write(&self, writer: &mut WindowWriter<'_>) -> Result<(), Error> {
        writer.write_u8(self.cmd)?;
        writer.write_u8(self.version)?;
        writer.write_u16_le(self.attrs_len)?;
        Ok(())
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let len = self.attrs_len.to_le_bytes();
        [self.cmd, self.version, len[0], len[1]]
    }

    /// Total message length, header included.
    #[inline]
    pub fn message_len(&self) -> usize {
        Self::SIZE + self.attrs_len as usize
    }
}
