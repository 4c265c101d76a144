//! Single record framing.
//!
//! A [`RawRecord`] is the header of one record plus a borrowed view of its payload. Reading one
//! checks the framing only (header present, payload in bounds, padding in bounds); the policy is
//! applied later by the decoder.

use alloc::string::String;
use core::fmt::{self, Write};

use window_hwsim::WindowReader;

use crate::{AttributeType, DecodeError, TLV_ALIGNTO, TLV_HEADER_SIZE};

/// One record as laid out in the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawRecord<'w> {
    /// Attribute type from the header.
    pub attr_type: AttributeType,
    /// Payload length from the header.
    pub length: u16,
    /// Payload bytes, borrowed from the window.
    pub payload: &'w [u8],
}

impl<'w> RawRecord<'w> {
    /// Reads the record at the reader's cursor and leaves the cursor at the start of the next one.
    ///
    /// On error the cursor position is unspecified; the caller is expected to abandon the window.
    pub fn read(reader: &mut WindowReader<'w>) -> Result<Self, DecodeError> {
        if reader.remaining() < TLV_HEADER_SIZE {
            return Err(DecodeError::Truncated);
        }
        let attr_type = reader.read_u16_le().map_err(|_| DecodeError::Truncated)?;
        let length = reader.read_u16_le().map_err(|_| DecodeError::Truncated)?;

        let payload = reader
            .read_bytes(length as usize)
            .map_err(|_| DecodeError::LengthOverflow)?;

        reader
            .skip_to_alignment(TLV_ALIGNTO)
            .map_err(|_| DecodeError::Misaligned)?;

        Ok(Self {
            attr_type,
            length,
            payload,
        })
    }

    /// Bytes this record occupies in the window, header and padding included.
    #[inline]
    pub fn encoded_size(&self) -> usize {
        padded_record_len(self.payload.len())
    }
}

/// Size of a record with a `payload_len`-byte payload, header and padding included.
#[inline]
pub(crate) fn padded_record_len(payload_len: usize) -> usize {
    let unpadded = TLV_HEADER_SIZE + payload_len;
    (unpadded + TLV_ALIGNTO - 1) & !(TLV_ALIGNTO - 1)
}

impl fmt::Display for RawRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Record(type={}, len={}, value={})",
            self.attr_type,
            self.length,
            value_to_string(self.payload)
        )
    }
}

fn value_to_string(bytes: &[u8]) -> String {
    match core::str::from_utf8(bytes) {
        Ok(s) if !s.is_empty() && s.chars().all(|c| !c.is_control() || c == '\0') => {
            alloc::format!("\"{}\"", s.trim_end_matches('\0'))
        }
        _ => bytes_to_hex(bytes),
    }
}

fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut hex = String::from("0x");
    for byte in bytes {
        let _ = write!(&mut hex, "{:02x}", byte);
    }
    hex
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_read_record() {
        let window = [0x01, 0x00, 0x04, 0x00, 0x2a, 0x00, 0x00, 0x00];
        let mut reader = WindowReader::new(&window);
        let record = RawRecord::read(&mut reader).unwrap();
        assert_eq!(record.attr_type, 1);
        assert_eq!(record.length, 4);
        assert_eq!(record.payload, &[0x2a, 0, 0, 0]);
        assert_eq!(record.encoded_size(), 8);
        assert!(reader.is_exhausted());
    }

    #[test]
    fn test_payload_borrows_from_window() {
        let window = [0x07, 0x00, 0x02, 0x00, 0xaa, 0xbb, 0x00, 0x00];
        let mut reader = WindowReader::new(&window);
        let record = RawRecord::read(&mut reader).unwrap();
        assert_eq!(record.payload.as_ptr(), window[4..].as_ptr());
        assert_eq!(reader.position(), 8);
    }

    #[test]
    fn test_structural_errors() {
        let mut reader = WindowReader::new(&[0x01, 0x00, 0x04]);
        assert_eq!(RawRecord::read(&mut reader), Err(DecodeError::Truncated));

        let mut reader = WindowReader::new(&[0x01, 0x00, 0x04, 0x00]);
        assert_eq!(RawRecord::read(&mut reader), Err(DecodeError::LengthOverflow));

        // One-byte payload without its three padding bytes.
        let mut reader = WindowReader::new(&[0x01, 0x00, 0x01, 0x00, 0x2a]);
        assert_eq!(RawRecord::read(&mut reader), Err(DecodeError::Misaligned));
    }

    #[test]
    fn test_padded_record_len() {
        assert_eq!(padded_record_len(0), 4);
        assert_eq!(padded_record_len(1), 8);
        assert_eq!(padded_record_len(4), 8);
        assert_eq!(padded_record_len(5), 12);
    }

    #[test]
    fn test_display() {
        let record = RawRecord {
            attr_type: 17,
            length: 5,
            payload: b"wlan\0",
        };
        assert_eq!(record.to_string(), "Record(type=17, len=5, value=\"wlan\")");

        let record = RawRecord {
            attr_type: 1,
            length: 2,
            payload: &[0x01, 0xff],
        };
        assert_eq!(record.to_string(), "Record(type=1, len=2, value=0x01ff)");
    }
}
