//! # Error Handling
//!
//! Errors raised while turning windows into hwsim messages and back.

use core::fmt;

use tlv_hwsim::{AttributeType, DecodeError, EncodeError};
use window_hwsim::WindowError;

use crate::header::MessageHeader;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The attribute block failed to decode.
    Decode(DecodeError),
    /// The attribute table failed to encode.
    Encode(EncodeError),
    Window(WindowError),
    /// Fewer bytes than a message header.
    HeaderTooShort(usize),
    /// The header announces more attribute bytes than the window holds.
    AttrsLenOverflow { attrs_len: usize, available: usize },
    UnknownCommand(u8),
    /// A typed view was requested for a message of another command.
    UnexpectedCommand { expected: u8, actual: u8 },
    /// A fixed-layout payload has the wrong size.
    PayloadSize { expected: usize, actual: usize },
    /// An attribute the typed view cannot do without is absent or of the wrong kind.
    MissingAttribute(AttributeType),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Error::*;
        match self {
            Decode(e) => write!(f, "Attribute decoding failed: {e}"),
            Encode(e) => write!(f, "Attribute encoding failed: {e}"),
            Window(e) => write!(f, "Window access failed: {e}"),
            HeaderTooShort(actual) => write!(
                f,
                "Unexpected header length: `{actual}`, should be at least {}",
                MessageHeader::SIZE
            ),
            AttrsLenOverflow {
                attrs_len,
                available,
            } => write!(
                f,
                "Header announces {attrs_len} attribute bytes but only {available} follow"
            ),
            UnknownCommand(cmd) => write!(f, "Unknown hwsim command `{cmd}`"),
            UnexpectedCommand { expected, actual } => {
                write!(f, "Expected command `{expected}`, received `{actual}`")
            }
            PayloadSize { expected, actual } => write!(
                f,
                "Payload is {actual} bytes, expected {expected}"
            ),
            MissingAttribute(t) => write!(f, "Attribute {t} is missing or malformed"),
        }
    }
}

impl From<DecodeError> for Error {
    fn from(e: DecodeError) -> Self {
        Error::Decode(e)
    }
}

impl From<EncodeError> for Error {
    fn from(e: EncodeError) -> Self {
        Error::Encode(e)
    }
}

impl From<WindowError> for Error {
    fn from(e: WindowError) -> Self {
        Error::Window(e)
    }
}
