use core::fmt;

use window_hwsim::WindowError;

use crate::AttributeType;

/// Errors that can occur while decoding a window into an attribute table.
///
/// Any of these aborts the whole decode: no partial table is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Fewer than a full record header's worth of bytes remain in the window.
    Truncated,

    /// A record's declared payload length runs past the end of the window.
    LengthOverflow,

    /// A known attribute's payload length is outside its policy bounds.
    ///
    /// Contains the attribute type.
    LengthPolicyViolation(AttributeType),

    /// The attribute type has no policy. Only raised in strict mode.
    UnknownType(AttributeType),

    /// A non-repeatable attribute appeared twice. Only raised in strict mode.
    DuplicateAttribute(AttributeType),

    /// The padding that aligns the next record runs past the end of the window.
    Misaligned,

    /// The payload has the right length but invalid content for its kind (bad UTF-8, a missing
    /// or embedded NUL).
    ///
    /// Contains the attribute type.
    InvalidPayload(AttributeType),

    /// Nested attributes go deeper than [`crate::MAX_NESTING_DEPTH`].
    NestingTooDeep,

    /// An attribute marked as required is absent.
    ///
    /// Contains the attribute type.
    MissingAttribute(AttributeType),
}

impl DecodeError {
    /// Returns `true` for errors about the framing of the window rather than its content.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            DecodeError::Truncated | DecodeError::LengthOverflow | DecodeError::Misaligned
        )
    }

    /// The attribute type the error refers to, if any.
    pub fn attr_type(&self) -> Option<AttributeType> {
        match self {
            DecodeError::LengthPolicyViolation(t)
            | DecodeError::UnknownType(t)
            | DecodeError::DuplicateAttribute(t)
            | DecodeError::InvalidPayload(t)
            | DecodeError::MissingAttribute(t) => Some(*t),
            _ => None,
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Truncated => write!(f, "Window ends inside a record header"),
            DecodeError::LengthOverflow => {
                write!(f, "Record payload length runs past the end of the window")
            }
            DecodeError::LengthPolicyViolation(t) => {
                write!(f, "Attribute {} has a payload length outside its policy", t)
            }
            DecodeError::UnknownType(t) => write!(f, "Unknown attribute type {}", t),
            DecodeError::DuplicateAttribute(t) => write!(f, "Duplicate attribute {}", t),
            DecodeError::Misaligned => {
                write!(f, "Record padding runs past the end of the window")
            }
            DecodeError::InvalidPayload(t) => write!(f, "Attribute {} has an invalid payload", t),
            DecodeError::NestingTooDeep => write!(f, "Nested attributes are too deep"),
            DecodeError::MissingAttribute(t) => {
                write!(f, "Required attribute {} is missing", t)
            }
        }
    }
}

/// Errors that can occur while encoding an attribute table into a window.
///
/// Encoding validates the whole table before writing, so on error the destination is untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    /// The attribute type has no policy.
    UnknownType(AttributeType),

    /// The value's encoded payload length is outside the attribute's policy bounds.
    LengthPolicyViolation(AttributeType),

    /// The value's variant does not match the attribute's policy kind.
    KindMismatch(AttributeType),

    /// The value cannot be represented on the wire (a string with an embedded NUL, an empty
    /// list, a payload longer than `u16::MAX`).
    InvalidValue(AttributeType),

    /// An attribute marked as required is absent.
    MissingAttribute(AttributeType),

    /// Nested tables go deeper than [`crate::MAX_NESTING_DEPTH`].
    NestingTooDeep,

    /// The encoded table does not fit in the window.
    CapacityExceeded { required: usize, capacity: usize },
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::UnknownType(t) => write!(f, "Unknown attribute type {}", t),
            EncodeError::LengthPolicyViolation(t) => write!(
                f,
                "Attribute {} would be encoded with a length outside its policy",
                t
            ),
            EncodeError::KindMismatch(t) => {
                write!(f, "Attribute {} value does not match its policy kind", t)
            }
            EncodeError::InvalidValue(t) => {
                write!(f, "Attribute {} value cannot be encoded", t)
            }
            EncodeError::MissingAttribute(t) => {
                write!(f, "Required attribute {} is missing", t)
            }
            EncodeError::NestingTooDeep => write!(f, "Nested attributes are too deep"),
            EncodeError::CapacityExceeded { required, capacity } => write!(
                f,
                "Encoded table needs {} bytes but the window holds {}",
                required, capacity
            ),
        }
    }
}

impl From<WindowError> for EncodeError {
    fn from(e: WindowError) -> Self {
        match e {
            WindowError::OutOfBounds {
                position,
                requested,
                capacity,
            } => EncodeError::CapacityExceeded {
                required: position.saturating_add(requested),
                capacity,
            },
        }
    }
}
