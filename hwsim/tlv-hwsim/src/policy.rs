//! Attribute policy tables.
//!
//! A [`PolicyTable`] is a read-only slice indexed by attribute type, in the same shape as a C
//! `nla_policy` array: slot `n` describes attribute type `n`, and an empty slot (or any index past
//! the end) means the type is unknown. Tables are built from `const` constructors so they can live
//! in `static`s and be shared by reference across any number of concurrent decode/encode calls.

use crate::AttributeType;

/// Expected payload kind of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind<'p> {
    /// Presence-only attribute with an empty payload.
    Flag,
    U8,
    U16,
    U32,
    U64,
    S8,
    S16,
    S32,
    S64,
    /// Unsigned integer carried in either 4 or 8 bytes.
    Unsigned,
    /// Signed integer carried in either 4 or 8 bytes.
    Signed,
    /// UTF-8 string. A single trailing NUL is tolerated on decode and never emitted on encode.
    String,
    /// UTF-8 string that must end with exactly one NUL, with no NUL before it.
    NulString,
    /// Opaque bytes.
    Binary,
    /// A table of attributes described by another policy table.
    Nested(&'p PolicyTable<'p>),
}

impl AttributeKind<'_> {
    /// Natural `(min, max)` payload length of this kind.
    pub const fn natural_len(&self) -> (u16, u16) {
        match self {
            AttributeKind::Flag => (0, 0),
            AttributeKind::U8 | AttributeKind::S8 => (1, 1),
            AttributeKind::U16 | AttributeKind::S16 => (2, 2),
            AttributeKind::U32 | AttributeKind::S32 => (4, 4),
            AttributeKind::U64 | AttributeKind::S64 => (8, 8),
            AttributeKind::Unsigned | AttributeKind::Signed => (4, 8),
            AttributeKind::NulString => (1, u16::MAX),
            AttributeKind::String | AttributeKind::Binary | AttributeKind::Nested(_) => {
                (0, u16::MAX)
            }
        }
    }
}

/// Validation rules for one attribute type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributePolicy<'p> {
    /// Payload kind.
    pub kind: AttributeKind<'p>,
    /// Smallest accepted payload length in bytes.
    pub min_length: u16,
    /// Largest accepted payload length in bytes.
    pub max_length: u16,
    /// Whether a table without this attribute is rejected.
    pub required: bool,
    /// Whether the attribute may appear more than once. Repeated values are collected into an
    /// [`crate::AttrValue::List`].
    pub repeatable: bool,
}

impl<'p> AttributePolicy<'p> {
    /// Creates an optional, non-repeatable policy with the natural length bounds of `kind`.
    pub const fn new(kind: AttributeKind<'p>) -> Self {
        let (min_length, max_length) = kind.natural_len();
        Self {
            kind,
            min_length,
            max_length,
            required: false,
            repeatable: false,
        }
    }

    /// Shorthand for a [`AttributeKind::Nested`] policy.
    pub const fn nested(table: &'p PolicyTable<'p>) -> Self {
        Self::new(AttributeKind::Nested(table))
    }

    /// Accepts payloads of exactly `len` bytes.
    pub const fn exact_len(self, len: u16) -> Self {
        self.len_range(len, len)
    }

    /// Accepts payloads of at most `len` bytes.
    pub const fn max_len(mut self, len: u16) -> Self {
        self.max_length = len;
        self
    }

    /// Accepts payloads of at least `len` bytes.
    pub const fn min_len(mut self, len: u16) -> Self {
        self.min_length = len;
        self
    }

    /// Accepts payloads between `min` and `max` bytes, inclusive.
    pub const fn len_range(mut self, min: u16, max: u16) -> Self {
        self.min_length = min;
        self.max_length = max;
        self
    }

    /// Marks the attribute as mandatory.
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Allows the attribute to appear more than once.
    pub const fn repeatable(mut self) -> Self {
        self.repeatable = true;
        self
    }

    /// Returns `true` if a payload of `len` bytes is within bounds.
    #[inline]
    pub fn accepts_length(&self, len: usize) -> bool {
        self.min_length as usize <= len && len <= self.max_length as usize
    }
}

/// Immutable mapping from attribute type to [`AttributePolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyTable<'p> {
    entries: &'p [Option<AttributePolicy<'p>>],
}

impl<'p> PolicyTable<'p> {
    /// Wraps a slice where index `n` holds the policy for attribute type `n`.
    pub const fn new(entries: &'p [Option<AttributePolicy<'p>>]) -> Self {
        Self { entries }
    }

    /// Returns the policy for `attr_type`, or `None` if the type is unknown.
    #[inline]
    pub fn lookup(&self, attr_type: AttributeType) -> Option<&AttributePolicy<'p>> {
        self.entries
            .get(attr_type as usize)
            .and_then(|entry| entry.as_ref())
    }

    /// Highest attribute type covered by the table, or `None` for an empty table.
    pub fn max_type(&self) -> Option<AttributeType> {
        self.entries
            .len()
            .checked_sub(1)
            .map(|max| max.min(AttributeType::MAX as usize) as AttributeType)
    }

    /// Attribute types marked as required, in ascending order.
    pub fn required_types(&self) -> impl Iterator<Item = AttributeType> + '_ {
        self.known_types()
            .filter(move |t| self.lookup(*t).is_some_and(|p| p.required))
    }

    /// All attribute types that have a policy, in ascending order.
    pub fn known_types(&self) -> impl Iterator<Item = AttributeType> + '_ {
        self.entries
            .iter()
            .take(AttributeType::MAX as usize + 1)
            .enumerate()
            .filter(|(_, entry)| entry.is_some())
            .map(|(t, _)| t as AttributeType)
    }
}
