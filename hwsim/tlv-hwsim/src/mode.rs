//! Choice between strict and liberal validation.
//!
//! Windows produced by a peer are validated strictly unless the operation opted out, while
//! windows this side encoded itself are re-read liberally. The decision is a pure function of the
//! [`OperationContext`] and carries no state.

use core::ops::BitOr;

/// How unknown and duplicate attributes are treated while decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ValidationMode {
    /// Unknown types and duplicate non-repeatable attributes are errors.
    #[default]
    Strict,
    /// Unknown types are skipped and later duplicates overwrite earlier ones.
    Liberal,
}

/// Per-operation flag bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct OperationFlags(u8);

impl OperationFlags {
    /// No flags set.
    pub const NONE: Self = Self(0);

    /// The operation accepts windows that strict validation would reject.
    pub const DONT_VALIDATE_STRICT: Self = Self(1 << 0);

    /// Builds flags from raw bits. Unassigned bits are kept but carry no meaning.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns `true` if every bit of `other` is set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for OperationFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Who produced the window being decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// The other side of the shared window.
    Peer,
    /// This process, re-reading its own output.
    SelfEncoded,
}

/// Everything [`select_mode`] looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperationContext {
    pub origin: Origin,
    pub flags: OperationFlags,
}

impl OperationContext {
    /// Context for a window received from the peer.
    pub const fn peer(flags: OperationFlags) -> Self {
        Self {
            origin: Origin::Peer,
            flags,
        }
    }

    /// Context for a window this side encoded.
    pub const fn self_encoded() -> Self {
        Self {
            origin: Origin::SelfEncoded,
            flags: OperationFlags::NONE,
        }
    }
}

/// Picks the validation mode for an operation.
///
/// Self-encoded windows and operations flagged [`OperationFlags::DONT_VALIDATE_STRICT`] are
/// decoded liberally. Everything else is strict.
pub fn select_mode(ctx: &OperationContext) -> ValidationMode {
    match ctx.origin {
        Origin::SelfEncoded => ValidationMode::Liberal,
        Origin::Peer if ctx.flags.contains(OperationFlags::DONT_VALIDATE_STRICT) => {
            ValidationMode::Liberal
        }
        Origin::Peer => ValidationMode::Strict,
    }
}
