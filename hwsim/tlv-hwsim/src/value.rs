//! Decoded attribute values.

use alloc::{
    borrow::Cow,
    string::{String, ToString},
    vec::Vec,
};

use crate::AttributeTable;

/// Value of one attribute.
///
/// Decoding borrows strings and byte strings from the window; values built by application code
/// are usually owned. [`AttrValue::into_owned`] detaches a decoded value from the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue<'w> {
    Flag,
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    S8(i8),
    S16(i16),
    S32(i32),
    S64(i64),
    /// Variable width unsigned integer (4 or 8 bytes on the wire).
    Unsigned(u64),
    /// Variable width signed integer (4 or 8 bytes on the wire).
    Signed(i64),
    Str(Cow<'w, str>),
    Bytes(Cow<'w, [u8]>),
    Nested(AttributeTable<'w>),
    /// Every occurrence of a repeatable attribute, in wire order.
    List(Vec<AttrValue<'w>>),
}

impl<'w> AttrValue<'w> {
    /// Copies any borrowed data so the value no longer depends on the window.
    pub fn into_owned(self) -> AttrValue<'static> {
        match self {
            AttrValue::Flag => AttrValue::Flag,
            AttrValue::U8(v) => AttrValue::U8(v),
            AttrValue::U16(v) => AttrValue::U16(v),
            AttrValue::U32(v) => AttrValue::U32(v),
            AttrValue::U64(v) => AttrValue::U64(v),
            AttrValue::S8(v) => AttrValue::S8(v),
            AttrValue::S16(v) => AttrValue::S16(v),
            AttrValue::S32(v) => AttrValue::S32(v),
            AttrValue::S64(v) => AttrValue::S64(v),
            AttrValue::Unsigned(v) => AttrValue::Unsigned(v),
            AttrValue::Signed(v) => AttrValue::Signed(v),
            AttrValue::Str(s) => AttrValue::Str(Cow::Owned(s.into_owned())),
            AttrValue::Bytes(b) => AttrValue::Bytes(Cow::Owned(b.into_owned())),
            AttrValue::Nested(t) => AttrValue::Nested(t.into_owned()),
            AttrValue::List(l) => {
                AttrValue::List(l.into_iter().map(AttrValue::into_owned).collect())
            }
        }
    }

    /// Any unsigned integer variant widened to `u64`.
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            AttrValue::U8(v) => Some(v as u64),
            AttrValue::U16(v) => Some(v as u64),
            AttrValue::U32(v) => Some(v as u64),
            AttrValue::U64(v) | AttrValue::Unsigned(v) => Some(v),
            _ => None,
        }
    }

    /// Any signed integer variant widened to `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            AttrValue::S8(v) => Some(v as i64),
            AttrValue::S16(v) => Some(v as i64),
            AttrValue::S32(v) => Some(v as i64),
            AttrValue::S64(v) | AttrValue::Signed(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            AttrValue::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_nested(&self) -> Option<&AttributeTable<'w>> {
        match self {
            AttrValue::Nested(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[AttrValue<'w>]> {
        match self {
            AttrValue::List(l) => Some(l),
            _ => None,
        }
    }
}

macro_rules! impl_from_int {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for AttrValue<'_> {
                fn from(v: $ty) -> Self {
                    AttrValue::$variant(v)
                }
            }
        )*
    };
}

impl_from_int!(
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    i8 => S8,
    i16 => S16,
    i32 => S32,
    i64 => S64,
);

impl<'w> From<&'w str> for AttrValue<'w> {
    fn from(s: &'w str) -> Self {
        AttrValue::Str(Cow::Borrowed(s))
    }
}

impl From<String> for AttrValue<'_> {
    fn from(s: String) -> Self {
        AttrValue::Str(Cow::Owned(s))
    }
}

impl<'w> From<&'w [u8]> for AttrValue<'w> {
    fn from(b: &'w [u8]) -> Self {
        AttrValue::Bytes(Cow::Borrowed(b))
    }
}

impl From<Vec<u8>> for AttrValue<'_> {
    fn from(b: Vec<u8>) -> Self {
        AttrValue::Bytes(Cow::Owned(b))
    }
}

impl<'w> From<AttributeTable<'w>> for AttrValue<'w> {
    fn from(t: AttributeTable<'w>) -> Self {
        AttrValue::Nested(t)
    }
}

impl<'w> From<Vec<AttrValue<'w>>> for AttrValue<'w> {
    fn from(l: Vec<AttrValue<'w>>) -> Self {
        AttrValue::List(l)
    }
}

impl core::fmt::Display for AttrValue<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AttrValue::Flag => write!(f, "flag"),
            AttrValue::Str(s) => write!(f, "{:?}", s),
            AttrValue::Bytes(b) => {
                write!(f, "0x")?;
                for byte in b.iter() {
                    write!(f, "{:02x}", byte)?;
                }
                Ok(())
            }
            AttrValue::Nested(t) => write!(f, "{{{} attrs}}", t.len()),
            AttrValue::List(l) => {
                let items: Vec<String> = l.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", items.join(", "))
            }
            other => match (other.as_u64(), other.as_i64()) {
                (Some(v), _) => write!(f, "{}", v),
                (_, Some(v)) => write!(f, "{}", v),
                _ => Ok(()),
            },
        }
    }
}
