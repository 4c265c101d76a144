//! # `tlv_hwsim`
//!
//! Turns a raw shared memory window into a validated table of typed attributes, and back.
//!
//! The window is written by a peer in another address space, so its contents are treated as
//! hostile: every record is bounds-checked through [`window_hwsim::WindowReader`], checked against
//! a static [`PolicyTable`], and rejected as a whole on the first structural error. No partially
//! decoded table is ever returned.
//!
//! ## Wire Format
//!
//! A window is a sequence of records, each aligned to [`TLV_ALIGNTO`] bytes:
//!
//! | Field | Size | Description |
//! |-------|------|-------------|
//! | `type` | `U16` (LE) | Attribute type, looked up in the policy table. |
//! | `length` | `U16` (LE) | Payload length in bytes, header excluded. |
//! | `payload` | `length` bytes | Attribute value, integers little-endian. |
//! | padding | 0-3 bytes | Zeros up to the next 4-byte boundary. |
//!
//! The header is [`TLV_HEADER_SIZE`] bytes. Decoder and encoder share this layout.
//!
//! ## Validation Modes
//!
//! - [`ValidationMode::Strict`]: unknown attribute types and duplicate non-repeatable attributes
//!   abort the parse.
//! - [`ValidationMode::Liberal`]: unknown types are skipped and a later duplicate overwrites the
//!   earlier value.
//!
//! Structural errors ([`DecodeError::Truncated`], [`DecodeError::LengthOverflow`],
//! [`DecodeError::Misaligned`]) and length policy violations are fatal in both modes. Which mode a
//! caller uses is decided by [`select_mode`] from the operation that produced the window.
//!
//! ## Usage
//!
//! ```
//! use tlv_hwsim::{decode, AttrValue, AttributeKind, AttributePolicy, PolicyTable, ValidationMode};
//!
//! static ENTRIES: [Option<AttributePolicy<'static>>; 2] =
//!     [None, Some(AttributePolicy::new(AttributeKind::U32))];
//! static POLICY: PolicyTable<'static> = PolicyTable::new(&ENTRIES);
//!
//! let window = [0x01, 0x00, 0x04, 0x00, 0x2a, 0x00, 0x00, 0x00];
//! let table = decode(&window, &POLICY, ValidationMode::Strict).unwrap();
//! assert_eq!(table.get(1), Some(&AttrValue::U32(42)));
//! ```
//!
//! ## Build Options
//!
//! - `tracing`: emits `trace`/`debug` events for skipped, overwritten and rejected records.

#![no_std]
#![forbid(unsafe_code)]

extern crate alloc;

mod decode;
mod encode;
mod error;
mod iter;
mod mode;
mod policy;
mod record;
mod table;
mod value;

pub use decode::decode;
pub use encode::{encode, encode_into, encoded_len};
pub use error::{DecodeError, EncodeError};
pub use iter::RawRecords;
pub use mode::{select_mode, OperationContext, OperationFlags, Origin, ValidationMode};
pub use policy::{AttributeKind, AttributePolicy, PolicyTable};
pub use record::RawRecord;
pub use table::AttributeTable;
pub use value::AttrValue;

/// Attribute type identifier as carried in the record header.
pub type AttributeType = u16;

/// TLV header size in bytes (2 bytes type + 2 bytes length).
pub const TLV_HEADER_SIZE: usize = 4;

/// Records start on multiples of this many bytes.
pub const TLV_ALIGNTO: usize = 4;

/// Deepest level of nested tables the decoder and encoder will follow.
pub const MAX_NESTING_DEPTH: usize = 10;
