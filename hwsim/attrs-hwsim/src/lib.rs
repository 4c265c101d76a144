//! # `attrs_hwsim`
//!
//! The mac80211_hwsim attribute family on top of [`tlv_hwsim`].
//!
//! The core codec knows nothing about what attributes mean. This crate supplies the meaning for
//! the hwsim driver: attribute type ids and their [`POLICY`] table, the command set with the
//! validation flags each command is registered with, fixed-layout payload structs (MAC addresses,
//! TX rates, frame headers) and typed views of the messages a medium simulator exchanges with the
//! driver.
//!
//! ## Message Layout
//!
//! A message in the shared window is a [`MessageHeader`] followed by `attrs_len` bytes of
//! attributes. Anything after that in the window is ignored.
//!
//! ```text
//! +--------+---------+-------------+--------------------------+
//! | cmd u8 | version | attrs_len   | attributes (TLV records) |
//! |        | u8      | u16 LE      |                          |
//! +--------+---------+-------------+--------------------------+
//! ```
//!
//! [`decode_message`] picks strict or liberal validation from the command, the same way the driver
//! does, and [`encode_message`] writes a complete message for the transport.

#![no_std]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod attrs;
mod command;
mod error;
mod header;
mod message;
pub mod structs;

pub use attrs::POLICY;
pub use command::HwsimCmd;
pub use error::Error;
pub use header::{MessageHeader, HWSIM_GENL_VERSION};
pub use message::{
    decode_message, decode_self_encoded, encode_message, Message, NewRadio, YawmdRxInfo,
    YawmdTxInfo,
};

pub type Result<T> = core::result::Result<T, Error>;
