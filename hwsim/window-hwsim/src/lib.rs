//! # `window_hwsim`
//!
//! Bounds-checked access to a fixed-capacity byte window.
//!
//! The window is a region of memory shared with another party (the hwsim driver exposes one page
//! per session through a character device that user space maps). Its contents are not trusted and
//! its capacity never changes, so every read or write goes through a cursor that checks
//! `cursor + len <= capacity` before touching the storage.
//!
//! - [`WindowReader`] walks an immutable view of the window and hands out sub-slices that borrow
//!   from it (no copies).
//! - [`WindowWriter`] fills a mutable window from the front and refuses any write that does not fit
//!   entirely.
//!
//! Neither type owns the storage: the transport owns it for the lifetime of a session. No
//! operation in this crate can panic or index out of bounds, whatever the window contains.

#![no_std]
#![forbid(unsafe_code)]

mod reader;
mod writer;

pub use reader::WindowReader;
pub use writer::WindowWriter;

use core::fmt;

/// Capacity of the window the hwsim character device exposes per session (one page).
pub const DEFAULT_WINDOW_CAPACITY: usize = 4096;

/// Errors returned by window accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowError {
    /// An access of `requested` bytes at `position` would cross the window's `capacity`.
    OutOfBounds {
        position: usize,
        requested: usize,
        capacity: usize,
    },
}

impl fmt::Display for WindowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowError::OutOfBounds {
                position,
                requested,
                capacity,
            } => write!(
                f,
                "window access of {requested} bytes at {position} exceeds capacity {capacity}"
            ),
        }
    }
}

/// Checks that `requested` bytes starting at `position` fit inside `capacity`.
///
/// Returns the end offset of the access.
#[inline]
pub(crate) fn check_span(
    position: usize,
    requested: usize,
    capacity: usize,
) -> Result<usize, WindowError> {
    match position.checked_add(requested) {
        Some(end) if end <= capacity => Ok(end),
        _ => Err(WindowError::OutOfBounds {
            position,
            requested,
            capacity,
        }),
    }
}

/// Rounds `len` up to the next multiple of `align`, or `None` on overflow.
///
/// `align` must be a power of two.
#[inline]
pub fn align_up(len: usize, align: usize) -> Option<usize> {
    debug_assert!(align.is_power_of_two());
    len.checked_add(align - 1).map(|v| v & !(align - 1))
}
