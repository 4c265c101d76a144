//! ## Window Transport
//!
//! The codec never touches the shared mapping directly. A [`WindowTransport`] hands out a private
//! copy of the window wrapped in a [`WindowGuard`], and the guard gives the window back to the
//! transport when it goes out of scope, whichever way the caller leaves.

use std::{
    fs::{self, OpenOptions},
    io::{self, Write},
    ops::Deref,
    path::{Path, PathBuf},
};

use tracing::{trace, warn};

use crate::error::{BridgeResult, Error};

/// A window copied out of the transport.
///
/// [`WindowGuard::release`] hands the window back and reports whether that worked. A guard that is
/// dropped without being released is released on drop, where a failure can only be logged.
pub struct WindowGuard<'t> {
    bytes: Vec<u8>,
    release: Option<Box<dyn FnOnce() -> BridgeResult<()> + 't>>,
}

impl<'t> WindowGuard<'t> {
    pub fn new(bytes: Vec<u8>, release: impl FnOnce() -> BridgeResult<()> + 't) -> Self {
        Self {
            bytes,
            release: Some(Box::new(release)),
        }
    }

    /// Gives the window back to the transport. A window that cannot be released stays pending,
    /// so the error must reach the caller.
    pub fn release(mut self) -> BridgeResult<()> {
        match self.release.take() {
            Some(release) => release(),
            None => Ok(()),
        }
    }
}

impl Deref for WindowGuard<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.bytes
    }
}

impl Drop for WindowGuard<'_> {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            if let Err(e) = release() {
                warn!("failed to release window: {e}");
            }
        }
    }
}

pub trait WindowTransport {
    /// Whether a window is waiting to be acquired.
    fn has_pending(&self) -> bool;

    /// Copies at most `capacity` bytes of the pending window.
    fn acquire_window(&mut self, capacity: usize) -> BridgeResult<WindowGuard<'_>>;

    /// Hands an encoded message to the peer.
    fn publish(&mut self, message: &[u8]) -> BridgeResult<()>;
}

/// Stands in for the mapped device node with two plain files.
///
/// The peer drops a window at `window_path`; acquiring copies it and releasing deletes it so the
/// next one can be written. Published messages are appended to `reply_path`. Each message carries
/// its own length in the header, so a reader can split the file back into messages.
#[derive(Debug, Clone)]
pub struct FileTransport {
    window_path: PathBuf,
    reply_path: PathBuf,
}

impl FileTransport {
    pub fn new(window_path: PathBuf, reply_path: PathBuf) -> Self {
        Self {
            window_path,
            reply_path,
        }
    }

    pub fn window_path(&self) -> &Path {
        &self.window_path
    }

    pub fn reply_path(&self) -> &Path {
        &self.reply_path
    }
}

impl WindowTransport for FileTransport {
    fn has_pending(&self) -> bool {
        self.window_path.is_file()
    }

    fn acquire_window(&mut self, capacity: usize) -> BridgeResult<WindowGuard<'_>> {
        let mut bytes = fs::read(&self.window_path)?;
        bytes.truncate(capacity);
        trace!(
            "acquired {} byte window from {}",
            bytes.len(),
            self.window_path.display()
        );
        let path = &self.window_path;
        Ok(WindowGuard::new(bytes, move || match fs::remove_file(path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(Error::ReleaseFailed(e)),
            _ => Ok(()),
        }))
    }

    fn publish(&mut self, message: &[u8]) -> BridgeResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.reply_path)?;
        file.write_all(message)?;
        file.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("hwsim-transport-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn guard_releases_on_drop() {
        let released = Cell::new(false);
        {
            let guard = WindowGuard::new(vec![1, 2, 3], || {
                released.set(true);
                Ok(())
            });
            assert_eq!(&*guard, &[1, 2, 3]);
            assert!(!released.get());
        }
        assert!(released.get());
    }

    #[test]
    fn guard_releases_on_early_return() {
        let released = Cell::new(false);
        let inspect = || -> Result<(), ()> {
            let guard = WindowGuard::new(vec![0xff], || {
                released.set(true);
                Ok(())
            });
            if guard[0] == 0xff {
                return Err(());
            }
            Ok(())
        };
        assert!(inspect().is_err());
        assert!(released.get());
    }

    #[test]
    fn explicit_release_reports_failure_once() {
        let calls = Cell::new(0);
        let guard = WindowGuard::new(vec![0], || {
            calls.set(calls.get() + 1);
            Err(Error::ReleaseFailed(io::Error::from(
                io::ErrorKind::PermissionDenied,
            )))
        });
        assert!(matches!(guard.release(), Err(Error::ReleaseFailed(_))));
        assert_eq!(calls.get(), 1);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn undeletable_window_fails_to_release() {
        let dir = scratch_dir("stuck");
        let mut transport = FileTransport::new("/proc/self/status".into(), dir.join("reply"));
        assert!(transport.has_pending());
        let window = transport.acquire_window(64).unwrap();
        assert!(!window.is_empty());
        assert!(matches!(window.release(), Err(Error::ReleaseFailed(_))));
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn file_window_is_copied_capped_and_released() {
        let dir = scratch_dir("acquire");
        let mut transport = FileTransport::new(dir.join("window"), dir.join("reply"));
        assert!(!transport.has_pending());

        fs::write(transport.window_path(), [7u8; 64]).unwrap();
        assert!(transport.has_pending());
        let window = transport.acquire_window(16).unwrap();
        assert_eq!(window.len(), 16);
        window.release().unwrap();
        assert!(!transport.has_pending());

        fs::write(transport.window_path(), [7u8; 8]).unwrap();
        drop(transport.acquire_window(16).unwrap());
        assert!(!transport.has_pending());
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn publish_appends() {
        let dir = scratch_dir("publish");
        let mut transport = FileTransport::new(dir.join("window"), dir.join("reply"));
        transport.publish(&[1, 2]).unwrap();
        transport.publish(&[3]).unwrap();
        assert_eq!(fs::read(transport.reply_path()).unwrap(), vec![1, 2, 3]);
        fs::remove_dir_all(dir).unwrap();
    }
}
