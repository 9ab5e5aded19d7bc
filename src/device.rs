use std::{
    fs::File,
    io,
    os::{
        fd::{AsFd, AsRawFd, IntoRawFd},
        unix::{
            fs::{FileTypeExt as _, OpenOptionsExt as _},
            prelude::{BorrowedFd, RawFd},
        },
    },
    path::{Path, PathBuf},
    time::Instant,
};

use thiserror::Error;

/// Error returned by [`Device::open`].
#[derive(Debug, Error)]
pub enum OpenError {
    /// The node could not be opened or inspected.
    #[error("failed to open '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The path exists but does not refer to a character device.
    #[error("'{}' is not a character device", .path.display())]
    NotCharacterDevice { path: PathBuf },
}

/// An open, non-blocking connection to one input device node.
///
/// A [`Device`] owns its file handle exclusively: it is created by [`Device::open`], and released
/// exactly once, either by [`Device::close`] or by dropping it. Because [`Device::close`] consumes
/// the value, closing twice or reading after a close is rejected at compile time.
///
/// A [`Device`] represents a single kernel-side read cursor and is meant to be driven by one
/// thread; to watch several devices concurrently, open one [`Device`] per thread or run one read
/// attempt per device from a caller-owned readiness loop (the [`AsRawFd`] impl exists for the
/// latter).
#[derive(Debug)]
pub struct Device {
    pub(crate) file: File,
    path: PathBuf,
}

impl AsFd for Device {
    #[inline]
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.file.as_fd()
    }
}

impl AsRawFd for Device {
    #[inline]
    fn as_raw_fd(&self) -> RawFd {
        self.file.as_raw_fd()
    }
}

impl IntoRawFd for Device {
    #[inline]
    fn into_raw_fd(self) -> RawFd {
        self.file.into_raw_fd()
    }
}

impl Device {
    /// Opens the device node at `path` for read-only, non-blocking access.
    ///
    /// `path` is typically [`DeviceAlias::path`][crate::DeviceAlias::path], but any path to an
    /// input device node works.
    ///
    /// # Errors
    ///
    /// Returns [`OpenError`] if the node is missing, not readable by the current user, or not a
    /// character device. Opening never blocks and never terminates the process.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, OpenError> {
        Self::open_impl(path.as_ref())
    }

    fn open_impl(path: &Path) -> Result<Self, OpenError> {
        let now = Instant::now();

        let mkerr = |source: io::Error| OpenError::Io {
            path: path.to_owned(),
            source,
        };

        let file = File::options()
            .read(true)
            .custom_flags(libc::O_NONBLOCK)
            .open(path)
            .map_err(mkerr)?;

        // Event sources are character devices; anything else (a regular file, a directory) would
        // not honor the record-at-a-time read contract.
        let meta = file.metadata().map_err(mkerr)?;
        if !meta.file_type().is_char_device() {
            return Err(OpenError::NotCharacterDevice {
                path: path.to_owned(),
            });
        }

        log::debug!("opened '{}' in {:?}", path.display(), now.elapsed());
        Ok(Self {
            file,
            path: path.to_owned(),
        })
    }

    /// Returns the file system path this [`Device`] has been opened from.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Uses `poll(2)` to determine whether reading from the device is currently possible.
    ///
    /// This is a one-shot query with a zero timeout; it never blocks. It can be used to space out
    /// calls to [`Device::read_event`][Self::read_event] without a fixed sleep.
    pub fn is_readable(&self) -> io::Result<bool> {
        let mut poll = libc::pollfd {
            fd: self.as_raw_fd(),
            events: libc::POLLIN,
            revents: 0,
        };
        let ret = unsafe { libc::poll(&mut poll, 1, 0) };
        if ret == -1 {
            return Err(io::Error::last_os_error());
        }

        Ok(poll.revents & libc::POLLIN != 0)
    }

    /// Releases the device handle.
    ///
    /// Dropping a [`Device`] has the same effect; this method only makes the point of release
    /// explicit. Since it takes `self` by value, the handle cannot be closed twice or used
    /// afterwards.
    pub fn close(self) {
        log::debug!("closing '{}'", self.path.display());
    }
}

#[cfg(test)]
mod tests {
    use std::hash::{BuildHasher, Hasher, RandomState};

    use super::*;

    #[test]
    fn missing_node_is_a_value_error() {
        let hash = RandomState::new().build_hasher().finish();
        let path = std::env::temp_dir().join(format!("evpeek-no-such-node-{hash}"));

        match Device::open(&path) {
            Err(OpenError::Io { source, .. }) => {
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn regular_file_is_rejected() {
        let hash = RandomState::new().build_hasher().finish();
        let path = std::env::temp_dir().join(format!("evpeek-not-a-device-{hash}"));
        std::fs::write(&path, b"not a device").unwrap();

        assert!(matches!(
            Device::open(&path),
            Err(OpenError::NotCharacterDevice { .. })
        ));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn open_then_close_without_reading() {
        // `/dev/null` is a character device, so it passes the node check.
        let dev = Device::open("/dev/null").unwrap();
        assert_eq!(dev.path(), Path::new("/dev/null"));
        dev.close();
        // `dev` is consumed here; a second `dev.close()` or `dev.read_event()` does not compile.
    }

    #[test]
    fn readable_query_does_not_block() {
        let dev = Device::open("/dev/null").unwrap();
        // `/dev/null` always reports readable (reads return EOF immediately).
        assert!(dev.is_readable().unwrap());
    }
}
