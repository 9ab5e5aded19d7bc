//! Device discovery through the stable aliases in `/dev/input/by-id`.
//!
//! udev maintains one symlink per physical input device in that directory, named after the
//! device's vendor/product/interface plus a role suffix: keyboards end in `-event-kbd`, mice in
//! `-event-mouse`. Matching on the suffix picks out devices by role without touching the device
//! nodes themselves.
//!
//! [`find_device_path`] returns the first alias of a class; [`discover`] yields all of them, for
//! callers that want to choose between several devices of the same kind. Either way the result is
//! a point-in-time snapshot: devices come and go with hot-plug, so aliases should be used right
//! away, not cached.

use std::{
    ffi::{OsStr, OsString},
    fmt,
    fs::{self, ReadDir},
    io,
    path::{Path, PathBuf},
};

use thiserror::Error;

/// Where udev keeps the per-device alias symlinks.
const ALIAS_DIR: &str = "/dev/input/by-id";

/// The role of an input device, used to filter aliases during discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceClass {
    Keyboard,
    Mouse,
}

impl DeviceClass {
    /// Returns the alias name suffix identifying this class.
    ///
    /// The match is an exact, case-sensitive string suffix comparison; there are no wildcard or
    /// regex semantics.
    pub const fn suffix(self) -> &'static str {
        match self {
            DeviceClass::Keyboard => "-event-kbd",
            DeviceClass::Mouse => "-event-mouse",
        }
    }
}

impl fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DeviceClass::Keyboard => "keyboard",
            DeviceClass::Mouse => "mouse",
        })
    }
}

/// Error returned when discovery comes up empty.
///
/// Both variants mean "no device found"; they differ only in why, so that callers can log
/// something useful.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The alias directory could not be listed (missing, or permission denied).
    #[error("failed to list '{}': {source}", .dir.display())]
    DirectoryUnreadable {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The directory was listed, but no entry carries the class's suffix.
    #[error("no {class} alias found in '/dev/input/by-id'")]
    NoMatch { class: DeviceClass },
}

/// An alias name discovered in the alias directory.
///
/// A [`DeviceAlias`] is a snapshot of one directory entry; the entry may be gone by the time the
/// alias is used, in which case [`Device::open`][crate::Device::open] reports the failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceAlias {
    name: OsString,
}

impl DeviceAlias {
    /// Returns the bare alias name, without any directory components.
    #[inline]
    pub fn name(&self) -> &OsStr {
        &self.name
    }

    /// Returns the full path of the alias, ready to be passed to
    /// [`Device::open`][crate::Device::open].
    pub fn path(&self) -> PathBuf {
        Path::new(ALIAS_DIR).join(&self.name)
    }
}

/// Returns the first alias of the requested class.
///
/// "First" means first in directory-iteration order, which the filesystem does not keep stable:
/// when several devices of the same class are plugged in, which one is returned is unspecified
/// and may vary across runs. Use [`discover`] to see all of them and choose.
///
/// Entries that cannot be read are skipped with a warning; they never turn an otherwise
/// successful scan into a failure.
pub fn find_device_path(class: DeviceClass) -> Result<DeviceAlias, DiscoveryError> {
    for res in discover(class)? {
        match res {
            Ok(alias) => return Ok(alias),
            Err(e) => log::warn!("skipping unreadable entry in '{ALIAS_DIR}': {e}"),
        }
    }
    Err(DiscoveryError::NoMatch { class })
}

/// Enumerates all aliases of the requested class.
///
/// The iterator yields every matching alias in directory-iteration order.
///
/// # Examples
///
/// ```no_run
/// use evpeek::{DeviceClass, discover};
///
/// for res in discover(DeviceClass::Mouse)? {
///     let alias = res?;
///     println!("{}", alias.path().display());
/// }
/// # Ok::<_, Box<dyn std::error::Error>>(())
/// ```
pub fn discover(class: DeviceClass) -> Result<Discover, DiscoveryError> {
    Discover::new(Path::new(ALIAS_DIR), class)
}

/// Iterator over the aliases of one device class.
///
/// Returned by [`discover`].
#[derive(Debug)]
pub struct Discover {
    read_dir: ReadDir,
    suffix: &'static str,
}

impl Discover {
    fn new(dir: &Path, class: DeviceClass) -> Result<Self, DiscoveryError> {
        let read_dir = fs::read_dir(dir).map_err(|source| DiscoveryError::DirectoryUnreadable {
            dir: dir.to_owned(),
            source,
        })?;
        log::debug!("scanning '{}' for {class} aliases", dir.display());
        Ok(Self {
            read_dir,
            suffix: class.suffix(),
        })
    }
}

impl Iterator for Discover {
    type Item = io::Result<DeviceAlias>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.read_dir.next()? {
                Ok(ent) => ent,
                Err(e) => return Some(Err(e)),
            };

            // `read_dir` never yields the `.`/`..` pseudo-entries, so matching on the suffix is
            // all that's left to do.
            let name = entry.file_name();
            if !name.as_encoded_bytes().ends_with(self.suffix.as_bytes()) {
                continue;
            }

            log::debug!("matched alias '{}'", entry.path().display());
            return Some(Ok(DeviceAlias { name }));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::hash::{BuildHasher, Hasher, RandomState};

    use super::*;

    /// Creates a uniquely named scratch alias directory populated with `entries`.
    fn alias_dir(entries: &[&str]) -> PathBuf {
        let hash = RandomState::new().build_hasher().finish();
        let dir = std::env::temp_dir().join(format!("evpeek-scan-{hash}"));
        fs::create_dir(&dir).unwrap();
        for name in entries {
            fs::write(dir.join(name), b"").unwrap();
        }
        dir
    }

    fn first_in(dir: &Path, class: DeviceClass) -> Result<DeviceAlias, DiscoveryError> {
        for res in Discover::new(dir, class)? {
            match res {
                Ok(alias) => return Ok(alias),
                Err(_) => continue,
            }
        }
        Err(DiscoveryError::NoMatch { class })
    }

    #[test]
    fn finds_alias_by_class_suffix() {
        let dir = alias_dir(&[
            "abc123-event-kbd",
            "xyz789-event-mouse",
            "usb-Logitech_USB_Receiver-if02-mouse",
        ]);

        let kbd = first_in(&dir, DeviceClass::Keyboard).unwrap();
        assert_eq!(kbd.name(), "abc123-event-kbd");

        let mouse = first_in(&dir, DeviceClass::Mouse).unwrap();
        assert_eq!(mouse.name(), "xyz789-event-mouse");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn yields_every_match_with_the_right_suffix() {
        let dir = alias_dir(&[
            "usb-one-event-mouse",
            "usb-two-event-mouse",
            "usb-three-event-kbd",
            "mouse0", // legacy node name, no suffix match
        ]);

        let mut names = Vec::new();
        for res in Discover::new(&dir, DeviceClass::Mouse).unwrap() {
            let alias = res.unwrap();
            assert!(
                alias
                    .name()
                    .as_encoded_bytes()
                    .ends_with(DeviceClass::Mouse.suffix().as_bytes())
            );
            assert_ne!(alias.name(), ".");
            assert_ne!(alias.name(), "..");
            names.push(alias.name().to_os_string());
        }
        names.sort();
        assert_eq!(names, ["usb-one-event-mouse", "usb-two-event-mouse"]);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn no_match_is_distinguishable_from_unreadable_dir() {
        let dir = alias_dir(&["abc123-event-kbd"]);

        match first_in(&dir, DeviceClass::Mouse) {
            Err(DiscoveryError::NoMatch { class }) => assert_eq!(class, DeviceClass::Mouse),
            other => panic!("expected NoMatch, got {other:?}"),
        }

        fs::remove_dir_all(&dir).unwrap();
        match first_in(&dir, DeviceClass::Keyboard) {
            Err(DiscoveryError::DirectoryUnreadable { source, .. }) => {
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("expected DirectoryUnreadable, got {other:?}"),
        }
    }

    #[test]
    fn suffix_match_is_exact() {
        // A name that merely *contains* the suffix, or matches with different case, is not a hit.
        let dir = alias_dir(&["usb-event-kbd-extra", "usb-foo-EVENT-KBD"]);

        assert!(matches!(
            first_in(&dir, DeviceClass::Keyboard),
            Err(DiscoveryError::NoMatch { .. })
        ));

        fs::remove_dir_all(&dir).unwrap();
    }
}
