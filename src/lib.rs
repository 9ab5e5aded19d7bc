#![doc = include_str!("../README.md")]
#![warn(missing_debug_implementations)]

mod device;
pub mod discover;
pub mod event;
mod raw;
pub mod reader;

pub use device::{Device, OpenError};
#[doc(inline)]
pub use discover::{DeviceAlias, DeviceClass, DiscoveryError, discover, find_device_path};
pub use event::{EventType, InputEvent, UnknownVariant};
#[doc(inline)]
pub use reader::ReadOutcome;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_sync() {
        fn assert<T: Send + Sync>() {}

        assert::<Device>();
        assert::<DeviceAlias>();
        assert::<ReadOutcome>();
        assert::<DiscoveryError>();
        assert::<OpenError>();
    }
}
