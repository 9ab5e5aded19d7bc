//! The event record layout from `linux/input.h`.

#![allow(non_camel_case_types)]

use libc::timeval;

/// `struct input_event`: what the kernel hands out per `read(2)`.
///
/// The layout is a fixed kernel ABI and must not be rearranged.
#[derive(Clone, Copy)]
#[repr(C)]
pub struct input_event {
    pub time: timeval,
    pub type_: u16,
    pub code: u16,
    pub value: i32,
}

impl PartialEq for input_event {
    fn eq(&self, other: &Self) -> bool {
        self.time.tv_sec == other.time.tv_sec
            && self.time.tv_usec == other.time.tv_usec
            && self.type_ == other.type_
            && self.code == other.code
            && self.value == other.value
    }
}
impl Eq for input_event {}

#[cfg(test)]
mod tests {
    use super::*;

    /// The decoder reads records through a byte view of `input_event`, which is only sound if the
    /// struct has no padding bytes.
    #[test]
    fn no_padding() {
        assert_eq!(
            size_of::<input_event>(),
            size_of::<timeval>() + size_of::<u16>() * 2 + size_of::<i32>(),
        );
    }
}
