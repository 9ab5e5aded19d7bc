//! Single-shot, non-blocking event reads.
//!
//! [`Device::read_event`] performs exactly one record-sized read per call and reports the result
//! as a [`ReadOutcome`]. There is no internal retry, buffering, or timing logic: the polling
//! cadence belongs entirely to the caller.

use std::{
    io::{self, Read},
    slice,
};

use crate::{Device, event::InputEvent};

/// The result of one read attempt against a [`Device`].
///
/// The three variants are what callers need to drive a polling loop: [`Event`][Self::Event] hands
/// over data, [`NoEvent`][Self::NoEvent] means "try again later", and [`Failed`][Self::Failed]
/// means "stop polling this device" (and typically: close it, and possibly rediscover).
#[derive(Debug)]
#[must_use]
pub enum ReadOutcome {
    /// A complete event record was read and decoded.
    Event(InputEvent),
    /// The kernel buffer is currently empty.
    ///
    /// Not an error: with a non-blocking handle this is the normal outcome of polling faster than
    /// the user types or moves the mouse.
    NoEvent,
    /// Reading failed, and further reads from this handle are not going to succeed.
    ///
    /// Reported for I/O errors, unplugged devices, an end-of-stream condition, and torn records.
    Failed(io::Error),
}

impl Device {
    /// Attempts to read exactly one event record from the device.
    ///
    /// See [`ReadOutcome`] for how to react to each result. A torn record (the kernel returning
    /// fewer bytes than one full record) is reported as [`ReadOutcome::Failed`]: event devices
    /// deliver whole records atomically, so a partial one indicates a misbehaving source, not a
    /// condition worth buffering across calls.
    pub fn read_event(&self) -> ReadOutcome {
        read_one(&self.file)
    }
}

/// Reads and classifies a single record from `src`.
///
/// Generic over [`Read`] so tests can drive it from a scripted stream instead of a device node.
fn read_one<R: Read>(mut src: R) -> ReadOutcome {
    let mut ev = InputEvent::zeroed();
    let bptr = (&mut ev as *mut InputEvent).cast::<u8>();
    // Safety: this requires that `InputEvent` contains no padding, which is tested where
    // `input_event` is defined.
    let buf = unsafe { slice::from_raw_parts_mut(bptr, size_of::<InputEvent>()) };

    match src.read(buf) {
        Ok(n) if n == buf.len() => ReadOutcome::Event(ev),
        Ok(0) => ReadOutcome::Failed(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "event stream ended",
        )),
        Ok(n) => ReadOutcome::Failed(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("torn event record: {n} of {} bytes", buf.len()),
        )),
        Err(e) if e.kind() == io::ErrorKind::WouldBlock => ReadOutcome::NoEvent,
        Err(e) => ReadOutcome::Failed(e),
    }
}
