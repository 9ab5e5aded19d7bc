//! The input event record and its type code.
//!
//! Every successful read yields an [`InputEvent`] carrying four pieces of information:
//!
//! - **Timestamp** ([`InputEvent::time`]): When the event was inserted into the kernel buffer,
//!   using the system's real-time clock.
//! - **Event Type** ([`InputEvent::event_type`]): The broad category of event, wrapped in
//!   [`EventType`].
//! - **Event Code** ([`InputEvent::raw_code`]): A `u16` identifying the key, button, or axis the
//!   event is about.
//! - **Event Value** ([`InputEvent::raw_value`]): An `i32` describing *what* happened to the
//!   entity identified by the code.
//!
//! Codes and values are passed through verbatim; interpreting them (deciding that *key X is now
//! down*) is up to the consumer.
//!
//! # Serde support
//!
//! If the `serde` feature is enabled, [`EventType`] implements [`Serialize`] and [`Deserialize`].
//! Human-readable formats use the kernel constant name if the value has one (eg. `EV_KEY`), and
//! the raw [`u16`] code if it does not; deserialization accepts either. Non-self-describing binary
//! formats always use the raw code.
//!
//! [`Serialize`]: ::serde::Serialize
//! [`Deserialize`]: ::serde::Deserialize

#[cfg(any(test, feature = "serde"))]
mod serde;

use std::{
    error::Error,
    fmt,
    str::FromStr,
    time::{Duration, SystemTime},
};

use crate::raw::input_event;

/// One fixed-size event record, as delivered by the kernel.
///
/// A value of this type is only ever produced from a complete record; partial reads are reported
/// as failures by the reader and never surface here.
#[derive(Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct InputEvent(pub(crate) input_event);

impl InputEvent {
    /// Creates an [`InputEvent`] from raw values.
    ///
    /// The timestamp of the event will be set to 0.
    #[inline]
    pub const fn new(ty: EventType, raw_code: u16, raw_value: i32) -> Self {
        Self(input_event {
            time: libc::timeval {
                tv_sec: 0,
                tv_usec: 0,
            },
            type_: ty.0,
            code: raw_code,
            value: raw_value,
        })
    }

    /// Creates an [`InputEvent`] with all fields zeroed out.
    ///
    /// Useful as a filler value that will be overwritten with a real event soon.
    #[inline]
    pub const fn zeroed() -> Self {
        Self(input_event {
            time: libc::timeval {
                tv_sec: 0,
                tv_usec: 0,
            },
            type_: 0,
            code: 0,
            value: 0,
        })
    }

    /// Changes the timestamp of `self` to the given [`SystemTime`].
    ///
    /// **Note**: [`InputEvent`] uses a `timeval` to store the timestamp, which has microsecond
    /// resolution, while [`SystemTime`] can represent nanoseconds on Unix.
    /// The value will be truncated or rounded to fit in the `timeval`.
    pub fn with_time(mut self, time: SystemTime) -> Self {
        let dur = if time >= SystemTime::UNIX_EPOCH {
            time.duration_since(SystemTime::UNIX_EPOCH).unwrap()
        } else {
            SystemTime::UNIX_EPOCH.duration_since(time).unwrap()
        };
        let sign = if time >= SystemTime::UNIX_EPOCH {
            1
        } else {
            -1
        };
        self.0.time.tv_sec = dur.as_secs().try_into().unwrap();
        self.0.time.tv_sec *= sign;
        self.0.time.tv_usec = dur.subsec_micros().try_into().unwrap();
        self
    }

    /// Returns the timestamp stored in the event.
    ///
    /// Timestamps use the system's real-time clock, the same time source as [`SystemTime::now`].
    pub fn time(&self) -> SystemTime {
        match self.try_time() {
            Some(time) => time,
            None => {
                log::warn!(
                    "`input_event` timestamp out of range of `SystemTime`: tv_sec={} tv_usec={}",
                    self.0.time.tv_sec,
                    self.0.time.tv_usec,
                );
                SystemTime::UNIX_EPOCH
            }
        }
    }
    fn try_time(&self) -> Option<SystemTime> {
        let sec = self.0.time.tv_sec;
        let usec = self.0.time.tv_usec.clamp(0, 999_999);

        let dur = Duration::new(sec.unsigned_abs() as u64, (usec * 1000) as u32);

        if sec >= 0 {
            SystemTime::UNIX_EPOCH.checked_add(dur)
        } else {
            SystemTime::UNIX_EPOCH.checked_sub(dur)
        }
    }

    /// Returns the [`EventType`] of this event.
    #[inline]
    pub fn event_type(&self) -> EventType {
        EventType(self.0.type_)
    }

    /// Returns the raw *event code* field.
    ///
    /// The *code* of an [`InputEvent`] describes what entity the event is about: a key, button,
    /// axis, or other object.
    #[inline]
    pub fn raw_code(&self) -> u16 {
        self.0.code
    }

    /// Returns the raw *event value* field.
    ///
    /// The *value* of an [`InputEvent`] describes the new state of the entity identified by the
    /// code.
    #[inline]
    pub fn raw_value(&self) -> i32 {
        self.0.value
    }
}

impl fmt::Debug for InputEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputEvent")
            .field("time", &self.time())
            .field("type", &self.event_type())
            .field("code", &self.raw_code())
            .field("value", &self.raw_value())
            .finish()
    }
}

/// `EV_*`: The broad category of an [`InputEvent`].
///
/// This type has associated constants mimicking the preprocessor constants defined in
/// `linux/input-event-codes.h`. [`EventType`]s will use the name of the constant when formatting
/// with `Debug`, if a matching constant exists. [`EventType`] also implements [`FromStr`], which
/// will attempt to parse the constant name.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct EventType(pub(crate) u16);

impl EventType {
    /// Synchronization event, separating batches of events.
    pub const SYN: Self = Self(0x00);
    /// A key or button press, release, or repeat.
    pub const KEY: Self = Self(0x01);
    /// A relative axis movement.
    pub const REL: Self = Self(0x02);
    /// An absolute axis change.
    pub const ABS: Self = Self(0x03);
    /// A miscellaneous event.
    pub const MSC: Self = Self(0x04);
    /// A switch changed state.
    pub const SW: Self = Self(0x05);
    /// An LED changed state, or is requested to change state.
    pub const LED: Self = Self(0x11);
    /// A sound started/stopped playing, or is requested to.
    pub const SND: Self = Self(0x12);
    /// The autorepeat settings have changed.
    pub const REP: Self = Self(0x14);
    /// Controls force-feedback parameters and effects.
    pub const FF: Self = Self(0x15);

    #[inline]
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }

    fn name(self) -> Option<&'static str> {
        Some(match self {
            Self::SYN => "EV_SYN",
            Self::KEY => "EV_KEY",
            Self::REL => "EV_REL",
            Self::ABS => "EV_ABS",
            Self::MSC => "EV_MSC",
            Self::SW => "EV_SW",
            Self::LED => "EV_LED",
            Self::SND => "EV_SND",
            Self::REP => "EV_REP",
            Self::FF => "EV_FF",
            _ => return None,
        })
    }
}

impl FromStr for EventType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "EV_SYN" => Self::SYN,
            "EV_KEY" => Self::KEY,
            "EV_REL" => Self::REL,
            "EV_ABS" => Self::ABS,
            "EV_MSC" => Self::MSC,
            "EV_SW" => Self::SW,
            "EV_LED" => Self::LED,
            "EV_SND" => Self::SND,
            "EV_REP" => Self::REP,
            "EV_FF" => Self::FF,
            _ => return Err(UnknownVariant { _p: () }),
        })
    }
}

impl fmt::Debug for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "EventType({:#x})", self.0),
        }
    }
}

/// Error returned by [`FromStr`] implementations when no matching constant was found.
#[derive(Debug, PartialEq, Eq)]
pub struct UnknownVariant {
    _p: (),
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown variant name")
    }
}
impl Error for UnknownVariant {}
