use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize, de};

use crate::event::EventType;

struct NamedOrRawVisitor;

impl de::Visitor<'_> for NamedOrRawVisitor {
    type Value = EventType;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("`EV_*` constant name or raw code")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        EventType::from_str(v).map_err(|_| E::custom(format!("unknown event type '{v}'")))
    }

    fn visit_u16<E>(self, v: u16) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(EventType::from_raw(v))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        let v: u16 = v.try_into().map_err(|_| {
            E::invalid_value(de::Unexpected::Unsigned(v), &"unsigned 16-bit value")
        })?;
        self.visit_u16(v)
    }
}

/// Deserialization from a raw 16-bit code or an `EV_*` constant name.
impl<'a> Deserialize<'a> for EventType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'a>,
    {
        if deserializer.is_human_readable() {
            // Human-readable formats may carry either the constant name (`EV_KEY`, ...) or a raw
            // `u16`, and are assumed to be self-describing, so `deserialize_any` works.
            deserializer.deserialize_any(NamedOrRawVisitor)
        } else {
            // Binary formats always use the raw u16 code.
            let raw = u16::deserialize(deserializer)?;
            Ok(EventType::from_raw(raw))
        }
    }
}

impl Serialize for EventType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if serializer.is_human_readable() {
            // Prefer the textual name if there is one; fall back to the raw u16 code.
            match self.name() {
                Some(name) => serializer.collect_str(name),
                None => self.raw().serialize(serializer),
            }
        } else {
            // Binary formats always use the raw u16 code.
            self.raw().serialize(serializer)
        }
    }
}
