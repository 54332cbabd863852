//! 64-bit integers that travel as JSON strings.
//!
//! BigQuery encodes `int64`/`uint64` fields (timestamps, byte counts, slot
//! milliseconds) as strings so they survive JavaScript number precision.
//! [`Int64`] keeps a native `i64` in memory and only converts at the serde
//! boundary.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Int64(pub i64);

impl Int64 {
    #[inline]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    #[inline]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Interpret the value as milliseconds since the unix epoch.
    ///
    /// Returns `None` when the value is out of range for [`DateTime<Utc>`].
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.0)
    }
}

impl From<i64> for Int64 {
    #[inline]
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Int64> for i64 {
    #[inline]
    fn from(value: Int64) -> Self {
        value.0
    }
}

impl PartialEq<i64> for Int64 {
    #[inline]
    fn eq(&self, other: &i64) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for Int64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Int64 {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl serde::Serialize for Int64 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for Int64 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(Int64Visitor)
    }
}

/// Accepts the canonical string form, plus bare JSON integers for leniency.
///
/// Strings must be exactly what [`Int64`] writes back (`"5"`, not `"+5"` or
/// `"005"`), so a decoded value always re-encodes to the same text.
struct Int64Visitor;

impl<'de> de::Visitor<'de> for Int64Visitor {
    type Value = Int64;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a 64-bit integer, or a string containing one")
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Int64(v))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        i64::try_from(v)
            .map(Int64)
            .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        let value: i64 = v
            .parse()
            .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))?;

        if value.to_string() != v {
            return Err(E::invalid_value(de::Unexpected::Str(v), &self));
        }
        Ok(Int64(value))
    }
}
