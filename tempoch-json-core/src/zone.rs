// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Zone identifiers and zoned date-times.
//!
//! chrono models a fixed offset ([`FixedOffset`]) and, through `chrono-tz`,
//! a region with rules ([`Tz`]), but has no single value that can be either.
//! [`ZoneId`] is that value, and [`ZonedDateTime`] pairs an instant with the
//! zone it is observed in.  All offset lookups are delegated to chrono.

use chrono::{
    DateTime, FixedOffset, NaiveDateTime, Offset, SecondsFormat, TimeZone, Utc,
};
use chrono_tz::Tz;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Largest offset accepted when parsing, ±18:00.
const MAX_OFFSET_SECONDS: i32 = 18 * 3600;

// ═══════════════════════════════════════════════════════════════════════════
// Offsets
// ═══════════════════════════════════════════════════════════════════════════

/// Render an offset as `Z`, `+hh:mm` or `+hh:mm:ss`.
pub fn format_offset(offset: &FixedOffset) -> String {
    let total = offset.local_minus_utc();
    if total == 0 {
        return "Z".to_owned();
    }
    let sign = if total < 0 { '-' } else { '+' };
    let abs = total.unsigned_abs();
    let (hours, minutes, seconds) = (abs / 3600, (abs / 60) % 60, abs % 60);
    if seconds == 0 {
        format!("{sign}{hours:02}:{minutes:02}")
    } else {
        format!("{sign}{hours:02}:{minutes:02}:{seconds:02}")
    }
}

/// Parse `Z`, `±hh`, `±hh:mm`, `±hhmm`, `±hh:mm:ss` or `±hhmmss`.
pub fn parse_offset(text: &str) -> Result<FixedOffset, String> {
    if text.eq_ignore_ascii_case("z") {
        return Ok(FixedOffset::east_opt(0).expect("zero offset is valid"));
    }
    let (sign, body) = match text.as_bytes().first() {
        Some(b'+') => (1, &text[1..]),
        Some(b'-') => (-1, &text[1..]),
        _ => return Err(format!("offset {text:?} must start with '+', '-' or be 'Z'")),
    };
    if !body.bytes().all(|b| b.is_ascii_digit() || b == b':') {
        return Err(format!("offset {text:?} contains invalid characters"));
    }

    let digits: Vec<&str> = if body.contains(':') {
        body.split(':').collect()
    } else {
        body.as_bytes()
            .chunks(2)
            .map(|pair| std::str::from_utf8(pair).unwrap_or_default())
            .collect()
    };
    if digits.is_empty() || digits.len() > 3 || digits.iter().any(|d| d.len() != 2) {
        return Err(format!("offset {text:?} is not in ±hh[:mm[:ss]] form"));
    }

    let mut parts = [0i32; 3];
    for (slot, part) in parts.iter_mut().zip(&digits) {
        *slot = part.parse().map_err(|_| format!("offset {text:?} is malformed"))?;
    }
    let [hours, minutes, seconds] = parts;
    if minutes > 59 || seconds > 59 {
        return Err(format!("offset {text:?} has out-of-range minutes or seconds"));
    }
    let total = sign * (hours * 3600 + minutes * 60 + seconds);
    if total.abs() > MAX_OFFSET_SECONDS {
        return Err(format!("offset {text:?} exceeds ±18:00"));
    }
    FixedOffset::east_opt(total).ok_or_else(|| format!("offset {text:?} is out of range"))
}

// ═══════════════════════════════════════════════════════════════════════════
// ZoneId
// ═══════════════════════════════════════════════════════════════════════════

/// A time zone: either a fixed offset or a region with transition rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneId {
    Offset(FixedOffset),
    Region(Tz),
}

impl ZoneId {
    /// The `UTC` region, the default reference zone.
    pub const UTC: ZoneId = ZoneId::Region(Tz::UTC);

    /// The offset in effect at the given UTC date-time.
    pub fn offset_at(&self, utc: &NaiveDateTime) -> FixedOffset {
        match self {
            ZoneId::Offset(offset) => *offset,
            ZoneId::Region(tz) => tz.offset_from_utc_datetime(utc).fix(),
        }
    }
}

impl Default for ZoneId {
    fn default() -> Self {
        ZoneId::UTC
    }
}

impl From<FixedOffset> for ZoneId {
    fn from(offset: FixedOffset) -> Self {
        ZoneId::Offset(offset)
    }
}

impl From<Tz> for ZoneId {
    fn from(tz: Tz) -> Self {
        ZoneId::Region(tz)
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoneId::Offset(offset) => f.write_str(&format_offset(offset)),
            ZoneId::Region(tz) => f.write_str(tz.name()),
        }
    }
}

impl FromStr for ZoneId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("z") || s.starts_with('+') || s.starts_with('-') {
            return parse_offset(s).map(ZoneId::Offset);
        }
        s.parse::<Tz>()
            .map(ZoneId::Region)
            .map_err(|e| format!("unknown zone region {s:?}: {e}"))
    }
}

#[cfg(feature = "serde")]
impl Serialize for ZoneId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for ZoneId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// ZonedDateTime
// ═══════════════════════════════════════════════════════════════════════════

/// An instant observed in a [`ZoneId`].
///
/// Two values are equal when they denote the same instant in the same zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZonedDateTime {
    datetime: DateTime<FixedOffset>,
    zone: ZoneId,
}

impl ZonedDateTime {
    /// The instant `utc` as seen in `zone`.
    pub fn from_utc(utc: DateTime<Utc>, zone: ZoneId) -> Self {
        let offset = zone.offset_at(&utc.naive_utc());
        Self {
            datetime: utc.with_timezone(&offset),
            zone,
        }
    }

    /// Same instant, observed in another zone.
    pub fn with_zone_same_instant(&self, zone: ZoneId) -> Self {
        Self::from_utc(self.to_utc(), zone)
    }

    #[inline]
    pub fn datetime(&self) -> DateTime<FixedOffset> {
        self.datetime
    }

    #[inline]
    pub fn zone(&self) -> ZoneId {
        self.zone
    }

    #[inline]
    pub fn offset(&self) -> FixedOffset {
        *self.datetime.offset()
    }

    #[inline]
    pub fn to_utc(&self) -> DateTime<Utc> {
        self.datetime.with_timezone(&Utc)
    }

    #[inline]
    pub fn local(&self) -> NaiveDateTime {
        self.datetime.naive_local()
    }

    #[inline]
    pub fn timestamp(&self) -> i64 {
        self.datetime.timestamp()
    }

    #[inline]
    pub fn timestamp_subsec_nanos(&self) -> u32 {
        self.datetime.timestamp_subsec_nanos()
    }

    #[inline]
    pub fn timestamp_millis(&self) -> i64 {
        self.datetime.timestamp_millis()
    }
}

impl fmt::Display for ZonedDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.datetime.to_rfc3339_opts(SecondsFormat::AutoSi, true))?;
        match self.zone {
            ZoneId::Region(tz) => write!(f, "[{}]", tz.name()),
            ZoneId::Offset(_) => Ok(()),
        }
    }
}

impl FromStr for ZonedDateTime {
    type Err = String;

    /// Parses `2011-12-03T10:15:30+01:00[Europe/Paris]`; without a bracketed
    /// region the offset itself becomes the zone.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (stamp, region) = match s.split_once('[') {
            Some((stamp, rest)) => {
                let region = rest
                    .strip_suffix(']')
                    .ok_or_else(|| format!("unterminated zone region in {s:?}"))?;
                (stamp, Some(region))
            }
            None => (s, None),
        };
        let datetime = DateTime::parse_from_rfc3339(stamp).map_err(|e| e.to_string())?;
        match region {
            Some(region) => {
                let zone: ZoneId = region.parse()?;
                Ok(Self::from_utc(datetime.with_timezone(&Utc), zone))
            }
            None => Ok(Self {
                datetime,
                zone: ZoneId::Offset(*datetime.offset()),
            }),
        }
    }
}
