// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! One [`Codec`] per supported type, selected through [`Temporal`].
//!
//! | Type | Shape |
//! |------|-------|
//! | [`DateTime<Utc>`] | epoch |
//! | [`DateTime<FixedOffset>`] | epoch, re-offset to the reference zone |
//! | [`ZonedDateTime`] | epoch, carries the reference zone |
//! | [`TimeDelta`] | epoch |
//! | [`NaiveDate`] | `[y, m, d]` |
//! | [`NaiveTime`] | `[h, m, (s, (sub))]` |
//! | [`NaiveDateTime`] | `[y, m, d, h, m, (s, (sub))]` |
//! | [`OffsetTime`] | `[h, m, (s, (sub)), "offset"]` |
//! | [`Year`] | integer |
//! | [`YearMonth`], [`MonthDay`], [`Period`], [`ZoneId`], [`FixedOffset`] | string |

use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc,
};
use std::fmt;
use std::str::FromStr;

use crate::calendar::{time_fields, MonthDay, OffsetTime, Period, Year, YearMonth};
use crate::codec::{
    CalendarFields, Codec, EpochAccess, FieldAccess, FieldLayout, OrdinalAccess, Shape,
};
use crate::decimal::NANOS_PER_SECOND;
use crate::duration::{duration_millis, format_duration, parse_duration, split_duration};
use crate::error::Result;
use crate::iso;
use crate::mode::{Context, EncodingMode};
use crate::token::Token;
use crate::zone::{format_offset, parse_offset, ZoneId, ZonedDateTime};

/// A type with a registered codec.
pub trait Temporal: Sized + 'static {
    fn codec() -> &'static Codec<Self>;

    #[inline]
    fn encode(&self, mode: &EncodingMode) -> Token {
        Self::codec().encode(self, mode)
    }

    #[inline]
    fn decode(token: &Token, ctx: &Context) -> Result<Option<Self>> {
        Self::codec().decode(token, ctx)
    }
}

macro_rules! register {
    ($($ty:ty => $codec:ident),+ $(,)?) => {
        $(
            impl Temporal for $ty {
                #[inline]
                fn codec() -> &'static Codec<Self> {
                    &$codec
                }
            }
        )+
    };
}

register!(
    DateTime<Utc> => INSTANT,
    DateTime<FixedOffset> => OFFSET_DATE_TIME,
    ZonedDateTime => ZONED_DATE_TIME,
    TimeDelta => DURATION,
    NaiveDate => LOCAL_DATE,
    NaiveTime => LOCAL_TIME,
    NaiveDateTime => LOCAL_DATE_TIME,
    OffsetTime => OFFSET_TIME,
    Year => YEAR,
    YearMonth => YEAR_MONTH,
    MonthDay => MONTH_DAY,
    Period => PERIOD,
    ZoneId => ZONE_ID,
    FixedOffset => ZONE_OFFSET,
);

fn display<T: fmt::Display>(value: &T) -> String {
    value.to_string()
}

fn from_text<T: FromStr<Err = String>>(text: &str) -> std::result::Result<T, String> {
    text.parse()
}

// ═══════════════════════════════════════════════════════════════════════════
// Epoch types
// ═══════════════════════════════════════════════════════════════════════════

/// chrono folds a leap second into the nanosecond field.
#[inline]
fn clamp_nanos(nanos: u32) -> u32 {
    nanos.min(NANOS_PER_SECOND - 1)
}

// ── instant ───────────────────────────────────────────────────────────────

static INSTANT: Codec<DateTime<Utc>> = Codec {
    name: "Instant",
    format: iso::format_instant,
    parse: iso::parse_instant,
    shape: Shape::Epoch(EpochAccess {
        epoch_second: instant_second,
        nano: instant_nano,
        epoch_milli: instant_milli,
        from_epoch: instant_from_epoch,
        adjust: None,
    }),
};

fn instant_second(value: &DateTime<Utc>) -> i64 {
    value.timestamp()
}

fn instant_nano(value: &DateTime<Utc>) -> u32 {
    clamp_nanos(value.timestamp_subsec_nanos())
}

fn instant_milli(value: &DateTime<Utc>) -> i64 {
    value.timestamp_millis()
}

fn instant_from_epoch(seconds: i64, nanos: u32, _zone: &ZoneId) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(seconds, nanos)
}

// ── offset date-time ──────────────────────────────────────────────────────

static OFFSET_DATE_TIME: Codec<DateTime<FixedOffset>> = Codec {
    name: "OffsetDateTime",
    format: iso::format_offset_date_time,
    parse: iso::parse_offset_date_time,
    shape: Shape::Epoch(EpochAccess {
        epoch_second: offset_date_time_second,
        nano: offset_date_time_nano,
        epoch_milli: offset_date_time_milli,
        from_epoch: offset_date_time_from_epoch,
        adjust: Some(offset_date_time_adjust),
    }),
};

fn offset_date_time_second(value: &DateTime<FixedOffset>) -> i64 {
    value.timestamp()
}

fn offset_date_time_nano(value: &DateTime<FixedOffset>) -> u32 {
    clamp_nanos(value.timestamp_subsec_nanos())
}

fn offset_date_time_milli(value: &DateTime<FixedOffset>) -> i64 {
    value.timestamp_millis()
}

fn in_zone(utc: DateTime<Utc>, zone: &ZoneId) -> DateTime<FixedOffset> {
    utc.with_timezone(&zone.offset_at(&utc.naive_utc()))
}

fn offset_date_time_from_epoch(
    seconds: i64,
    nanos: u32,
    zone: &ZoneId,
) -> Option<DateTime<FixedOffset>> {
    DateTime::from_timestamp(seconds, nanos).map(|utc| in_zone(utc, zone))
}

fn offset_date_time_adjust(value: &DateTime<FixedOffset>, zone: &ZoneId) -> DateTime<FixedOffset> {
    in_zone(value.with_timezone(&Utc), zone)
}

// ── zoned date-time ───────────────────────────────────────────────────────

static ZONED_DATE_TIME: Codec<ZonedDateTime> = Codec {
    name: "ZonedDateTime",
    format: display::<ZonedDateTime>,
    parse: from_text::<ZonedDateTime>,
    shape: Shape::Epoch(EpochAccess {
        epoch_second: zoned_second,
        nano: zoned_nano,
        epoch_milli: zoned_milli,
        from_epoch: zoned_from_epoch,
        adjust: Some(zoned_adjust),
    }),
};

fn zoned_second(value: &ZonedDateTime) -> i64 {
    value.timestamp()
}

fn zoned_nano(value: &ZonedDateTime) -> u32 {
    clamp_nanos(value.timestamp_subsec_nanos())
}

fn zoned_milli(value: &ZonedDateTime) -> i64 {
    value.timestamp_millis()
}

fn zoned_from_epoch(seconds: i64, nanos: u32, zone: &ZoneId) -> Option<ZonedDateTime> {
    DateTime::from_timestamp(seconds, nanos).map(|utc| ZonedDateTime::from_utc(utc, *zone))
}

fn zoned_adjust(value: &ZonedDateTime, zone: &ZoneId) -> ZonedDateTime {
    value.with_zone_same_instant(*zone)
}

// ── duration ──────────────────────────────────────────────────────────────

static DURATION: Codec<TimeDelta> = Codec {
    name: "Duration",
    format: format_duration,
    parse: parse_duration,
    shape: Shape::Epoch(EpochAccess {
        epoch_second: duration_second,
        nano: duration_nano,
        epoch_milli: duration_millis,
        from_epoch: duration_from_epoch,
        adjust: None,
    }),
};

fn duration_second(value: &TimeDelta) -> i64 {
    split_duration(value).0
}

fn duration_nano(value: &TimeDelta) -> u32 {
    split_duration(value).1
}

fn duration_from_epoch(seconds: i64, nanos: u32, _zone: &ZoneId) -> Option<TimeDelta> {
    TimeDelta::new(seconds, nanos)
}

// ═══════════════════════════════════════════════════════════════════════════
// Field types
// ═══════════════════════════════════════════════════════════════════════════

// ── local date ────────────────────────────────────────────────────────────

static LOCAL_DATE: Codec<NaiveDate> = Codec {
    name: "LocalDate",
    format: iso::format_local_date,
    parse: iso::parse_local_date,
    shape: Shape::Fields(FieldAccess {
        layout: FieldLayout::Date,
        to_fields: date_fields,
        from_fields: date_from_fields,
    }),
};

fn date_fields(value: &NaiveDate) -> CalendarFields {
    CalendarFields {
        year: value.year(),
        month: value.month(),
        day: value.day(),
        ..CalendarFields::default()
    }
}

fn date_from_fields(fields: &CalendarFields) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(fields.year, fields.month, fields.day)
}

// ── local time ────────────────────────────────────────────────────────────

static LOCAL_TIME: Codec<NaiveTime> = Codec {
    name: "LocalTime",
    format: iso::format_local_time,
    parse: iso::parse_local_time,
    shape: Shape::Fields(FieldAccess {
        layout: FieldLayout::Time,
        to_fields: clock_fields,
        from_fields: clock_from_fields,
    }),
};

fn clock_fields(value: &NaiveTime) -> CalendarFields {
    let (hour, minute, second, nano) = time_fields(value);
    CalendarFields {
        hour,
        minute,
        second,
        nano: clamp_nanos(nano),
        ..CalendarFields::default()
    }
}

fn clock_from_fields(fields: &CalendarFields) -> Option<NaiveTime> {
    NaiveTime::from_hms_nano_opt(fields.hour, fields.minute, fields.second, fields.nano)
}

// ── local date-time ───────────────────────────────────────────────────────

static LOCAL_DATE_TIME: Codec<NaiveDateTime> = Codec {
    name: "LocalDateTime",
    format: iso::format_local_date_time,
    parse: iso::parse_local_date_time,
    shape: Shape::Fields(FieldAccess {
        layout: FieldLayout::DateTime,
        to_fields: date_time_fields,
        from_fields: date_time_from_fields,
    }),
};

fn date_time_fields(value: &NaiveDateTime) -> CalendarFields {
    merge(date_fields(&value.date()), clock_fields(&value.time()))
}

fn merge(date: CalendarFields, clock: CalendarFields) -> CalendarFields {
    CalendarFields {
        year: date.year,
        month: date.month,
        day: date.day,
        ..clock
    }
}

fn date_time_from_fields(fields: &CalendarFields) -> Option<NaiveDateTime> {
    Some(date_from_fields(fields)?.and_time(clock_from_fields(fields)?))
}

// ── offset time ───────────────────────────────────────────────────────────

static OFFSET_TIME: Codec<OffsetTime> = Codec {
    name: "OffsetTime",
    format: display::<OffsetTime>,
    parse: from_text::<OffsetTime>,
    shape: Shape::Fields(FieldAccess {
        layout: FieldLayout::OffsetTime,
        to_fields: offset_time_fields,
        from_fields: offset_time_from_fields,
    }),
};

fn offset_time_fields(value: &OffsetTime) -> CalendarFields {
    CalendarFields {
        offset: Some(value.offset()),
        ..clock_fields(&value.time())
    }
}

fn offset_time_from_fields(fields: &CalendarFields) -> Option<OffsetTime> {
    Some(OffsetTime::new(clock_from_fields(fields)?, fields.offset?))
}

// ═══════════════════════════════════════════════════════════════════════════
// Ordinal and text types
// ═══════════════════════════════════════════════════════════════════════════

static YEAR: Codec<Year> = Codec {
    name: "Year",
    format: display::<Year>,
    parse: from_text::<Year>,
    shape: Shape::Ordinal(OrdinalAccess {
        get: year_value,
        from: year_from_value,
    }),
};

fn year_value(value: &Year) -> i64 {
    i64::from(value.value())
}

fn year_from_value(value: i64) -> Option<Year> {
    i32::try_from(value).ok().and_then(Year::new)
}

static YEAR_MONTH: Codec<YearMonth> = Codec {
    name: "YearMonth",
    format: display::<YearMonth>,
    parse: from_text::<YearMonth>,
    shape: Shape::Text,
};

static MONTH_DAY: Codec<MonthDay> = Codec {
    name: "MonthDay",
    format: display::<MonthDay>,
    parse: from_text::<MonthDay>,
    shape: Shape::Text,
};

static PERIOD: Codec<Period> = Codec {
    name: "Period",
    format: display::<Period>,
    parse: from_text::<Period>,
    shape: Shape::Text,
};

static ZONE_ID: Codec<ZoneId> = Codec {
    name: "ZoneId",
    format: display::<ZoneId>,
    parse: from_text::<ZoneId>,
    shape: Shape::Text,
};

static ZONE_OFFSET: Codec<FixedOffset> = Codec {
    name: "ZoneOffset",
    format: format_offset,
    parse: parse_offset,
    shape: Shape::Text,
};
