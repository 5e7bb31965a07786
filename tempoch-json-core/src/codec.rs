// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! The generic temporal encoder.
//!
//! Every supported type is described by one [`Codec<T>`]: a name, its
//! canonical text form, and a [`Shape`] that says how the value looks when
//! timestamps are written.  [`Codec::encode`] and [`Codec::decode`] are the
//! only encode/decode routines in the crate; per-type behaviour lives
//! entirely in the function pointers of the table.
//!
//! | Shape | Timestamp form | Accepted tokens |
//! |-------|----------------|-----------------|
//! | [`Shape::Epoch`] | decimal seconds or integer millis | decimal, integer, string |
//! | [`Shape::Fields`] | array of calendar fields | array, string |
//! | [`Shape::Ordinal`] | integer | integer, string |
//! | [`Shape::Text`] | string | string |

use chrono::FixedOffset;

use crate::decimal::{self, NANOS_PER_SECOND};
use crate::error::{Error, Result};
use crate::mode::{Context, EncodingMode};
use crate::token::Token;
use crate::zone::{format_offset, parse_offset, ZoneId};

const NANOS_PER_MILLI: u32 = 1_000_000;

// ═══════════════════════════════════════════════════════════════════════════
// Capability tables
// ═══════════════════════════════════════════════════════════════════════════

/// How one temporal type is written and read.
pub struct Codec<T: 'static> {
    /// Type name used in error messages.
    pub name: &'static str,
    /// Canonical ISO-8601 rendering.
    pub format: fn(&T) -> String,
    /// Canonical ISO-8601 parser; the error text is surfaced unchanged.
    pub parse: fn(&str) -> std::result::Result<T, String>,
    pub shape: Shape<T>,
}

/// The timestamp form of a type.
pub enum Shape<T: 'static> {
    /// Reducible to a single epoch offset.
    Epoch(EpochAccess<T>),
    /// Calendar-only; written as an array of fields.
    Fields(FieldAccess<T>),
    /// A single integer.
    Ordinal(OrdinalAccess<T>),
    /// Always an ISO string.
    Text,
}

/// Accessors for values with an epoch offset.
pub struct EpochAccess<T: 'static> {
    pub epoch_second: fn(&T) -> i64,
    /// Nanosecond of the second, in `0..1_000_000_000`.
    pub nano: fn(&T) -> u32,
    /// Whole epoch milliseconds, finer precision truncated.
    pub epoch_milli: fn(&T) -> i64,
    /// Build a value from floor seconds and nanoseconds; numeric tokens
    /// carry no zone, so the reference zone is authoritative.
    pub from_epoch: fn(i64, u32, &ZoneId) -> Option<T>,
    /// Same-instant conversion to the reference zone, for zoned types.
    pub adjust: Option<fn(&T, &ZoneId) -> T>,
}

/// Accessors for calendar-only values.
pub struct FieldAccess<T: 'static> {
    pub layout: FieldLayout,
    pub to_fields: fn(&T) -> CalendarFields,
    /// `None` when the fields do not form a valid value.
    pub from_fields: fn(&CalendarFields) -> Option<T>,
}

/// Accessors for values written as a bare integer.
pub struct OrdinalAccess<T: 'static> {
    pub get: fn(&T) -> i64,
    pub from: fn(i64) -> Option<T>,
}

/// Which fields a calendar-only value carries, in significance order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldLayout {
    /// `[year, month, day]`
    Date,
    /// `[hour, minute, (second, (sub-second))]`
    Time,
    /// `[year, month, day, hour, minute, (second, (sub-second))]`
    DateTime,
    /// `[hour, minute, (second, (sub-second)), "offset"]`
    OffsetTime,
}

impl FieldLayout {
    #[inline]
    pub const fn has_date(self) -> bool {
        matches!(self, FieldLayout::Date | FieldLayout::DateTime)
    }

    #[inline]
    pub const fn has_time(self) -> bool {
        !matches!(self, FieldLayout::Date)
    }

    #[inline]
    pub const fn has_offset(self) -> bool {
        matches!(self, FieldLayout::OffsetTime)
    }

    /// Numeric fields that must always be present.
    pub const fn required_fields(self) -> usize {
        let date = if self.has_date() { 3 } else { 0 };
        let time = if self.has_time() { 2 } else { 0 };
        date + time
    }

    /// Numeric fields that may be present, including second and sub-second.
    pub const fn max_fields(self) -> usize {
        if self.has_time() {
            self.required_fields() + 2
        } else {
            self.required_fields()
        }
    }
}

/// The calendar fields of a value; unused fields stay zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CalendarFields {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub nano: u32,
    pub offset: Option<FixedOffset>,
}

// ═══════════════════════════════════════════════════════════════════════════
// Encoding
// ═══════════════════════════════════════════════════════════════════════════

impl<T: 'static> Codec<T> {
    /// The token to write for `value` under `mode`.
    pub fn encode(&self, value: &T, mode: &EncodingMode) -> Token {
        if !mode.write_timestamps {
            return Token::String((self.format)(value));
        }
        match &self.shape {
            Shape::Epoch(access) => {
                if mode.nanosecond_resolution {
                    Token::decimal((access.epoch_second)(value), (access.nano)(value))
                } else {
                    Token::Integer((access.epoch_milli)(value))
                }
            }
            Shape::Fields(access) => {
                encode_fields(access.layout, &(access.to_fields)(value), mode)
            }
            Shape::Ordinal(access) => Token::Integer((access.get)(value)),
            Shape::Text => Token::String((self.format)(value)),
        }
    }
}

fn encode_fields(layout: FieldLayout, fields: &CalendarFields, mode: &EncodingMode) -> Token {
    let mut out = Vec::with_capacity(8);
    if layout.has_date() {
        out.push(Token::Integer(i64::from(fields.year)));
        out.push(Token::Integer(i64::from(fields.month)));
        out.push(Token::Integer(i64::from(fields.day)));
    }
    if layout.has_time() {
        out.push(Token::Integer(i64::from(fields.hour)));
        out.push(Token::Integer(i64::from(fields.minute)));
        if fields.second > 0 || fields.nano > 0 {
            out.push(Token::Integer(i64::from(fields.second)));
            if fields.nano > 0 {
                let sub = if mode.nanosecond_resolution {
                    fields.nano
                } else {
                    fields.nano / NANOS_PER_MILLI
                };
                out.push(Token::Integer(i64::from(sub)));
            }
        }
    }
    if layout.has_offset() {
        let offset = fields.offset.as_ref().map_or_else(|| "Z".to_owned(), format_offset);
        out.push(Token::String(offset));
    }
    Token::Array(out)
}

// ═══════════════════════════════════════════════════════════════════════════
// Decoding
// ═══════════════════════════════════════════════════════════════════════════

impl<T: 'static> Codec<T> {
    /// Rebuild a value from `token`.
    ///
    /// `Ok(None)` is the absent value: a JSON `null` or a string that is
    /// empty after trimming.
    pub fn decode(&self, token: &Token, ctx: &Context) -> Result<Option<T>> {
        tracing::trace!(target_type = self.name, kind = %token.kind(), "decoding temporal token");
        match (token, &self.shape) {
            (Token::Null, _) => Ok(None),
            (Token::String(text), shape) => {
                let text = text.trim();
                if text.is_empty() {
                    return Ok(None);
                }
                let value = self.parse_text(text)?;
                match shape {
                    Shape::Epoch(EpochAccess {
                        adjust: Some(adjust),
                        ..
                    }) if ctx.mode.adjust_to_context_zone => {
                        tracing::debug!(target_type = self.name, zone = %ctx.zone, "adjusting parsed value to context zone");
                        Ok(Some(adjust(&value, &ctx.zone)))
                    }
                    _ => Ok(Some(value)),
                }
            }
            (Token::Decimal(value), Shape::Epoch(access)) => {
                let (seconds, nanos) = decimal::split_decimal(value).ok_or_else(|| {
                    self.out_of_range(format!("{value} seconds does not fit a 64-bit epoch"))
                })?;
                self.from_epoch(access, seconds, nanos, ctx).map(Some)
            }
            (Token::Integer(value), Shape::Epoch(access)) => {
                let (seconds, nanos) = if ctx.mode.nanosecond_resolution {
                    (*value, 0)
                } else {
                    let millis = value.rem_euclid(1_000) as u32;
                    (value.div_euclid(1_000), millis * NANOS_PER_MILLI)
                };
                self.from_epoch(access, seconds, nanos, ctx).map(Some)
            }
            (Token::Array(items), Shape::Fields(access)) => {
                let fields = self.decode_fields(access.layout, items, &ctx.mode)?;
                (access.from_fields)(&fields)
                    .map(Some)
                    .ok_or_else(|| self.invalid_fields(format!("{fields:?} is not a valid value")))
            }
            (Token::Integer(value), Shape::Ordinal(access)) => (access.from)(*value)
                .map(Some)
                .ok_or_else(|| self.out_of_range(format!("{value}"))),
            _ => Err(Error::UnsupportedTokenKind {
                target: self.name,
                found: token.kind(),
                expected: self.expected_kinds(),
            }),
        }
    }

    fn parse_text(&self, text: &str) -> Result<T> {
        (self.parse)(text).map_err(|reason| {
            tracing::debug!(target_type = self.name, input = text, %reason, "temporal string rejected");
            Error::MalformedTemporalString {
                target: self.name,
                input: text.to_owned(),
                reason,
            }
        })
    }

    fn from_epoch(
        &self,
        access: &EpochAccess<T>,
        seconds: i64,
        nanos: u32,
        ctx: &Context,
    ) -> Result<T> {
        (access.from_epoch)(seconds, nanos, &ctx.zone).ok_or_else(|| {
            self.out_of_range(decimal::to_decimal_string(seconds, nanos))
        })
    }

    fn decode_fields(
        &self,
        layout: FieldLayout,
        items: &[Token],
        mode: &EncodingMode,
    ) -> Result<CalendarFields> {
        let (numbers, offset) = match (layout.has_offset(), items.split_last()) {
            (true, Some((Token::String(offset), numbers))) => {
                let offset = parse_offset(offset.trim()).map_err(|reason| {
                    Error::MalformedTemporalString {
                        target: self.name,
                        input: offset.clone(),
                        reason,
                    }
                })?;
                (numbers, Some(offset))
            }
            (true, _) => return Err(self.invalid_fields("missing trailing offset string".into())),
            (false, _) => (items, None),
        };

        let required = layout.required_fields();
        let max = layout.max_fields();
        if numbers.len() < required || numbers.len() > max {
            return Err(self.invalid_fields(format!(
                "expected {required} to {max} numeric fields, found {}",
                numbers.len()
            )));
        }

        let mut values = [0i64; 7];
        for (slot, item) in values.iter_mut().zip(numbers) {
            *slot = item.as_i64().ok_or_else(|| {
                self.invalid_fields(format!("expected integer fields, found {}", item.kind()))
            })?;
        }
        let values = &values[..numbers.len()];

        let mut fields = CalendarFields {
            offset,
            ..CalendarFields::default()
        };
        let mut rest = values;
        if layout.has_date() {
            fields.year = self.field(rest[0], "year")?;
            fields.month = self.field(rest[1], "month")?;
            fields.day = self.field(rest[2], "day")?;
            rest = &rest[3..];
        }
        if layout.has_time() {
            fields.hour = self.field(rest[0], "hour")?;
            fields.minute = self.field(rest[1], "minute")?;
            if let Some(&second) = rest.get(2) {
                fields.second = self.field(second, "second")?;
            }
            if let Some(&sub) = rest.get(3) {
                let sub: u32 = self.field(sub, "sub-second")?;
                // in millisecond mode anything past 999 can only be nanoseconds
                fields.nano = if mode.nanosecond_resolution || sub >= 1_000 {
                    sub
                } else {
                    sub * NANOS_PER_MILLI
                };
                if fields.nano >= NANOS_PER_SECOND {
                    return Err(self.invalid_fields(format!("sub-second {sub} out of range")));
                }
            }
        }
        Ok(fields)
    }

    fn field<N: TryFrom<i64>>(&self, value: i64, what: &str) -> Result<N> {
        N::try_from(value).map_err(|_| self.invalid_fields(format!("{what} {value} out of range")))
    }

    fn expected_kinds(&self) -> &'static str {
        match self.shape {
            Shape::Epoch(_) => "decimal, integer, or string",
            Shape::Fields(_) => "array or string",
            Shape::Ordinal(_) => "integer or string",
            Shape::Text => "string",
        }
    }

    fn invalid_fields(&self, reason: String) -> Error {
        Error::InvalidFieldArray {
            target: self.name,
            reason,
        }
    }

    fn out_of_range(&self, detail: String) -> Error {
        Error::OutOfRange {
            target: self.name,
            detail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A minimal epoch type: seconds and nanos since the epoch, no zone.
    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Stamp(i64, u32);

    fn stamp_format(s: &Stamp) -> String {
        format!("stamp:{}", decimal::to_decimal_string(s.0, s.1))
    }

    fn stamp_parse(text: &str) -> std::result::Result<Stamp, String> {
        let body = text.strip_prefix("stamp:").ok_or("missing prefix")?;
        let value = decimal::parse_decimal(body).map_err(|e| e.to_string())?;
        decimal::split_decimal(&value)
            .map(|(s, n)| Stamp(s, n))
            .ok_or_else(|| "out of range".to_owned())
    }

    static STAMP: Codec<Stamp> = Codec {
        name: "Stamp",
        format: stamp_format,
        parse: stamp_parse,
        shape: Shape::Epoch(EpochAccess {
            epoch_second: |s| s.0,
            nano: |s| s.1,
            epoch_milli: |s| s.0 * 1_000 + i64::from(s.1 / 1_000_000),
            from_epoch: |s, n, _| (s < 1 << 40).then_some(Stamp(s, n)),
            adjust: None,
        }),
    };

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Clock(u32, u32, u32, u32);

    static CLOCK: Codec<Clock> = Codec {
        name: "Clock",
        format: |c| format!("{:02}:{:02}:{:02}.{:09}", c.0, c.1, c.2, c.3),
        parse: |_| Err("clock strings are not supported".to_owned()),
        shape: Shape::Fields(FieldAccess {
            layout: FieldLayout::Time,
            to_fields: |c| CalendarFields {
                hour: c.0,
                minute: c.1,
                second: c.2,
                nano: c.3,
                ..CalendarFields::default()
            },
            from_fields: |f| (f.hour < 24 && f.minute < 60).then_some(Clock(f.hour, f.minute, f.second, f.nano)),
        }),
    };

    fn ints(values: &[i64]) -> Token {
        Token::Array(values.iter().copied().map(Token::Integer).collect())
    }

    #[test]
    fn epoch_encoding_follows_flags() {
        let value = Stamp(15, 72);
        assert_eq!(STAMP.encode(&value, &EncodingMode::DEFAULT), Token::decimal(15, 72));
        assert_eq!(STAMP.encode(&value, &EncodingMode::MILLISECONDS), Token::Integer(15_000));
        assert_eq!(
            STAMP.encode(&value, &EncodingMode::ISO_STRINGS),
            Token::from("stamp:15.000000072")
        );
    }

    #[test]
    fn epoch_decoding_dispatches_on_token() {
        let ctx = Context::default();
        let decimal = Token::Decimal("19827342231.192837465".parse().unwrap());
        assert_eq!(STAMP.decode(&decimal, &ctx).unwrap(), Some(Stamp(19_827_342_231, 192_837_465)));

        assert_eq!(STAMP.decode(&Token::Integer(42), &ctx).unwrap(), Some(Stamp(42, 0)));
        let millis = Context::from(EncodingMode::MILLISECONDS);
        assert_eq!(
            STAMP.decode(&Token::Integer(-1_500), &millis).unwrap(),
            Some(Stamp(-2, 500_000_000))
        );
        assert_eq!(
            STAMP.decode(&Token::from(" stamp:1.5 "), &ctx).unwrap(),
            Some(Stamp(1, 500_000_000))
        );
    }

    #[test]
    fn absent_values() {
        let ctx = Context::default();
        assert_eq!(STAMP.decode(&Token::Null, &ctx).unwrap(), None);
        assert_eq!(STAMP.decode(&Token::from(""), &ctx).unwrap(), None);
        assert_eq!(STAMP.decode(&Token::from("  \t "), &ctx).unwrap(), None);
        assert_eq!(CLOCK.decode(&Token::from(" "), &ctx).unwrap(), None);
    }

    #[test]
    fn wrong_tokens_are_rejected() {
        let ctx = Context::default();
        let err = STAMP.decode(&Token::Bool(true), &ctx).unwrap_err();
        assert_eq!(
            err,
            Error::UnsupportedTokenKind {
                target: "Stamp",
                found: crate::token::TokenKind::Bool,
                expected: "decimal, integer, or string",
            }
        );
        assert!(matches!(
            CLOCK.decode(&Token::Integer(5), &ctx),
            Err(Error::UnsupportedTokenKind { expected: "array or string", .. })
        ));
        assert!(matches!(
            STAMP.decode(&ints(&[1, 2]), &ctx),
            Err(Error::UnsupportedTokenKind { .. })
        ));
    }

    #[test]
    fn malformed_strings_and_ranges() {
        let ctx = Context::default();
        assert!(matches!(
            STAMP.decode(&Token::from("nope"), &ctx),
            Err(Error::MalformedTemporalString { input, .. }) if input == "nope"
        ));
        assert!(matches!(
            STAMP.decode(&Token::Integer(1 << 41), &ctx),
            Err(Error::OutOfRange { .. })
        ));
        let huge = Token::Decimal("99999999999999999999.5".parse().unwrap());
        assert!(matches!(STAMP.decode(&huge, &ctx), Err(Error::OutOfRange { .. })));
    }

    #[test]
    fn field_arrays_drop_trailing_zeros() {
        let mode = EncodingMode::DEFAULT;
        assert_eq!(CLOCK.encode(&Clock(15, 43, 0, 0), &mode), ints(&[15, 43]));
        assert_eq!(CLOCK.encode(&Clock(9, 22, 57, 0), &mode), ints(&[9, 22, 57]));
        assert_eq!(CLOCK.encode(&Clock(9, 22, 0, 57), &mode), ints(&[9, 22, 0, 57]));
    }

    #[test]
    fn field_arrays_switch_resolution() {
        let small = Clock(22, 31, 5, 829_837);
        let large = Clock(22, 31, 5, 422_829_837);
        assert_eq!(CLOCK.encode(&small, &EncodingMode::DEFAULT), ints(&[22, 31, 5, 829_837]));
        assert_eq!(CLOCK.encode(&small, &EncodingMode::MILLISECONDS), ints(&[22, 31, 5, 0]));
        assert_eq!(CLOCK.encode(&large, &EncodingMode::DEFAULT), ints(&[22, 31, 5, 422_829_837]));
        assert_eq!(CLOCK.encode(&large, &EncodingMode::MILLISECONDS), ints(&[22, 31, 5, 422]));
    }

    #[test]
    fn field_arrays_decode() {
        let nanos = Context::default();
        let millis = Context::from(EncodingMode::MILLISECONDS);
        assert_eq!(CLOCK.decode(&ints(&[15, 43]), &nanos).unwrap(), Some(Clock(15, 43, 0, 0)));
        assert_eq!(CLOCK.decode(&ints(&[9, 22, 0, 57]), &nanos).unwrap(), Some(Clock(9, 22, 0, 57)));
        assert_eq!(
            CLOCK.decode(&ints(&[9, 22, 0, 57]), &millis).unwrap(),
            Some(Clock(9, 22, 0, 57_000_000))
        );
        assert_eq!(
            CLOCK.decode(&ints(&[22, 31, 5, 829_837]), &millis).unwrap(),
            Some(Clock(22, 31, 5, 829_837))
        );
    }

    #[test]
    fn field_arrays_reject_bad_shapes() {
        let ctx = Context::default();
        for bad in [ints(&[15]), ints(&[1, 2, 3, 4, 5]), ints(&[25, 0]), ints(&[-1, 0])] {
            assert!(
                matches!(CLOCK.decode(&bad, &ctx), Err(Error::InvalidFieldArray { .. })),
                "{bad:?}"
            );
        }
        let mixed = Token::Array(vec![Token::Integer(1), Token::from("2")]);
        assert!(matches!(CLOCK.decode(&mixed, &ctx), Err(Error::InvalidFieldArray { .. })));
        assert!(matches!(
            CLOCK.decode(&ints(&[1, 2, 3, 1_000_000_000]), &ctx),
            Err(Error::InvalidFieldArray { .. })
        ));
    }

    #[test]
    fn layout_bounds() {
        assert_eq!(FieldLayout::Date.required_fields(), 3);
        assert_eq!(FieldLayout::Date.max_fields(), 3);
        assert_eq!(FieldLayout::DateTime.required_fields(), 5);
        assert_eq!(FieldLayout::DateTime.max_fields(), 7);
        assert_eq!(FieldLayout::OffsetTime.max_fields(), 4);
        assert!(FieldLayout::OffsetTime.has_offset());
    }
}
