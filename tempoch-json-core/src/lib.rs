// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! JSON Codec Core
//!
//! Encodes chrono date/time values into JSON tokens and back, the way a
//! data-binding layer writes them: decimal epoch seconds, epoch
//! milliseconds, calendar-field arrays, or ISO-8601 strings.
//!
//! # Core types
//!
//! - [`Token`] — an already-lexed JSON value, used for both directions.
//! - [`Codec<T>`] — the per-type capability table driving encode and decode.
//! - [`Temporal`] — selects the codec for a type.
//! - [`EncodingMode`] — the three flags that pick an encoding.
//! - [`Context`] — an [`EncodingMode`] plus the reference [`ZoneId`].
//!
//! # Encodings
//!
//! | Flags | Instant | Local date-time |
//! |-------|---------|-----------------|
//! | default | `1370000000.500000000` | `[2013,5,31,11,33,20,500000000]` |
//! | milliseconds | `1370000000500` | `[2013,5,31,11,33,20,500]` |
//! | no timestamps | `"2013-05-31T11:33:20.500Z"` | `"2013-05-31T11:33:20.500"` |
//!
//! # Decimal seconds
//!
//! The [`decimal`] module converts between `(seconds, nanoseconds)` pairs
//! and fixed-scale decimal numbers without passing through floating point.

pub mod calendar;
pub mod codec;
pub mod decimal;
pub mod duration;
mod error;
pub mod iso;
mod mode;
mod registry;
mod token;
pub mod zone;

// ── Re-exports ────────────────────────────────────────────────────────────

pub use calendar::{MonthDay, OffsetTime, Period, Year, YearMonth};
pub use codec::{CalendarFields, Codec, FieldLayout, Shape};
pub use error::{Error, Result};
pub use mode::{Context, EncodingMode};
pub use registry::Temporal;
pub use token::{Token, TokenKind};
pub use zone::{ZoneId, ZonedDateTime};

pub use rust_decimal::Decimal;
