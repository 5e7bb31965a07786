// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! JSON Binding for chrono
//!
//! This crate is a façade over `tempoch-json-core` and re-exports its public
//! API, adding the `serde_json` bridge in [`json`].
//!
//! # Core types
//!
//! - [`Mapper`] — reads and writes temporal values under one [`Context`].
//! - [`Encoder`] — a `Serialize` view of a temporal value.
//! - [`Seed`] — a `DeserializeSeed` producing an optional temporal value.
//! - [`Temporal`] — implemented by every supported type.
//! - [`EncodingMode`] — timestamps vs strings, nanoseconds vs milliseconds,
//!   and zone adjustment.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use tempoch_json::{EncodingMode, Mapper};
//!
//! let value = NaiveDate::from_ymd_opt(1986, 1, 17)
//!     .unwrap()
//!     .and_hms_opt(15, 43, 0)
//!     .unwrap();
//!
//! let mapper = Mapper::default();
//! assert_eq!(mapper.write_string(&value).unwrap(), "[1986,1,17,15,43]");
//!
//! let iso = Mapper::from(EncodingMode::ISO_STRINGS);
//! assert_eq!(iso.write_string(&value).unwrap(), r#""1986-01-17T15:43:00""#);
//! ```

pub mod json;

pub use json::{token_from_value, value_from_token, Encoder, Mapper, Seed};

pub use tempoch_json_core::{
    calendar, codec, decimal, duration, iso, zone, CalendarFields, Codec, Context, Decimal,
    EncodingMode, Error, FieldLayout, MonthDay, OffsetTime, Period, Result, Shape, Temporal,
    Token, TokenKind, Year, YearMonth, ZoneId, ZonedDateTime,
};
