// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! `serde_json` bridge.
//!
//! Numbers travel as their exact text (`arbitrary_precision`), so a decimal
//! such as `19827342231.192837465` reaches the codec without ever becoming
//! an `f64`.

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use serde::de::{DeserializeSeed, Deserializer};
use serde::ser::{Error as _, SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use thiserror::Error;

use tempoch_json_core::decimal::parse_decimal;
use tempoch_json_core::{Context, EncodingMode, Temporal, Token};

/// Errors raised by the bridge.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Codec(#[from] tempoch_json_core::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// ═══════════════════════════════════════════════════════════════════════════
// Value ⇄ Token
// ═══════════════════════════════════════════════════════════════════════════

/// Lift a parsed JSON value into a [`Token`].
///
/// Integers that fit `i64` stay integers; every other number is read as an
/// exact decimal.
pub fn token_from_value(value: &Value) -> tempoch_json_core::Result<Token> {
    Ok(match value {
        Value::Null => Token::Null,
        Value::Bool(b) => Token::Bool(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Token::Integer(i),
            None => Token::Decimal(parse_decimal(&n.to_string())?),
        },
        Value::String(s) => Token::String(s.clone()),
        Value::Array(items) => {
            Token::Array(items.iter().map(token_from_value).collect::<Result<_, _>>()?)
        }
        Value::Object(_) => Token::Object,
    })
}

/// Lower a [`Token`] into a JSON value, keeping decimal digits exact.
pub fn value_from_token(token: &Token) -> Result<Value> {
    Ok(match token {
        Token::Null => Value::Null,
        Token::Bool(b) => Value::Bool(*b),
        Token::Integer(i) => Value::Number((*i).into()),
        Token::Decimal(d) => Value::Number(Number::from_str(&d.to_string())?),
        Token::String(s) => Value::String(s.clone()),
        Token::Array(items) => {
            Value::Array(items.iter().map(value_from_token).collect::<Result<_>>()?)
        }
        Token::Object => Value::Object(Map::new()),
    })
}

fn serialize_token<S: Serializer>(token: &Token, serializer: S) -> Result<S::Ok, S::Error> {
    match token {
        Token::Null => serializer.serialize_unit(),
        Token::Bool(b) => serializer.serialize_bool(*b),
        Token::Integer(i) => serializer.serialize_i64(*i),
        Token::Decimal(d) => Number::from_str(&d.to_string())
            .map_err(S::Error::custom)?
            .serialize(serializer),
        Token::String(s) => serializer.serialize_str(s),
        Token::Array(items) => {
            let mut seq = serializer.serialize_seq(Some(items.len()))?;
            for item in items {
                seq.serialize_element(&TokenRef(item))?;
            }
            seq.end()
        }
        Token::Object => Map::new().serialize(serializer),
    }
}

struct TokenRef<'a>(&'a Token);

impl Serialize for TokenRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_token(self.0, serializer)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Serde adapters
// ═══════════════════════════════════════════════════════════════════════════

/// Serializes a temporal value under a fixed [`EncodingMode`].
///
/// JSON only: decimal seconds are emitted as a `serde_json::Number` with
/// `arbitrary_precision`, which other serializers receive as a private
/// single-entry map rather than a number.
pub struct Encoder<'a, T> {
    value: &'a T,
    mode: EncodingMode,
}

impl<'a, T: Temporal> Encoder<'a, T> {
    pub const fn new(value: &'a T, mode: EncodingMode) -> Self {
        Self { value, mode }
    }
}

impl<T: Temporal> Serialize for Encoder<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_token(&self.value.encode(&self.mode), serializer)
    }
}

impl<T: Temporal + fmt::Debug> fmt::Debug for Encoder<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Encoder")
            .field("value", self.value)
            .field("mode", &self.mode)
            .finish()
    }
}

/// Deserializes an optional temporal value under a fixed [`Context`].
///
/// `null` and blank strings produce `None`.
pub struct Seed<T> {
    ctx: Context,
    marker: PhantomData<fn() -> T>,
}

impl<T> Seed<T> {
    pub const fn new(ctx: Context) -> Self {
        Self {
            ctx,
            marker: PhantomData,
        }
    }
}

impl<T> Clone for Seed<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Seed<T> {}

impl<T> fmt::Debug for Seed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Seed")
            .field("target", &std::any::type_name::<T>())
            .field("ctx", &self.ctx)
            .finish()
    }
}

impl<'de, T: Temporal> DeserializeSeed<'de> for Seed<T> {
    type Value = Option<T>;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Option<T>, D::Error> {
        use serde::de::Error as _;

        let value = Value::deserialize(deserializer)?;
        let token = token_from_value(&value).map_err(D::Error::custom)?;
        T::decode(&token, &self.ctx).map_err(D::Error::custom)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Mapper
// ═══════════════════════════════════════════════════════════════════════════

/// Reads and writes temporal values under one immutable [`Context`].
///
/// A `Mapper` is `Copy`; share it freely across threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Mapper {
    ctx: Context,
}

impl Mapper {
    pub const fn new(ctx: Context) -> Self {
        Self { ctx }
    }

    /// Build a mapper from a JSON configuration document.
    ///
    /// Missing keys keep their defaults:
    ///
    /// ```json
    /// { "write_timestamps": false, "zone": "Europe/Paris" }
    /// ```
    pub fn from_config_str(config: &str) -> Result<Self> {
        let ctx: Context = serde_json::from_str(config)?;
        tracing::debug!(
            write_timestamps = ctx.mode.write_timestamps,
            nanosecond_resolution = ctx.mode.nanosecond_resolution,
            adjust_to_context_zone = ctx.mode.adjust_to_context_zone,
            zone = %ctx.zone,
            "mapper configured"
        );
        Ok(Self::new(ctx))
    }

    #[inline]
    pub const fn context(&self) -> &Context {
        &self.ctx
    }

    #[inline]
    pub const fn mode(&self) -> EncodingMode {
        self.ctx.mode
    }

    pub fn encoder<'a, T: Temporal>(&self, value: &'a T) -> Encoder<'a, T> {
        Encoder::new(value, self.ctx.mode)
    }

    pub fn seed<T: Temporal>(&self) -> Seed<T> {
        Seed::new(self.ctx)
    }

    pub fn to_value<T: Temporal>(&self, value: &T) -> Result<Value> {
        value_from_token(&value.encode(&self.ctx.mode))
    }

    /// Encode `value` and write it as compact JSON text.
    pub fn write_string<T: Temporal>(&self, value: &T) -> Result<String> {
        Ok(serde_json::to_string(&self.encoder(value))?)
    }

    pub fn from_value<T: Temporal>(&self, value: &Value) -> Result<Option<T>> {
        let token = token_from_value(value)?;
        Ok(T::decode(&token, &self.ctx)?)
    }

    /// Parse JSON text and decode it; `Ok(None)` for the absent value.
    pub fn read_str<T: Temporal>(&self, text: &str) -> Result<Option<T>> {
        let value: Value = serde_json::from_str(text)?;
        self.from_value(&value)
    }
}

impl From<Context> for Mapper {
    fn from(ctx: Context) -> Self {
        Self::new(ctx)
    }
}

impl From<EncodingMode> for Mapper {
    fn from(mode: EncodingMode) -> Self {
        Self::new(Context::from(mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, NaiveDate, Utc};
    use tempoch_json_core::{Decimal, TokenKind};

    #[test]
    fn numbers_keep_their_digits() {
        let value: Value = serde_json::from_str("19827342231.192837465").unwrap();
        let token = token_from_value(&value).unwrap();
        assert_eq!(token, Token::Decimal(Decimal::from_str("19827342231.192837465").unwrap()));

        let value: Value = serde_json::from_str("[1986, 1e0]").unwrap();
        let token = token_from_value(&value).unwrap();
        assert_eq!(
            token,
            Token::Array(vec![Token::Integer(1986), Token::Decimal(Decimal::ONE)])
        );
        assert_eq!(token_from_value(&serde_json::json!({"a": 1})).unwrap().kind(), TokenKind::Object);
    }

    #[test]
    fn decimal_tokens_render_nine_digits() {
        let value = value_from_token(&Token::decimal(15, 72)).unwrap();
        assert_eq!(value.to_string(), "15.000000072");
        let zero = value_from_token(&Token::decimal(0, 0)).unwrap();
        assert_eq!(zero.to_string(), "0.000000000");
    }

    #[test]
    fn encoder_writes_tokens() {
        let instant = DateTime::from_timestamp(1_370_000_000, 500_000_000).unwrap();
        let json = serde_json::to_string(&Encoder::new(&instant, EncodingMode::DEFAULT)).unwrap();
        assert_eq!(json, "1370000000.500000000");
        let json =
            serde_json::to_string(&Encoder::new(&instant, EncodingMode::MILLISECONDS)).unwrap();
        assert_eq!(json, "1370000000500");
    }

    #[test]
    fn seed_reads_optional_values() {
        let seed = Mapper::default().seed::<NaiveDate>();
        let mut de = serde_json::Deserializer::from_str("[2013, 8, 21]");
        assert_eq!(seed.deserialize(&mut de).unwrap(), NaiveDate::from_ymd_opt(2013, 8, 21));
        let mut de = serde_json::Deserializer::from_str("null");
        assert_eq!(seed.deserialize(&mut de).unwrap(), None);
        let mut de = serde_json::Deserializer::from_str("true");
        let err = seed.deserialize(&mut de).unwrap_err();
        assert!(err.to_string().contains("LocalDate"), "{err}");
    }

    #[test]
    fn mapper_from_config() {
        let mapper = Mapper::from_config_str(r#"{ "write_timestamps": false }"#).unwrap();
        assert!(!mapper.mode().write_timestamps);
        assert!(mapper.mode().nanosecond_resolution);

        let instant: DateTime<Utc> = "2011-12-03T10:15:30Z".parse().unwrap();
        assert_eq!(mapper.write_string(&instant).unwrap(), r#""2011-12-03T10:15:30Z""#);

        assert!(matches!(Mapper::from_config_str("{"), Err(Error::Json(_))));
        assert!(matches!(
            Mapper::from_config_str(r#"{ "zone": "Mars/Olympus" }"#),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn mapper_surfaces_codec_errors() {
        let err = Mapper::default().read_str::<NaiveDate>("{}").unwrap_err();
        assert!(matches!(
            err,
            Error::Codec(tempoch_json_core::Error::UnsupportedTokenKind { .. })
        ));
        assert_eq!(err.to_string(), "LocalDate: unexpected object token, expected array or string");
    }

    #[test]
    fn tiny_exponent_decimals_read_as_epoch() {
        let mapper = Mapper::default();
        let epoch = DateTime::from_timestamp(0, 0);
        for text in ["1e-28", "1e-30", "5E-29", "-1e-40"] {
            assert_eq!(mapper.read_str::<DateTime<Utc>>(text).unwrap(), epoch, "{text}");
        }
        assert_eq!(
            mapper.read_str::<DateTime<Utc>>("1.5e-8").unwrap(),
            DateTime::from_timestamp(0, 15)
        );
        assert_eq!(
            mapper.read_str::<DateTime<Utc>>("1.370000000500e9").unwrap(),
            DateTime::from_timestamp(1_370_000_000, 500_000_000)
        );
    }
}
