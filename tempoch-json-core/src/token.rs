// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Lexed JSON values exchanged with the host serializer.
//!
//! A [`Token`] is what the host hands the decoder after lexing one JSON value,
//! and what the encoder hands back for the host to write.  Numbers are kept
//! in two distinct kinds: [`Token::Integer`] for literals without a decimal
//! point and [`Token::Decimal`] for everything else, carried as an exact
//! [`Decimal`] so no nanosecond is lost to binary floating point.

use rust_decimal::Decimal;
use std::fmt;

use crate::decimal;

/// One JSON value, already lexed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Null,
    Bool(bool),
    Integer(i64),
    Decimal(Decimal),
    String(String),
    Array(Vec<Token>),
    /// A JSON object.  Its members are never inspected by the temporal codecs.
    Object,
}

/// The kind of a [`Token`], used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Null,
    Bool,
    Integer,
    Decimal,
    String,
    Array,
    Object,
}

impl Token {
    /// The decimal numeric token for `seconds + nanoseconds / 10⁹`.
    pub fn decimal(seconds: i64, nanoseconds: u32) -> Self {
        Token::Decimal(decimal::to_decimal(seconds, nanoseconds))
    }

    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Null => TokenKind::Null,
            Token::Bool(_) => TokenKind::Bool,
            Token::Integer(_) => TokenKind::Integer,
            Token::Decimal(_) => TokenKind::Decimal,
            Token::String(_) => TokenKind::String,
            Token::Array(_) => TokenKind::Array,
            Token::Object => TokenKind::Object,
        }
    }

    /// The integer payload, if this is an integer token.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Token::Integer(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Null => "null",
            TokenKind::Bool => "boolean",
            TokenKind::Integer => "integer",
            TokenKind::Decimal => "decimal",
            TokenKind::String => "string",
            TokenKind::Array => "array",
            TokenKind::Object => "object",
        };
        f.write_str(name)
    }
}

impl From<i64> for Token {
    fn from(value: i64) -> Self {
        Token::Integer(value)
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Token::String(value.to_owned())
    }
}

impl From<String> for Token {
    fn from(value: String) -> Self {
        Token::String(value)
    }
}

impl From<Decimal> for Token {
    fn from(value: Decimal) -> Self {
        Token::Decimal(value)
    }
}

impl From<Vec<Token>> for Token {
    fn from(items: Vec<Token>) -> Self {
        Token::Array(items)
    }
}
