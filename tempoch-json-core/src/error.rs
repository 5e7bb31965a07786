// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

use thiserror::Error;

use crate::token::TokenKind;

/// Errors raised while decoding temporal values.
///
/// Encoding never fails.  Every decoding error is raised where it is
/// detected and carries the name of the target type.  An empty string is
/// **not** an error: it decodes to `Ok(None)`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The token is not one of the kinds the target type accepts.
    #[error("{target}: unexpected {found} token, expected {expected}")]
    UnsupportedTokenKind {
        target: &'static str,
        found: TokenKind,
        expected: &'static str,
    },

    /// The temporal library rejected a non-empty string.
    #[error("{target}: cannot parse {input:?}: {reason}")]
    MalformedTemporalString {
        target: &'static str,
        input: String,
        reason: String,
    },

    /// A calendar-field array has the wrong shape or an out-of-range field.
    #[error("{target}: invalid field array: {reason}")]
    InvalidFieldArray {
        target: &'static str,
        reason: String,
    },

    /// An epoch value outside the representable range of the target type.
    #[error("{target}: value out of range: {detail}")]
    OutOfRange {
        target: &'static str,
        detail: String,
    },

    /// A numeric token whose text is not a decimal number.
    #[error("invalid decimal number {input:?}: {reason}")]
    InvalidNumber { input: String, reason: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_target() {
        let err = Error::UnsupportedTokenKind {
            target: "Instant",
            found: TokenKind::Bool,
            expected: "decimal, integer, or string",
        };
        assert_eq!(
            err.to_string(),
            "Instant: unexpected boolean token, expected decimal, integer, or string"
        );

        let err = Error::MalformedTemporalString {
            target: "LocalDate",
            input: "2013-13-01".into(),
            reason: "input is out of range".into(),
        };
        assert!(err.to_string().starts_with("LocalDate: cannot parse \"2013-13-01\""));
    }
}
