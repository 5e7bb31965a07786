// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Per-call encoding flags and decoding context.
//!
//! Nothing here is global: the host resolves an [`EncodingMode`] (and, for
//! decoding, a [`Context`]) once per call and passes it by value.  Both are
//! `Copy` and immutable, so any number of threads may share one.

use crate::zone::ZoneId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The three flags that select an encoding.
///
/// All flags default to `true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EncodingMode {
    /// Write numeric timestamps (or field arrays) instead of ISO strings.
    pub write_timestamps: bool,
    /// Sub-second precision is nanoseconds and epoch values are decimal
    /// seconds; otherwise milliseconds and whole numbers.
    pub nanosecond_resolution: bool,
    /// Convert parsed zoned or offset strings to the reference zone.
    pub adjust_to_context_zone: bool,
}

impl EncodingMode {
    pub const DEFAULT: EncodingMode = EncodingMode {
        write_timestamps: true,
        nanosecond_resolution: true,
        adjust_to_context_zone: true,
    };

    /// ISO strings everywhere.
    pub const ISO_STRINGS: EncodingMode = EncodingMode::DEFAULT.with_timestamps(false);

    /// Epoch milliseconds and millisecond sub-second fields.
    pub const MILLISECONDS: EncodingMode = EncodingMode::DEFAULT.with_nanoseconds(false);

    #[inline]
    pub const fn with_timestamps(self, write_timestamps: bool) -> Self {
        Self {
            write_timestamps,
            ..self
        }
    }

    #[inline]
    pub const fn with_nanoseconds(self, nanosecond_resolution: bool) -> Self {
        Self {
            nanosecond_resolution,
            ..self
        }
    }

    #[inline]
    pub const fn with_zone_adjustment(self, adjust_to_context_zone: bool) -> Self {
        Self {
            adjust_to_context_zone,
            ..self
        }
    }
}

impl Default for EncodingMode {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Everything a decoder needs besides the token: the flags and the
/// reference zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Context {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub mode: EncodingMode,
    /// Zone attached to numeric timestamps, and the target of
    /// [`EncodingMode::adjust_to_context_zone`].
    pub zone: ZoneId,
}

impl Context {
    pub const fn new(mode: EncodingMode, zone: ZoneId) -> Self {
        Self { mode, zone }
    }

    #[inline]
    pub const fn with_zone(self, zone: ZoneId) -> Self {
        Self { zone, ..self }
    }
}

impl From<EncodingMode> for Context {
    fn from(mode: EncodingMode) -> Self {
        Self::new(mode, ZoneId::UTC)
    }
}
