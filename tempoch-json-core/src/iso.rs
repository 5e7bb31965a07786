// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Canonical ISO-8601 text forms of the chrono types.
//!
//! Formatting always writes seconds and prints the fraction in groups of
//! three digits only when it is non-zero.  Parsing is lenient about a
//! missing seconds field on local times, which older writers omit.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};

const LOCAL_TIME: &str = "%H:%M:%S%.f";
const LOCAL_TIME_NO_SECONDS: &str = "%H:%M";
const LOCAL_DATE: &str = "%Y-%m-%d";
const LOCAL_DATE_TIME: &str = "%Y-%m-%dT%H:%M:%S%.f";
const LOCAL_DATE_TIME_NO_SECONDS: &str = "%Y-%m-%dT%H:%M";

// ── instants ──────────────────────────────────────────────────────────────

pub fn format_instant(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Any RFC 3339 stamp, normalised to UTC.
pub fn parse_instant(text: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| e.to_string())
}

pub fn format_offset_date_time(value: &DateTime<FixedOffset>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

pub fn parse_offset_date_time(text: &str) -> Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(text).map_err(|e| e.to_string())
}

// ── local values ──────────────────────────────────────────────────────────

pub fn format_local_date(value: &NaiveDate) -> String {
    value.format(LOCAL_DATE).to_string()
}

pub fn parse_local_date(text: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(text, LOCAL_DATE).map_err(|e| e.to_string())
}

pub fn format_local_time(value: &NaiveTime) -> String {
    value.format(LOCAL_TIME).to_string()
}

pub fn parse_local_time(text: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(text, LOCAL_TIME)
        .or_else(|_| NaiveTime::parse_from_str(text, LOCAL_TIME_NO_SECONDS))
        .map_err(|e| e.to_string())
}

pub fn format_local_date_time(value: &NaiveDateTime) -> String {
    value.format(LOCAL_DATE_TIME).to_string()
}

pub fn parse_local_date_time(text: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(text, LOCAL_DATE_TIME)
        .or_else(|_| NaiveDateTime::parse_from_str(text, LOCAL_DATE_TIME_NO_SECONDS))
        .map_err(|e| e.to_string())
}
