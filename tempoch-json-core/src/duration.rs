// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! ISO-8601 text form and second/nanosecond split of [`TimeDelta`].
//!
//! Durations are written as `PT8H6M12.345S`: hours, minutes and seconds
//! only, with no day component, each carrying its own sign.

use chrono::TimeDelta;
use std::fmt::Write;

use crate::decimal::NANOS_PER_SECOND;

const NANOS: i128 = NANOS_PER_SECOND as i128;

/// Floor seconds and non-negative nanoseconds of a duration.
pub fn split_duration(delta: &TimeDelta) -> (i64, u32) {
    let seconds = delta.num_seconds();
    let nanos = delta.subsec_nanos();
    if nanos < 0 {
        (seconds - 1, (nanos + NANOS_PER_SECOND as i32) as u32)
    } else {
        (seconds, nanos as u32)
    }
}

/// Whole milliseconds, rounded toward negative infinity.
pub fn duration_millis(delta: &TimeDelta) -> i64 {
    let (seconds, nanos) = split_duration(delta);
    seconds
        .saturating_mul(1_000)
        .saturating_add(i64::from(nanos / 1_000_000))
}

/// Render a duration as `PT[nH][nM][n[.f]S]`; zero is `PT0S`.
pub fn format_duration(delta: &TimeDelta) -> String {
    let (seconds, nanos) = split_duration(delta);
    if seconds == 0 && nanos == 0 {
        return "PT0S".to_owned();
    }
    let borrowed = seconds < 0 && nanos > 0;
    let effective = if borrowed { seconds + 1 } else { seconds };
    let hours = effective / 3600;
    let minutes = (effective % 3600) / 60;
    let secs = effective % 60;

    let mut out = String::from("PT");
    if hours != 0 {
        let _ = write!(out, "{hours}H");
    }
    if minutes != 0 {
        let _ = write!(out, "{minutes}M");
    }
    if secs == 0 && nanos == 0 && out.len() > 2 {
        return out;
    }
    if borrowed && secs == 0 {
        out.push_str("-0");
    } else {
        let _ = write!(out, "{secs}");
    }
    if nanos > 0 {
        let fraction = if borrowed { NANOS_PER_SECOND - nanos } else { nanos };
        let digits = format!("{fraction:09}");
        out.push('.');
        out.push_str(digits.trim_end_matches('0'));
    }
    out.push('S');
    out
}

/// Parse `[±]P[nD][T[nH][nM][n[.f]S]]`, case-insensitively.
pub fn parse_duration(text: &str) -> Result<TimeDelta, String> {
    let upper = text.to_ascii_uppercase();
    let (negate, rest) = match upper.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, upper.strip_prefix('+').unwrap_or(&upper)),
    };
    let rest = rest
        .strip_prefix('P')
        .ok_or_else(|| format!("duration {text:?} must start with 'P'"))?;
    let (date_part, time_part) = match rest.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (rest, None),
    };

    let mut total: i128 = 0;
    let mut seen = false;
    if !date_part.is_empty() {
        let days = date_part
            .strip_suffix('D')
            .ok_or_else(|| format!("duration {text:?} has an invalid date part"))?;
        total += parse_whole(days, text)? * 86_400 * NANOS;
        seen = true;
    }
    if let Some(mut time) = time_part {
        if time.is_empty() {
            return Err(format!("duration {text:?} has an empty time part"));
        }
        for (unit, seconds) in [('H', 3600), ('M', 60)] {
            if let Some(idx) = time.find(unit) {
                total += parse_whole(&time[..idx], text)? * seconds * NANOS;
                time = &time[idx + 1..];
                seen = true;
            }
        }
        if !time.is_empty() {
            let secs = time
                .strip_suffix('S')
                .ok_or_else(|| format!("duration {text:?} has trailing characters"))?;
            total += parse_seconds(secs, text)?;
            seen = true;
        }
    }
    if !seen {
        return Err(format!("duration {text:?} has no components"));
    }
    if negate {
        total = -total;
    }

    let seconds = i64::try_from(total.div_euclid(NANOS))
        .map_err(|_| format!("duration {text:?} is out of range"))?;
    let nanos = total.rem_euclid(NANOS) as u32;
    TimeDelta::new(seconds, nanos).ok_or_else(|| format!("duration {text:?} is out of range"))
}

fn parse_whole(number: &str, text: &str) -> Result<i128, String> {
    number
        .parse::<i64>()
        .map(i128::from)
        .map_err(|e| format!("duration {text:?} has an invalid number {number:?}: {e}"))
}

/// Seconds with an optional fraction of up to nine digits, as nanoseconds.
fn parse_seconds(number: &str, text: &str) -> Result<i128, String> {
    let (whole, fraction) = match number.split_once(['.', ',']) {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (number, None),
    };
    let negative = whole.starts_with('-');
    let mut nanos = parse_whole(whole, text)? * NANOS;
    if let Some(fraction) = fraction {
        if fraction.is_empty()
            || fraction.len() > 9
            || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(format!("duration {text:?} has an invalid fraction {fraction:?}"));
        }
        let scaled: i128 = format!("{fraction:0<9}")
            .parse()
            .map_err(|e| format!("duration {text:?} has an invalid fraction: {e}"))?;
        nanos += if negative { -scaled } else { scaled };
    }
    Ok(nanos)
}
