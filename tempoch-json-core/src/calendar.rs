// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Partial calendar values chrono does not model on its own.
//!
//! - [`Year`] — a proleptic ISO year, `2013`.
//! - [`YearMonth`] — a month of a year, `2013-08`.
//! - [`MonthDay`] — a day of a month in no particular year, `--08-21`.
//! - [`Period`] — a date-based amount, `P1Y2M3D`.
//! - [`OffsetTime`] — a wall-clock time at a fixed offset, `10:15:30+01:00`.
//!
//! Field validation is delegated to chrono ([`NaiveDate`], [`NaiveTime`],
//! [`FixedOffset`]); these types only add the ISO-8601 text forms.

use chrono::{FixedOffset, NaiveDate, NaiveTime, Timelike};
use std::fmt;
use std::str::FromStr;

use crate::zone::{format_offset, parse_offset};

/// Year range accepted by [`Year`] and [`YearMonth`].
pub const MIN_YEAR: i32 = -999_999_999;
pub const MAX_YEAR: i32 = 999_999_999;

fn format_year(f: &mut fmt::Formatter<'_>, year: i32) -> fmt::Result {
    if year < 0 {
        write!(f, "-{:04}", year.unsigned_abs())
    } else if year > 9999 {
        write!(f, "+{year}")
    } else {
        write!(f, "{year:04}")
    }
}

fn parse_year(text: &str) -> Result<i32, String> {
    let year: i32 = text
        .parse()
        .map_err(|e| format!("invalid year {text:?}: {e}"))?;
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(format!("year {year} out of range"));
    }
    Ok(year)
}

fn parse_two_digits(text: &str, what: &str) -> Result<u32, String> {
    if text.len() != 2 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("{what} {text:?} must be two digits"));
    }
    text.parse().map_err(|e| format!("invalid {what} {text:?}: {e}"))
}

// ═══════════════════════════════════════════════════════════════════════════
// Year
// ═══════════════════════════════════════════════════════════════════════════

/// A year in the proleptic ISO calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Year(i32);

impl Year {
    /// `None` outside [`MIN_YEAR`]`..=`[`MAX_YEAR`].
    pub const fn new(year: i32) -> Option<Self> {
        if year < MIN_YEAR || year > MAX_YEAR {
            None
        } else {
            Some(Self(year))
        }
    }

    #[inline]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Year {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_year(s).map(Self)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// YearMonth
// ═══════════════════════════════════════════════════════════════════════════

/// A month of a specific year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub const fn new(year: i32, month: u32) -> Option<Self> {
        if year < MIN_YEAR || year > MAX_YEAR || month < 1 || month > 12 {
            None
        } else {
            Some(Self { year, month })
        }
    }

    #[inline]
    pub const fn year(&self) -> i32 {
        self.year
    }

    #[inline]
    pub const fn month(&self) -> u32 {
        self.month
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_year(f, self.year)?;
        write!(f, "-{:02}", self.month)
    }
}

impl FromStr for YearMonth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // the year may carry its own sign, so split on the last dash
        let (year, month) = s
            .rsplit_once('-')
            .ok_or_else(|| format!("year-month {s:?} must look like YYYY-MM"))?;
        let year = parse_year(year)?;
        let month = parse_two_digits(month, "month")?;
        Self::new(year, month).ok_or_else(|| format!("month {month} out of range"))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// MonthDay
// ═══════════════════════════════════════════════════════════════════════════

/// A day of a month, without a year.  `--02-29` is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthDay {
    month: u32,
    day: u32,
}

impl MonthDay {
    /// `None` unless the day exists in the month of a leap year.
    pub fn new(month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(2000, month, day).map(|_| Self { month, day })
    }

    #[inline]
    pub const fn month(&self) -> u32 {
        self.month
    }

    #[inline]
    pub const fn day(&self) -> u32 {
        self.day
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "--{:02}-{:02}", self.month, self.day)
    }
}

impl FromStr for MonthDay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s
            .strip_prefix("--")
            .ok_or_else(|| format!("month-day {s:?} must look like --MM-DD"))?;
        let (month, day) = body
            .split_once('-')
            .ok_or_else(|| format!("month-day {s:?} must look like --MM-DD"))?;
        let month = parse_two_digits(month, "month")?;
        let day = parse_two_digits(day, "day")?;
        Self::new(month, day).ok_or_else(|| format!("--{month:02}-{day:02} is not a valid day"))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Period
// ═══════════════════════════════════════════════════════════════════════════

/// A date-based amount of time: years, months and days, each signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Period {
    pub years: i32,
    pub months: i32,
    pub days: i32,
}

impl Period {
    pub const ZERO: Period = Period::new(0, 0, 0);

    pub const fn new(years: i32, months: i32, days: i32) -> Self {
        Self {
            years,
            months,
            days,
        }
    }

    pub const fn is_zero(&self) -> bool {
        self.years == 0 && self.months == 0 && self.days == 0
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("P0D");
        }
        f.write_str("P")?;
        if self.years != 0 {
            write!(f, "{}Y", self.years)?;
        }
        if self.months != 0 {
            write!(f, "{}M", self.months)?;
        }
        if self.days != 0 {
            write!(f, "{}D", self.days)?;
        }
        Ok(())
    }
}

impl FromStr for Period {
    type Err = String;

    /// Parses `[±]P[nY][nM][nW][nD]`; weeks fold into days.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_ascii_uppercase();
        let (negate, rest) = match upper.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, upper.strip_prefix('+').unwrap_or(&upper)),
        };
        let mut rest = rest
            .strip_prefix('P')
            .ok_or_else(|| format!("period {s:?} must start with 'P'"))?;
        if rest.is_empty() {
            return Err(format!("period {s:?} has no components"));
        }

        let mut values = [0i32; 4];
        let mut last_unit: Option<usize> = None;
        while !rest.is_empty() {
            let end = rest
                .find(|c: char| c.is_ascii_alphabetic())
                .ok_or_else(|| format!("period {s:?} has a number without a unit"))?;
            let unit = match &rest[end..end + 1] {
                "Y" => 0,
                "M" => 1,
                "W" => 2,
                "D" => 3,
                other => return Err(format!("period {s:?} has unknown unit {other:?}")),
            };
            if last_unit.is_some_and(|last| unit <= last) {
                return Err(format!("period {s:?} has units out of order"));
            }
            values[unit] = rest[..end]
                .parse()
                .map_err(|e| format!("period {s:?} has an invalid number: {e}"))?;
            last_unit = Some(unit);
            rest = &rest[end + 1..];
        }

        let [years, months, weeks, days] = values;
        let days = weeks
            .checked_mul(7)
            .and_then(|w| w.checked_add(days))
            .ok_or_else(|| format!("period {s:?} overflows"))?;
        let period = Self::new(years, months, days);
        if negate {
            period
                .years
                .checked_neg()
                .zip(period.months.checked_neg())
                .zip(period.days.checked_neg())
                .map(|((y, m), d)| Self::new(y, m, d))
                .ok_or_else(|| format!("period {s:?} overflows"))
        } else {
            Ok(period)
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// OffsetTime
// ═══════════════════════════════════════════════════════════════════════════

/// A wall-clock time with a fixed UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OffsetTime {
    time: NaiveTime,
    offset: FixedOffset,
}

impl OffsetTime {
    pub const fn new(time: NaiveTime, offset: FixedOffset) -> Self {
        Self { time, offset }
    }

    #[inline]
    pub const fn time(&self) -> NaiveTime {
        self.time
    }

    #[inline]
    pub const fn offset(&self) -> FixedOffset {
        self.offset
    }
}

impl fmt::Display for OffsetTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.time.format("%H:%M:%S%.f"), format_offset(&self.offset))
    }
}

impl FromStr for OffsetTime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let split = s
            .rfind(|c: char| c == '+' || c == '-' || c == 'Z' || c == 'z')
            .ok_or_else(|| format!("offset time {s:?} has no offset"))?;
        let (time, offset) = s.split_at(split);
        let time = crate::iso::parse_local_time(time)?;
        let offset = parse_offset(offset)?;
        Ok(Self::new(time, offset))
    }
}

/// Hour, minute, second and nanosecond of a time, in that order.
pub(crate) fn time_fields(time: &NaiveTime) -> (u32, u32, u32, u32) {
    (time.hour(), time.minute(), time.second(), time.nanosecond())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_text_and_range() {
        assert_eq!("2013".parse::<Year>().unwrap(), Year::new(2013).unwrap());
        assert_eq!("-44".parse::<Year>().unwrap().value(), -44);
        assert_eq!(Year::new(2013).unwrap().to_string(), "2013");
        assert!(Year::new(1_000_000_000).is_none());
        assert!("twenty".parse::<Year>().is_err());
    }

    #[test]
    fn year_month_text() {
        let ym: YearMonth = "2013-08".parse().unwrap();
        assert_eq!((ym.year(), ym.month()), (2013, 8));
        assert_eq!(ym.to_string(), "2013-08");
        assert_eq!(YearMonth::new(12345, 1).unwrap().to_string(), "+12345-01");
        assert_eq!(YearMonth::new(-5, 12).unwrap().to_string(), "-0005-12");
        assert_eq!("-0005-12".parse::<YearMonth>().unwrap(), YearMonth::new(-5, 12).unwrap());
        assert!("2013-13".parse::<YearMonth>().is_err());
        assert!("2013-8".parse::<YearMonth>().is_err());
    }

    #[test]
    fn month_day_text() {
        let md: MonthDay = "--02-29".parse().unwrap();
        assert_eq!((md.month(), md.day()), (2, 29));
        assert_eq!(md.to_string(), "--02-29");
        assert!("--02-30".parse::<MonthDay>().is_err());
        assert!("02-14".parse::<MonthDay>().is_err());
    }

    #[test]
    fn period_text() {
        assert_eq!("P1Y2M3D".parse::<Period>().unwrap(), Period::new(1, 2, 3));
        assert_eq!("P2W".parse::<Period>().unwrap(), Period::new(0, 0, 14));
        assert_eq!("-P1Y-2D".parse::<Period>().unwrap(), Period::new(-1, 0, 2));
        assert_eq!(Period::new(1, 2, 3).to_string(), "P1Y2M3D");
        assert_eq!(Period::new(0, -4, 0).to_string(), "P-4M");
        assert_eq!(Period::ZERO.to_string(), "P0D");
        assert!("P".parse::<Period>().is_err());
        assert!("P3D1Y".parse::<Period>().is_err());
        assert!("P1X".parse::<Period>().is_err());
        assert!("1Y".parse::<Period>().is_err());
    }

    #[test]
    fn offset_time_text() {
        let ot: OffsetTime = "10:15:30+01:00".parse().unwrap();
        assert_eq!(ot.time(), NaiveTime::from_hms_opt(10, 15, 30).unwrap());
        assert_eq!(ot.offset().local_minus_utc(), 3600);
        assert_eq!(ot.to_string(), "10:15:30+01:00");

        let utc: OffsetTime = "23:59:59.5Z".parse().unwrap();
        assert_eq!(utc.to_string(), "23:59:59.500Z");
        assert!("10:15:30".parse::<OffsetTime>().is_err());
    }
}
