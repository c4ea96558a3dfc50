//! ISO 8601 temporal values and their parser/formatter.
//!
//! The codec exchanges calendar dates (`YYYY-MM-DD`), times-of-day
//! (`hh:mm:ss` with optional fraction and zone), and full timestamps on the
//! wire as ISO 8601 text. Week numbers, ordinal dates, and year-less dates
//! are not part of the grammar.
//!
//! Values preserve exactly what was written: a `+04` offset stays
//! hours-only, `+04:02` keeps its minutes, and fractional seconds are held
//! as integer milliseconds plus microseconds rather than a binary float.
//! Formatting is the inverse of parsing, so `parse(format(v)) == v` for
//! every representable value.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{ModelError, Result};

/// A calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Date {
    year: i32,
    month: u32,
    day: u32,
}

impl Date {
    /// Create a date, validating calendar ranges (including leap years).
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self> {
        if NaiveDate::from_ymd_opt(year, month, day).is_none() {
            return Err(ModelError::invalid_temporal(format!(
                "{year:04}-{month:02}-{day:02}"
            )));
        }
        Ok(Self { year, month, day })
    }

    /// Year component.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Month component (1-12).
    #[must_use]
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Day component (1-31).
    #[must_use]
    pub fn day(&self) -> u32 {
        self.day
    }

    /// Convert to a `chrono::NaiveDate`.
    #[must_use]
    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// Seconds component of a UTC offset, with optional sub-second precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetSeconds {
    pub seconds: u8,
    pub millisecond: u16,
    pub microsecond: u16,
}

impl OffsetSeconds {
    /// Create offset seconds, validating ranges.
    pub fn new(seconds: u8, millisecond: u16, microsecond: u16) -> Result<Self> {
        if seconds > 59 {
            return Err(ModelError::TemporalRange {
                component: "offset seconds",
                value: i64::from(seconds),
            });
        }
        if millisecond > 999 || microsecond > 999 {
            return Err(ModelError::TemporalRange {
                component: "offset fraction",
                value: i64::from(millisecond) * 1000 + i64::from(microsecond),
            });
        }
        Ok(Self {
            seconds,
            millisecond,
            microsecond,
        })
    }
}

/// A signed UTC offset, `±HH[:MM[:SS[.fraction]]]`.
///
/// The `minutes` and `seconds` fields record the granularity the offset was
/// written with, so reformatting reproduces `+04`, `+04:02`, and
/// `+04:02:30.5` distinctly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UtcOffset {
    pub negative: bool,
    pub hours: u8,
    pub minutes: Option<u8>,
    pub seconds: Option<OffsetSeconds>,
}

impl UtcOffset {
    /// Create an hours-only offset.
    pub fn new(negative: bool, hours: u8) -> Result<Self> {
        if hours > 23 {
            return Err(ModelError::TemporalRange {
                component: "offset hours",
                value: i64::from(hours),
            });
        }
        Ok(Self {
            negative,
            hours,
            minutes: None,
            seconds: None,
        })
    }

    /// Add a minutes component.
    pub fn with_minutes(mut self, minutes: u8) -> Result<Self> {
        if minutes > 59 {
            return Err(ModelError::TemporalRange {
                component: "offset minutes",
                value: i64::from(minutes),
            });
        }
        self.minutes = Some(minutes);
        Ok(self)
    }

    /// Add a seconds component (implies a minutes component is present).
    pub fn with_seconds(mut self, seconds: OffsetSeconds) -> Result<Self> {
        if self.minutes.is_none() {
            self.minutes = Some(0);
        }
        self.seconds = Some(seconds);
        Ok(self)
    }

    /// Total offset from UTC in whole microseconds (negative for `-` offsets).
    #[must_use]
    pub fn total_microseconds(&self) -> i64 {
        let mut total = i64::from(self.hours) * 3_600_000_000;
        if let Some(minutes) = self.minutes {
            total += i64::from(minutes) * 60_000_000;
        }
        if let Some(sec) = self.seconds {
            total += i64::from(sec.seconds) * 1_000_000
                + i64::from(sec.millisecond) * 1000
                + i64::from(sec.microsecond);
        }
        if self.negative { -total } else { total }
    }
}

impl fmt::Display for UtcOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:02}",
            if self.negative { '-' } else { '+' },
            self.hours
        )?;
        if let Some(minutes) = self.minutes {
            write!(f, ":{minutes:02}")?;
        }
        if let Some(sec) = self.seconds {
            write!(f, ":{:02}", sec.seconds)?;
            write_fraction(f, sec.millisecond.into(), sec.microsecond.into())?;
        }
        Ok(())
    }
}

/// Time zone designator: literal `Z` or a signed offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    /// UTC, written as `Z`.
    Utc,
    /// Signed offset from UTC.
    Offset(UtcOffset),
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Utc => write!(f, "Z"),
            Self::Offset(offset) => write!(f, "{offset}"),
        }
    }
}

/// A time of day with optional sub-second precision and zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Time {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    /// Whole milliseconds of the fractional second (0-999).
    pub millisecond: u32,
    /// Microseconds past the millisecond (0-999).
    pub microsecond: u32,
    pub zone: Option<Zone>,
}

impl Time {
    /// Create a time with zero fraction and no zone.
    pub fn new(hour: u32, minute: u32, second: u32) -> Result<Self> {
        check_clock(hour, minute, second)?;
        Ok(Self {
            hour,
            minute,
            second,
            millisecond: 0,
            microsecond: 0,
            zone: None,
        })
    }

    /// Set the fractional second as milliseconds plus microseconds.
    pub fn with_fraction(mut self, millisecond: u32, microsecond: u32) -> Result<Self> {
        check_fraction(millisecond, microsecond)?;
        self.millisecond = millisecond;
        self.microsecond = microsecond;
        Ok(self)
    }

    /// Set the zone designator.
    #[must_use]
    pub fn with_zone(mut self, zone: Zone) -> Self {
        self.zone = Some(zone);
        self
    }

    /// Total sub-second value in microseconds (0-999999).
    #[must_use]
    pub fn total_microseconds(&self) -> u32 {
        self.millisecond * 1000 + self.microsecond
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)?;
        write_fraction(f, self.millisecond, self.microsecond)?;
        if let Some(zone) = self.zone {
            write!(f, "{zone}")?;
        }
        Ok(())
    }
}

/// A full timestamp: calendar date plus time of day, with optional zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Datetime {
    pub date: Date,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    /// Whole milliseconds of the fractional second (0-999).
    pub millisecond: u32,
    /// Microseconds past the millisecond (0-999).
    pub microsecond: u32,
    pub zone: Option<Zone>,
}

impl Datetime {
    /// Create a timestamp with zero fraction and no zone.
    pub fn new(date: Date, hour: u32, minute: u32, second: u32) -> Result<Self> {
        check_clock(hour, minute, second)?;
        Ok(Self {
            date,
            hour,
            minute,
            second,
            millisecond: 0,
            microsecond: 0,
            zone: None,
        })
    }

    /// Set the fractional second as milliseconds plus microseconds.
    pub fn with_fraction(mut self, millisecond: u32, microsecond: u32) -> Result<Self> {
        check_fraction(millisecond, microsecond)?;
        self.millisecond = millisecond;
        self.microsecond = microsecond;
        Ok(self)
    }

    /// Set the zone designator.
    #[must_use]
    pub fn with_zone(mut self, zone: Zone) -> Self {
        self.zone = Some(zone);
        self
    }

    /// Convert to a `chrono::NaiveDateTime` (zone dropped).
    #[must_use]
    pub fn to_naive_datetime(&self) -> Option<NaiveDateTime> {
        let date = self.date.to_naive_date()?;
        let time = NaiveTime::from_hms_micro_opt(
            self.hour,
            self.minute,
            self.second,
            self.millisecond * 1000 + self.microsecond,
        )?;
        Some(NaiveDateTime::new(date, time))
    }
}

impl fmt::Display for Datetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}T{:02}:{:02}:{:02}",
            self.date, self.hour, self.minute, self.second
        )?;
        write_fraction(f, self.millisecond, self.microsecond)?;
        if let Some(zone) = self.zone {
            write!(f, "{zone}")?;
        }
        Ok(())
    }
}

/// A time interval. The codec refuses these; the type exists only so a
/// schema can declare one and get a deliberate unsupported-type failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Duration {
    pub seconds: i64,
    pub microseconds: i32,
}

/// Any value the temporal parser can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Temporal {
    Date(Date),
    Time(Time),
    Datetime(Datetime),
}

impl Temporal {
    /// Short noun for diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Date(_) => "date",
            Self::Time(_) => "time",
            Self::Datetime(_) => "timestamp",
        }
    }
}

impl fmt::Display for Temporal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date(date) => write!(f, "{date}"),
            Self::Time(time) => write!(f, "{time}"),
            Self::Datetime(datetime) => write!(f, "{datetime}"),
        }
    }
}

fn check_clock(hour: u32, minute: u32, second: u32) -> Result<()> {
    if hour > 23 {
        return Err(ModelError::TemporalRange {
            component: "hour",
            value: i64::from(hour),
        });
    }
    if minute > 59 {
        return Err(ModelError::TemporalRange {
            component: "minute",
            value: i64::from(minute),
        });
    }
    if second > 59 {
        return Err(ModelError::TemporalRange {
            component: "second",
            value: i64::from(second),
        });
    }
    Ok(())
}

fn check_fraction(millisecond: u32, microsecond: u32) -> Result<()> {
    if millisecond > 999 {
        return Err(ModelError::TemporalRange {
            component: "millisecond",
            value: i64::from(millisecond),
        });
    }
    if microsecond > 999 {
        return Err(ModelError::TemporalRange {
            component: "microsecond",
            value: i64::from(microsecond),
        });
    }
    Ok(())
}

/// Write a fractional-second suffix, trimming trailing zero digits.
///
/// Milliseconds and microseconds combine into a six-digit fraction; the
/// trailing zeros are not significant, so `1ms + 500µs` prints as `.0015`.
fn write_fraction(f: &mut fmt::Formatter<'_>, millisecond: u32, microsecond: u32) -> fmt::Result {
    let total = millisecond * 1000 + microsecond;
    if total == 0 {
        return Ok(());
    }
    let digits = format!("{total:06}");
    write!(f, ".{}", digits.trim_end_matches('0'))
}

// =========================================================================
// Parsing
// =========================================================================

/// Parse an ISO 8601 date, time, or timestamp.
///
/// The shape of the result follows the content: `"2018-06-25"` yields a
/// [`Date`], `"12:34:18.332"` a [`Time`], and `"2016-01-01T08:54:33Z"` a
/// [`Datetime`]. A date and a time are joined by `T` or a single space.
/// A zone suffix on a date-only value is accepted and ignored.
///
/// Every failure, including an out-of-range component in otherwise
/// well-formed text, reports the offending input.
pub fn parse_temporal(input: &str) -> Result<Temporal> {
    parse_any(input).map_err(|err| match err {
        ModelError::TemporalRange { .. } | ModelError::InvalidTemporal { .. } => {
            ModelError::invalid_temporal(input)
        }
        other => other,
    })
}

fn parse_any(input: &str) -> Result<Temporal> {
    if let Some((date, rest)) = scan_date(input) {
        let date = date?;
        if rest.is_empty() {
            return Ok(Temporal::Date(date));
        }
        if let Some(time_text) = rest.strip_prefix(['T', ' ']) {
            let (parts, zone) = parse_time_and_zone(time_text, input)?;
            let datetime = Datetime::new(date, parts.hour, parts.minute, parts.second)?
                .with_fraction(parts.millisecond, parts.microsecond)?;
            let datetime = match zone {
                Some(zone) => datetime.with_zone(zone),
                None => datetime,
            };
            return Ok(Temporal::Datetime(datetime));
        }
        // A bare zone may trail a date; it carries no information there.
        parse_zone(rest, input)?;
        return Ok(Temporal::Date(date));
    }

    let (parts, zone) = parse_time_and_zone(input, input)?;
    let time = Time::new(parts.hour, parts.minute, parts.second)?
        .with_fraction(parts.millisecond, parts.microsecond)?;
    let time = match zone {
        Some(zone) => time.with_zone(zone),
        None => time,
    };
    Ok(Temporal::Time(time))
}

struct ClockParts {
    hour: u32,
    minute: u32,
    second: u32,
    millisecond: u32,
    microsecond: u32,
}

/// Scan a leading `YYYY-MM-DD`. Returns the validated date and the
/// remainder of the input, or `None` if the input does not start with the
/// date pattern at all.
fn scan_date(input: &str) -> Option<(Result<Date>, &str)> {
    let bytes = input.as_bytes();
    if bytes.len() < 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    let digits_ok = bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[5..7].iter().all(u8::is_ascii_digit)
        && bytes[8..10].iter().all(u8::is_ascii_digit);
    if !digits_ok {
        return None;
    }
    let year = parse_digits(&input[..4]);
    let month = parse_digits(&input[5..7]);
    let day = parse_digits(&input[8..10]);
    Some((Date::new(year as i32, month, day), &input[10..]))
}

/// Parse digits already verified to be ASCII. At most six of them, so the
/// value always fits.
fn parse_digits(digits: &str) -> u32 {
    digits
        .bytes()
        .fold(0u32, |acc, b| acc * 10 + u32::from(b - b'0'))
}

/// Parse `hh:mm:ss[.fraction]` followed by an optional zone, consuming the
/// whole input.
fn parse_time_and_zone(text: &str, original: &str) -> Result<(ClockParts, Option<Zone>)> {
    let bytes = text.as_bytes();
    if bytes.len() < 8 || bytes[2] != b':' || bytes[5] != b':' {
        return Err(ModelError::invalid_temporal(original));
    }
    let digits_ok = bytes[..2].iter().all(u8::is_ascii_digit)
        && bytes[3..5].iter().all(u8::is_ascii_digit)
        && bytes[6..8].iter().all(u8::is_ascii_digit);
    if !digits_ok {
        return Err(ModelError::invalid_temporal(original));
    }

    let hour = parse_digits(&text[..2]);
    let minute = parse_digits(&text[3..5]);
    let second = parse_digits(&text[6..8]);

    let mut rest = &text[8..];
    let (millisecond, microsecond) = if let Some(fraction_text) = rest.strip_prefix('.') {
        let digit_count = fraction_text
            .bytes()
            .take_while(u8::is_ascii_digit)
            .count();
        if digit_count == 0 {
            return Err(ModelError::invalid_temporal(original));
        }
        rest = &fraction_text[digit_count..];
        parse_fraction(&fraction_text[..digit_count])
    } else {
        (0, 0)
    };

    let zone = if rest.is_empty() {
        None
    } else {
        Some(parse_zone(rest, original)?)
    };

    Ok((
        ClockParts {
            hour,
            minute,
            second,
            millisecond,
            microsecond,
        },
        zone,
    ))
}

/// Decompose a run of fractional-second digits into milliseconds and
/// microseconds by exact decimal arithmetic.
///
/// Digits beyond microsecond resolution are truncated, matching successive
/// base-1000 extraction of an exact decimal.
fn parse_fraction(digits: &str) -> (u32, u32) {
    let significant = &digits[..digits.len().min(6)];
    let scale = 10u32.pow(6 - significant.len() as u32);
    let total = parse_digits(significant) * scale;
    (total / 1000, total % 1000)
}

/// Parse a complete zone designator: `Z` or `+-HH[:MM[:SS[.fraction]]]`.
///
/// The colon separators are optional on input (the wire grammar admits
/// both); formatting always emits them.
fn parse_zone(text: &str, original: &str) -> Result<Zone> {
    if text == "Z" {
        return Ok(Zone::Utc);
    }
    let bytes = text.as_bytes();
    let negative = match bytes.first() {
        Some(b'+') => false,
        Some(b'-') => true,
        _ => return Err(ModelError::invalid_temporal(original)),
    };

    let mut pos = 1;
    let hours = take_two_digits(bytes, &mut pos).ok_or_else(err_for(original))?;
    let mut offset = UtcOffset::new(negative, hours as u8)?;

    if pos < bytes.len() {
        if bytes[pos] == b':' {
            pos += 1;
        }
        let minutes = take_two_digits(bytes, &mut pos).ok_or_else(err_for(original))?;
        offset = offset.with_minutes(minutes as u8)?;

        if pos < bytes.len() {
            if bytes[pos] == b':' {
                pos += 1;
            }
            let seconds = take_two_digits(bytes, &mut pos).ok_or_else(err_for(original))?;
            let (millisecond, microsecond) = if bytes.get(pos) == Some(&b'.') {
                pos += 1;
                let fraction_text = &text[pos..];
                let digit_count = fraction_text
                    .bytes()
                    .take_while(u8::is_ascii_digit)
                    .count();
                if digit_count == 0 {
                    return Err(ModelError::invalid_temporal(original));
                }
                pos += digit_count;
                parse_fraction(&fraction_text[..digit_count])
            } else {
                (0, 0)
            };
            offset = offset.with_seconds(OffsetSeconds::new(
                seconds as u8,
                millisecond as u16,
                microsecond as u16,
            )?)?;
        }
    }

    if pos != bytes.len() {
        return Err(ModelError::invalid_temporal(original));
    }
    Ok(Zone::Offset(offset))
}

fn err_for(original: &str) -> impl Fn() -> ModelError + '_ {
    move || ModelError::invalid_temporal(original)
}

fn take_two_digits(bytes: &[u8], pos: &mut usize) -> Option<u32> {
    let pair = bytes.get(*pos..*pos + 2)?;
    if !pair.iter().all(u8::is_ascii_digit) {
        return None;
    }
    *pos += 2;
    Some(u32::from(pair[0] - b'0') * 10 + u32::from(pair[1] - b'0'))
}
