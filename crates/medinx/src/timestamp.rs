//! ISO-8601 timestamps as they appear in side-car documents and queries.
//!
//! Accepted forms, from coarsest to finest:
//!
//! | Form | Examples |
//! |------|----------|
//! | year | `2016` |
//! | year-month | `2016-04`, `2016-4` |
//! | calendar date | `2016-04-01`, `20160401`, `2016-4-1` |
//! | date and hour | `2016-04-01T18` |
//! | date and time | `2016-04-01T18:30`, `2016-04-01T1830`, `2016-04-01T18:30:05.250` |
//!
//! Seconds may carry a fraction after `.` or `,`; digits past nanoseconds are
//! dropped. A time may carry an offset: `Z`, `+02`, `+0200` or `+02:00`.
//! Missing date parts default to the first month/day, a missing time to
//! midnight and a missing offset to UTC. `YYYYMM` alone is not accepted, as
//! it reads like a basic-format date cut short.
//!
//! Rendering always produces RFC 3339 with the original offset, which this
//! module parses back to the same instant.

use chrono::{DateTime, FixedOffset, NaiveDate, SecondsFormat, TimeZone};

use crate::error::{MedinxError, Result};

pub fn parse_timestamp(text: &str) -> Result<DateTime<FixedOffset>> {
    parse(text).ok_or_else(|| MedinxError::ValueFormat(format!("Invalid date value: {}", text)))
}

pub fn format_timestamp(timestamp: &DateTime<FixedOffset>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

/// Wall-clock part of a timestamp: hour, minute, second, nanosecond.
type Clock = (u32, u32, u32, u32);

fn parse(text: &str) -> Option<DateTime<FixedOffset>> {
    if !text.is_ascii() {
        return None;
    }
    let mut cursor = Cursor::new(text.as_bytes());

    let year = cursor.digits(4, 4)? as i32;
    let mut month = 1;
    let mut day = 1;
    let mut clock = (0, 0, 0, 0);
    let mut offset = FixedOffset::east_opt(0)?;

    if !cursor.is_empty() {
        month = if cursor.eat(b'-') {
            cursor.digits(1, 2)?
        } else {
            let month = cursor.digits(2, 2)?;
            if cursor.is_empty() {
                return None;
            }
            month
        };
    }
    if !cursor.is_empty() {
        day = if cursor.eat(b'-') {
            cursor.digits(1, 2)?
        } else {
            cursor.digits(2, 2)?
        };
    }
    if !cursor.is_empty() {
        if !(cursor.eat(b'T') || cursor.eat(b' ')) {
            return None;
        }
        clock = parse_clock(&mut cursor)?;
        if let Some(parsed) = parse_offset(&mut cursor) {
            offset = parsed?;
        }
    }
    if !cursor.is_empty() {
        return None;
    }

    let (hour, minute, second, nano) = clock;
    let local = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_nano_opt(hour, minute, second, nano)?;
    offset.from_local_datetime(&local).single()
}

/// `HH[[:]MM][[:]S[S][(.|,)fraction]]`
fn parse_clock(cursor: &mut Cursor<'_>) -> Option<Clock> {
    let hour = cursor.digits(2, 2)?;
    let minute = cursor.attempt(|c| {
        c.eat(b':');
        c.digits(2, 2)
    });
    let seconds = cursor.attempt(|c| {
        c.eat(b':');
        let second = c.digits(1, 2)?;
        let nano = c
            .attempt(|c| {
                if !(c.eat(b'.') || c.eat(b',')) {
                    return None;
                }
                c.fraction()
            })
            .unwrap_or(0);
        Some((second, nano))
    });
    let (second, nano) = seconds.unwrap_or((0, 0));
    Some((hour, minute.unwrap_or(0), second, nano))
}

/// `Z | (+|-)HH[:][MM]`. `None` when no offset is present, `Some(None)` when
/// one is present but out of range.
fn parse_offset(cursor: &mut Cursor<'_>) -> Option<Option<FixedOffset>> {
    if cursor.eat(b'Z') {
        return Some(FixedOffset::east_opt(0));
    }
    cursor.attempt(|c| {
        let sign = if c.eat(b'+') {
            1
        } else if c.eat(b'-') {
            -1
        } else {
            return None;
        };
        let hours = c.digits(2, 2)?;
        c.eat(b':');
        let minutes = c.attempt(|c| c.digits(2, 2)).unwrap_or(0);
        if minutes >= 60 {
            return Some(None);
        }
        let seconds = sign * (hours * 3600 + minutes * 60) as i32;
        Some(FixedOffset::east_opt(seconds))
    })
}

/// Forward-only reader over ASCII bytes.
#[derive(Clone, Copy)]
struct Cursor<'a> {
    rest: &'a [u8],
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { rest: bytes }
    }

    fn is_empty(&self) -> bool {
        self.rest.is_empty()
    }

    fn eat(&mut self, byte: u8) -> bool {
        match self.rest.split_first() {
            Some((first, rest)) if *first == byte => {
                self.rest = rest;
                true
            }
            _ => false,
        }
    }

    /// Reads between `min` and `max` digits, as many as available.
    fn digits(&mut self, min: usize, max: usize) -> Option<u32> {
        let len = self
            .rest
            .iter()
            .take(max)
            .take_while(|b| b.is_ascii_digit())
            .count();
        if len < min {
            return None;
        }
        let (taken, rest) = self.rest.split_at(len);
        self.rest = rest;
        Some(
            taken
                .iter()
                .fold(0, |acc, b| acc * 10 + u32::from(b - b'0')),
        )
    }

    /// Reads a non-empty run of digits as a fraction of a second, in
    /// nanoseconds.
    fn fraction(&mut self) -> Option<u32> {
        let len = self.rest.iter().take_while(|b| b.is_ascii_digit()).count();
        if len == 0 {
            return None;
        }
        let (taken, rest) = self.rest.split_at(len);
        self.rest = rest;
        let nanos = (0..9).fold(0, |acc, i| {
            acc * 10 + taken.get(i).map_or(0, |b| u32::from(b - b'0'))
        });
        Some(nanos)
    }

    /// Runs `read`, rewinding when it yields nothing.
    fn attempt<T>(&mut self, read: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let saved = *self;
        let result = read(self);
        if result.is_none() {
            *self = saved;
        }
        result
    }
}
