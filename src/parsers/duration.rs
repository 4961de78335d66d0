//! The ISO-8601 duration grammar.
//!
//! `P[nY][nM][nW][nD][T[nH][nM][nS]]` with an optional leading sign.
//! Designators must appear in order, at most once each, and weeks are
//! mutually exclusive with the other date designators per ISO-8601.
//! Seconds accept a decimal fraction of up to three digits.

use crate::{error::KairosError, KairosResult};

/// The parsed components of an ISO-8601 duration string.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct IsoDurationRecord {
    pub(crate) negative: bool,
    pub(crate) years: u64,
    pub(crate) months: u64,
    pub(crate) weeks: u64,
    pub(crate) days: u64,
    pub(crate) hours: u64,
    pub(crate) minutes: u64,
    pub(crate) seconds: u64,
    pub(crate) milliseconds: u64,
}

struct Cursor<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            bytes: input.as_bytes(),
            position: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.position).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn eat(&mut self, expected: u8) -> bool {
        if self.peek().is_some_and(|byte| byte.eq_ignore_ascii_case(&expected)) {
            self.advance();
            return true;
        }
        false
    }

    fn is_exhausted(&self) -> bool {
        self.position >= self.bytes.len()
    }

    /// Reads a decimal integer, rejecting empty and oversized runs.
    fn digits(&mut self) -> KairosResult<u64> {
        let start = self.position;
        while self.peek().is_some_and(|byte| byte.is_ascii_digit()) {
            self.advance();
        }
        if self.position == start {
            return Err(malformed("expected digits"));
        }
        let run = &self.bytes[start..self.position];
        if run.len() > 10 {
            return Err(malformed("duration component is too large"));
        }
        let mut value: u64 = 0;
        for &byte in run {
            value = value * 10 + u64::from(byte - b'0');
        }
        Ok(value)
    }
}

fn malformed(detail: &'static str) -> KairosError {
    KairosError::duration().with_message(format!("malformed ISO-8601 duration: {detail}."))
}

/// Parses an ISO-8601 duration string into its component record.
pub(crate) fn parse_iso_duration(input: &str) -> KairosResult<IsoDurationRecord> {
    let trimmed = input.trim();
    let mut cursor = Cursor::new(trimmed);
    let mut record = IsoDurationRecord {
        negative: cursor.eat(b'-'),
        ..IsoDurationRecord::default()
    };
    if !record.negative {
        cursor.eat(b'+');
    }
    if !cursor.eat(b'P') {
        return Err(malformed("missing the P prefix"));
    }

    let mut any_component = false;

    // Date designators, in order: Y, M, W, D.
    const DATE_DESIGNATORS: [u8; 4] = [b'Y', b'M', b'W', b'D'];
    let mut next_designator = 0;
    while cursor.peek().is_some_and(|byte| byte.is_ascii_digit()) {
        let value = cursor.digits()?;
        let Some(designator) = cursor.peek() else {
            return Err(malformed("number without a designator"));
        };
        let designator = designator.to_ascii_uppercase();
        let position = DATE_DESIGNATORS[next_designator..]
            .iter()
            .position(|&d| d == designator)
            .ok_or_else(|| malformed("date designators out of order or repeated"))?;
        cursor.advance();
        match designator {
            b'Y' => record.years = value,
            b'M' => record.months = value,
            b'W' => record.weeks = value,
            b'D' => record.days = value,
            _ => return Err(KairosError::assert()),
        }
        next_designator += position + 1;
        any_component = true;
    }

    if cursor.eat(b'T') {
        let mut any_time = false;
        const TIME_DESIGNATORS: [u8; 3] = [b'H', b'M', b'S'];
        let mut next_time = 0;
        while cursor.peek().is_some_and(|byte| byte.is_ascii_digit()) {
            let value = cursor.digits()?;
            // An 'S' component may carry a decimal fraction.
            let mut milliseconds = None;
            if cursor.peek() == Some(b'.') {
                cursor.advance();
                let start = cursor.position;
                let fraction = cursor.digits()?;
                let digits = cursor.position - start;
                if digits > 3 {
                    return Err(malformed("second fractions support millisecond precision"));
                }
                milliseconds = Some(fraction * 10u64.pow(3 - digits as u32));
            }
            let Some(designator) = cursor.peek() else {
                return Err(malformed("number without a designator"));
            };
            let designator = designator.to_ascii_uppercase();
            if milliseconds.is_some() && designator != b'S' {
                return Err(malformed("only seconds accept a fraction"));
            }
            let position = TIME_DESIGNATORS[next_time..]
                .iter()
                .position(|&d| d == designator)
                .ok_or_else(|| malformed("time designators out of order or repeated"))?;
            cursor.advance();
            match designator {
                b'H' => record.hours = value,
                b'M' => record.minutes = value,
                b'S' => {
                    record.seconds = value;
                    record.milliseconds = milliseconds.unwrap_or(0);
                }
                _ => return Err(KairosError::assert()),
            }
            next_time += position + 1;
            any_time = true;
        }
        if !any_time {
            return Err(malformed("T must be followed by a time component"));
        }
        any_component = true;
    }

    if !cursor.is_exhausted() {
        return Err(malformed("trailing characters"));
    }
    if !any_component {
        return Err(malformed("at least one component is required"));
    }
    // ISO-8601 week durations stand alone.
    if record.weeks > 0
        && (record.years > 0
            || record.months > 0
            || record.days > 0
            || record.hours > 0
            || record.minutes > 0
            || record.seconds > 0
            || record.milliseconds > 0)
    {
        return Err(KairosError::duration()
            .with_message("weeks are mutually exclusive with other duration components."));
    }
    Ok(record)
}
