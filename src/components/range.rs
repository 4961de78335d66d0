//! This module implements the Kairos `Range`: an inclusive interval
//! walked in steps of a unit.

use crate::{
    business::BusinessCalendar,
    components::Instant,
    error::KairosError,
    options::Unit,
    KairosResult,
};

/// An inclusive instant interval `[start, end]` iterated by
/// `step × unit`. The default walk is one day at a time.
#[derive(Debug, Clone, Copy)]
pub struct Range {
    start: Instant,
    end: Instant,
    unit: Unit,
    step: i64,
}

impl Range {
    /// Creates a day-stepped range.
    pub fn new(start: Instant, end: Instant) -> KairosResult<Self> {
        Self::try_new(start, end, Unit::Day, 1)
    }

    /// Creates a range with an explicit unit and step.
    ///
    /// The step must be a positive integer; the endpoints must be valid
    /// instants.
    pub fn try_new(start: Instant, end: Instant, unit: Unit, step: i64) -> KairosResult<Self> {
        if step < 1 {
            return Err(
                KairosError::configuration().with_message("range step must be at least 1.")
            );
        }
        if !start.is_valid() || !end.is_valid() {
            return Err(KairosError::date().with_message("range endpoints must be valid."));
        }
        Ok(Self {
            start,
            end,
            unit,
            step,
        })
    }

    #[inline]
    #[must_use]
    pub fn start(&self) -> Instant {
        self.start
    }

    #[inline]
    #[must_use]
    pub fn end(&self) -> Instant {
        self.end
    }

    #[inline]
    #[must_use]
    pub fn unit(&self) -> Unit {
        self.unit
    }

    #[inline]
    #[must_use]
    pub fn step(&self) -> i64 {
        self.step
    }

    /// Inclusive containment by epoch value.
    #[must_use]
    pub fn contains(&self, instant: &Instant) -> bool {
        instant.is_between(&self.start, &self.end)
    }

    /// Returns `true` when the two intervals share any instant.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        !(self.end.is_before(&other.start) || other.end.is_before(&self.start))
    }

    /// The shared sub-interval, keeping this range's unit and step.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        if !self.overlaps(other) {
            return None;
        }
        let start = if self.start.is_before(&other.start) {
            other.start
        } else {
            self.start
        };
        let end = if self.end.is_before(&other.end) {
            self.end
        } else {
            other.end
        };
        Some(Self {
            start,
            end,
            unit: self.unit,
            step: self.step,
        })
    }

    /// The covering interval of two overlapping ranges; disjoint ranges
    /// have no union.
    #[must_use]
    pub fn union(&self, other: &Self) -> Option<Self> {
        if !self.overlaps(other) {
            return None;
        }
        let start = if other.start.is_before(&self.start) {
            other.start
        } else {
            self.start
        };
        let end = if other.end.is_after(&self.end) {
            other.end
        } else {
            self.end
        };
        Some(Self {
            start,
            end,
            unit: self.unit,
            step: self.step,
        })
    }

    /// Lazily walks the interval. Calendar-unit steps are anchored to
    /// the start instant, so a month walk from January 31 visits the
    /// last day of short months without drifting.
    #[must_use]
    pub fn iter(&self) -> RangeIter {
        RangeIter {
            range: *self,
            index: 0,
        }
    }

    /// The number of instants iteration yields, computed arithmetically.
    #[must_use]
    pub fn length_in_units(&self) -> i64 {
        let Some(span) = self.end.diff(&self.start, self.unit) else {
            return 0;
        };
        if span < 0 {
            return 0;
        }
        span / self.step + 1
    }

    /// Splits the walk into consecutive chunks of `size` steps, eagerly
    /// producing the sub-ranges but never materializing the instants.
    pub fn chunk(&self, size: i64) -> KairosResult<Vec<Self>> {
        if size < 1 {
            return Err(
                KairosError::chunk_size().with_message("chunk size must be a positive integer.")
            );
        }
        let mut chunks = Vec::new();
        let mut iter = self.iter().peekable();
        while let Some(first) = iter.next() {
            let mut last = first;
            for _ in 1..size {
                match iter.next() {
                    Some(instant) => last = instant,
                    None => break,
                }
            }
            chunks.push(Self {
                start: first,
                end: last,
                unit: self.unit,
                step: self.step,
            });
        }
        Ok(chunks)
    }

    /// The business days within the interval.
    pub fn business_days(&self, calendar: &BusinessCalendar) -> KairosResult<Vec<Instant>> {
        let mut days = Vec::new();
        for instant in Self::try_new(self.start, self.end, Unit::Day, 1)?.iter() {
            if calendar.is_business_day(&instant)? {
                days.push(instant);
            }
        }
        Ok(days)
    }

    /// The instants in the walk falling on the given weekday.
    #[must_use]
    pub fn weekdays(&self, weekday: u8) -> Vec<Instant> {
        self.iter()
            .filter(|instant| instant.weekday() == Some(weekday))
            .collect()
    }
}

/// The lazy walker over a [`Range`]; O(1) memory.
#[derive(Debug, Clone)]
pub struct RangeIter {
    range: Range,
    index: i64,
}

impl Iterator for RangeIter {
    type Item = Instant;

    fn next(&mut self) -> Option<Instant> {
        let steps = self.index.checked_mul(self.range.step)?;
        let candidate = self.range.start.add(steps, self.range.unit);
        if !candidate.is_valid() || candidate.is_after(&self.range.end) {
            return None;
        }
        self.index += 1;
        Some(candidate)
    }
}

impl IntoIterator for &Range {
    type Item = Instant;
    type IntoIter = RangeIter;

    fn into_iter(self) -> RangeIter {
        self.iter()
    }
}
