//! An implementation of the Kairos `Instant`.
//!
//! An `Instant` is an immutable point in time: a millisecond offset from
//! the Unix epoch plus a frame flag that selects whether accessors read
//! UTC or host-local calendar coordinates. Every mutator returns a new
//! `Instant`.
//!
//! Invalidity is carried as data. Construction and arithmetic never
//! panic and never error for unrepresentable results; they produce the
//! invalid instant, which every accessor maps to `None` and the
//! formatter maps to the literal string `"Invalid Date"`.

use core::cmp::Ordering;
use core::fmt;
use core::str::FromStr;

use crate::{
    error::KairosError,
    iso::{IsoDate, IsoDateTime, IsoTime},
    locale,
    options::Unit,
    parsers::{self, ParseOptions},
    sys, utils, KairosResult, EPOCH_MS_MAX, EPOCH_MS_MIN,
};

/// A component record for building an `Instant` from calendar fields.
///
/// Months are 1-indexed here and everywhere else in the public API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTimeComponents {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub millisecond: u16,
}

impl Default for DateTimeComponents {
    fn default() -> Self {
        Self {
            year: 1970,
            month: 1,
            day: 1,
            hour: 0,
            minute: 0,
            second: 0,
            millisecond: 0,
        }
    }
}

/// The native Rust implementation of the Kairos instant.
#[derive(Debug, Clone, Copy)]
pub struct Instant {
    millis: Option<i64>,
    utc: bool,
}

// ==== Private API ====

impl Instant {
    /// Creates an instant from a raw epoch value, mapping out-of-range
    /// values to the invalid instant.
    pub(crate) fn from_raw(millis: i64, utc: bool) -> Self {
        if (EPOCH_MS_MIN..=EPOCH_MS_MAX).contains(&millis) {
            Self {
                millis: Some(millis),
                utc,
            }
        } else {
            Self { millis: None, utc }
        }
    }

    /// Returns the frame offset in minutes east of UTC, `0` in UTC mode.
    pub(crate) fn frame_offset_minutes(&self) -> i32 {
        match self.millis {
            Some(ms) if !self.utc => sys::local_offset_minutes(ms),
            _ => 0,
        }
    }

    /// Returns the calendar coordinates of this instant in its active
    /// frame, or `None` for the invalid instant.
    pub(crate) fn fields(&self) -> Option<IsoDateTime> {
        let millis = self.millis?;
        Some(IsoDateTime::from_epoch_millis(
            millis,
            self.frame_offset_minutes(),
        ))
    }

    /// Rebuilds an epoch value from wall-clock fields in the active frame.
    ///
    /// In the local frame the offset at the target instant is not known
    /// until the target is known, so the conversion runs a second pass
    /// with the offset observed at the first guess.
    pub(crate) fn epoch_from_fields(&self, fields: IsoDateTime) -> i64 {
        if self.utc {
            return fields.epoch_millis(0);
        }
        let guess = fields.epoch_millis(sys::local_offset_minutes(fields.epoch_millis(0)));
        fields.epoch_millis(sys::local_offset_minutes(guess))
    }

    fn with_fields(&self, fields: IsoDateTime) -> Self {
        Self::from_raw(self.epoch_from_fields(fields), self.utc)
    }

    /// The invalid instant in this instant's frame.
    fn poisoned(&self) -> Self {
        Self {
            millis: None,
            utc: self.utc,
        }
    }
}

// ==== Public construction API ====

impl Instant {
    /// Returns the current time in the host-local frame.
    #[must_use]
    pub fn now() -> Self {
        Self::from_raw(sys::now_millis(), false)
    }

    /// Returns the current time in the UTC frame.
    #[must_use]
    pub fn now_utc() -> Self {
        Self::from_raw(sys::now_millis(), true)
    }

    /// The invalid instant.
    #[must_use]
    pub fn invalid() -> Self {
        Self {
            millis: None,
            utc: false,
        }
    }

    /// Creates an instant from milliseconds since the Unix epoch.
    ///
    /// Values outside the supported range (years 1..=9999) produce the
    /// invalid instant.
    #[must_use]
    pub fn from_epoch_millis(millis: i64) -> Self {
        Self::from_raw(millis, false)
    }

    /// Creates an instant from seconds since the Unix epoch.
    #[must_use]
    pub fn from_epoch_seconds(seconds: i64) -> Self {
        match seconds.checked_mul(1000) {
            Some(millis) => Self::from_raw(millis, false),
            None => Self::invalid(),
        }
    }

    /// Creates an instant from a calendar component record.
    ///
    /// Components outside their natural range fail with `InvalidDate`.
    pub fn from_components(components: &DateTimeComponents, utc: bool) -> KairosResult<Self> {
        let date = IsoDate::new(components.year, components.month, components.day)?;
        let time = IsoTime::new(
            components.hour,
            components.minute,
            components.second,
            components.millisecond,
        )?;
        let shell = Self {
            millis: Some(0),
            utc,
        };
        Ok(shell.with_fields(IsoDateTime::new_unchecked(date, time)))
    }

    /// Creates an instant from a legacy component array
    /// `[year, month0, day, hour, minute, second, millisecond]` where the
    /// month is 0-indexed. Missing trailing components default.
    pub fn from_component_array(components: &[i64], utc: bool) -> KairosResult<Self> {
        let get = |index: usize| components.get(index).copied();
        let Some(year) = get(0) else {
            return Err(KairosError::date().with_message("component array requires a year."));
        };
        let month0 = get(1).unwrap_or(0);
        if !(0..=11).contains(&month0) {
            return Err(KairosError::date().with_message("legacy month index must be in 0..=11."));
        }
        let record = DateTimeComponents {
            year: i32::try_from(year)
                .map_err(|_| KairosError::date().with_message("year is out of range."))?,
            month: month0 as u8 + 1,
            day: u8::try_from(get(2).unwrap_or(1))
                .map_err(|_| KairosError::date().with_message("day is out of range."))?,
            hour: u8::try_from(get(3).unwrap_or(0))
                .map_err(|_| KairosError::date().with_message("hour is out of range."))?,
            minute: u8::try_from(get(4).unwrap_or(0))
                .map_err(|_| KairosError::date().with_message("minute is out of range."))?,
            second: u8::try_from(get(5).unwrap_or(0))
                .map_err(|_| KairosError::date().with_message("second is out of range."))?,
            millisecond: u16::try_from(get(6).unwrap_or(0))
                .map_err(|_| KairosError::date().with_message("millisecond is out of range."))?,
        };
        Self::from_components(&record, utc)
    }

    /// Creates an instant at the UTC midnight of a calendar date.
    #[must_use]
    pub fn from_date(date: IsoDate) -> Self {
        Self::from_raw(date.utc_midnight_millis(), true)
    }
}

// ==== Public accessor API ====

impl Instant {
    /// Returns `false` iff this is the invalid instant.
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.millis.is_some()
    }

    /// Returns the epoch milliseconds, or `None` for the invalid instant.
    #[inline]
    #[must_use]
    pub fn epoch_millis(&self) -> Option<i64> {
        self.millis
    }

    /// Returns the epoch seconds, truncated toward negative infinity.
    #[inline]
    #[must_use]
    pub fn epoch_seconds(&self) -> Option<i64> {
        Some(self.millis?.div_euclid(1000))
    }

    /// Returns `true` when accessors read UTC coordinates.
    #[inline]
    #[must_use]
    pub fn is_utc(&self) -> bool {
        self.utc
    }

    /// Returns a new instant reading UTC coordinates. The epoch value is
    /// unchanged.
    #[must_use]
    pub fn utc(&self) -> Self {
        Self {
            millis: self.millis,
            utc: true,
        }
    }

    /// Returns a new instant reading host-local coordinates. The epoch
    /// value is unchanged.
    #[must_use]
    pub fn local(&self) -> Self {
        Self {
            millis: self.millis,
            utc: false,
        }
    }

    /// Returns the signed local-vs-UTC offset in minutes for this
    /// instant, positive east of UTC. UTC-frame instants report `0`.
    #[must_use]
    pub fn utc_offset_minutes(&self) -> Option<i32> {
        self.millis?;
        Some(self.frame_offset_minutes())
    }

    #[must_use]
    pub fn year(&self) -> Option<i32> {
        Some(self.fields()?.date.year)
    }

    /// Returns the 1-indexed month.
    #[must_use]
    pub fn month(&self) -> Option<u8> {
        Some(self.fields()?.date.month)
    }

    #[must_use]
    pub fn day(&self) -> Option<u8> {
        Some(self.fields()?.date.day)
    }

    #[must_use]
    pub fn hour(&self) -> Option<u8> {
        Some(self.fields()?.time.hour)
    }

    #[must_use]
    pub fn minute(&self) -> Option<u8> {
        Some(self.fields()?.time.minute)
    }

    #[must_use]
    pub fn second(&self) -> Option<u8> {
        Some(self.fields()?.time.second)
    }

    #[must_use]
    pub fn millisecond(&self) -> Option<u16> {
        Some(self.fields()?.time.millisecond)
    }

    /// Returns the day of the week, `0` being Sunday.
    #[must_use]
    pub fn weekday(&self) -> Option<u8> {
        Some(self.fields()?.date.weekday())
    }

    /// Returns the ordinal day of the year, `1..=366`.
    #[must_use]
    pub fn day_of_year(&self) -> Option<u16> {
        Some(self.fields()?.date.day_of_year())
    }

    /// Returns the Monday-based ISO-8601 `(week_year, week)` pair.
    #[must_use]
    pub fn iso_week(&self) -> Option<(i32, u8)> {
        Some(self.fields()?.date.iso_week())
    }

    /// Returns the quarter, `1..=4`.
    #[must_use]
    pub fn quarter(&self) -> Option<u8> {
        Some((self.fields()?.date.month - 1) / 3 + 1)
    }

    /// Returns the number of days in the instant's month.
    #[must_use]
    pub fn days_in_month(&self) -> Option<u8> {
        Some(self.fields()?.date.days_in_month())
    }

    #[must_use]
    pub fn is_leap_year(&self) -> Option<bool> {
        Some(utils::in_leap_year(self.fields()?.date.year))
    }

    /// Returns the instant's calendar date in the active frame.
    #[must_use]
    pub fn date(&self) -> Option<IsoDate> {
        Some(self.fields()?.date)
    }
}

// ==== Public mutator API ====
//
// Every mutator returns a new instant; `self` is never changed. All of
// them propagate invalidity: a mutator on the invalid instant returns
// the invalid instant, not an error.

impl Instant {
    /// Returns a new instant with the year replaced.
    ///
    /// February 29 clamps to February 28 in common target years, the
    /// same clamping rule month arithmetic uses.
    pub fn with_year(&self, year: i32) -> KairosResult<Self> {
        if !(utils::MIN_YEAR..=utils::MAX_YEAR).contains(&year) {
            return Err(KairosError::date().with_message("year is outside the supported range."));
        }
        let Some(mut fields) = self.fields() else {
            return Ok(*self);
        };
        fields.date.year = year;
        fields.date.day = fields.date.day.min(fields.date.days_in_month());
        Ok(self.with_fields(fields))
    }

    /// Returns a new instant with the 1-indexed month replaced, clamping
    /// the day to the target month's length.
    pub fn with_month(&self, month: u8) -> KairosResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(KairosError::date().with_message("month must be in 1..=12."));
        }
        let Some(mut fields) = self.fields() else {
            return Ok(*self);
        };
        fields.date.month = month;
        fields.date.day = fields.date.day.min(fields.date.days_in_month());
        Ok(self.with_fields(fields))
    }

    /// Returns a new instant with the day of the month replaced.
    pub fn with_day(&self, day: u8) -> KairosResult<Self> {
        let Some(mut fields) = self.fields() else {
            return Ok(*self);
        };
        if day < 1 || day > fields.date.days_in_month() {
            return Err(KairosError::date().with_message("day is out of range for month."));
        }
        fields.date.day = day;
        Ok(self.with_fields(fields))
    }

    pub fn with_hour(&self, hour: u8) -> KairosResult<Self> {
        if hour > 23 {
            return Err(KairosError::date().with_message("hour must be in 0..=23."));
        }
        let Some(mut fields) = self.fields() else {
            return Ok(*self);
        };
        fields.time.hour = hour;
        Ok(self.with_fields(fields))
    }

    pub fn with_minute(&self, minute: u8) -> KairosResult<Self> {
        if minute > 59 {
            return Err(KairosError::date().with_message("minute must be in 0..=59."));
        }
        let Some(mut fields) = self.fields() else {
            return Ok(*self);
        };
        fields.time.minute = minute;
        Ok(self.with_fields(fields))
    }

    pub fn with_second(&self, second: u8) -> KairosResult<Self> {
        if second > 59 {
            return Err(KairosError::date().with_message("second must be in 0..=59."));
        }
        let Some(mut fields) = self.fields() else {
            return Ok(*self);
        };
        fields.time.second = second;
        Ok(self.with_fields(fields))
    }

    pub fn with_millisecond(&self, millisecond: u16) -> KairosResult<Self> {
        if millisecond > 999 {
            return Err(KairosError::date().with_message("millisecond must be in 0..=999."));
        }
        let Some(mut fields) = self.fields() else {
            return Ok(*self);
        };
        fields.time.millisecond = millisecond;
        Ok(self.with_fields(fields))
    }
}

// ==== Arithmetic and boundaries ====

impl Instant {
    /// Adds `n` of a unit, returning a new instant.
    ///
    /// Sub-day and day/week units are epoch arithmetic over UTC days, so
    /// they are immune to local DST cliffs; month, quarter and year are
    /// calendar arithmetic with end-of-month clamping.
    #[must_use]
    pub fn add(&self, n: i64, unit: Unit) -> Self {
        let Some(millis) = self.millis else {
            return *self;
        };
        if let Some(unit_millis) = unit.as_millis() {
            return match n
                .checked_mul(unit_millis)
                .and_then(|delta| millis.checked_add(delta))
            {
                Some(result) => Self::from_raw(result, self.utc),
                None => self.poisoned(),
            };
        }
        // Calendar units: shift the date in the active frame, keep the
        // wall-clock time of day.
        let months = unit.months().unwrap_or(0);
        let Some(total) = n.checked_mul(months) else {
            return self.poisoned();
        };
        let Some(mut fields) = self.fields() else {
            return self.poisoned();
        };
        fields.date = fields.date.add_months(total);
        if !(utils::MIN_YEAR..=utils::MAX_YEAR).contains(&fields.date.year) {
            return self.poisoned();
        }
        self.with_fields(fields)
    }

    /// Subtracts `n` of a unit, returning a new instant.
    #[must_use]
    pub fn subtract(&self, n: i64, unit: Unit) -> Self {
        match n.checked_neg() {
            Some(negated) => self.add(negated, unit),
            None => self.poisoned(),
        }
    }

    /// Returns a new instant at the start of the given period in the
    /// active frame. Week boundaries honor the active locale's first day
    /// of week.
    #[must_use]
    pub fn start_of(&self, unit: Unit) -> Self {
        let Some(mut fields) = self.fields() else {
            return *self;
        };
        match unit {
            Unit::Year => {
                fields.date.month = 1;
                fields.date.day = 1;
                fields.time = IsoTime::default();
            }
            Unit::Quarter => {
                fields.date.month = (fields.date.month - 1) / 3 * 3 + 1;
                fields.date.day = 1;
                fields.time = IsoTime::default();
            }
            Unit::Month => {
                fields.date.day = 1;
                fields.time = IsoTime::default();
            }
            Unit::Week => {
                let week_start = locale::active_week_start();
                let back = (fields.date.weekday() + 7 - week_start) % 7;
                fields.date = fields.date.add_days(-i64::from(back));
                fields.time = IsoTime::default();
            }
            Unit::Day => fields.time = IsoTime::default(),
            Unit::Hour => {
                fields.time.minute = 0;
                fields.time.second = 0;
                fields.time.millisecond = 0;
            }
            Unit::Minute => {
                fields.time.second = 0;
                fields.time.millisecond = 0;
            }
            Unit::Second => fields.time.millisecond = 0,
            Unit::Millisecond => return *self,
        }
        self.with_fields(fields)
    }

    /// Returns a new instant at the end of the given period (`.999`
    /// millisecond) in the active frame.
    #[must_use]
    pub fn end_of(&self, unit: Unit) -> Self {
        let Some(mut fields) = self.fields() else {
            return *self;
        };
        match unit {
            Unit::Year => {
                fields.date.month = 12;
                fields.date.day = 31;
                fields.time = IsoTime::max();
            }
            Unit::Quarter => {
                fields.date.month = (fields.date.month - 1) / 3 * 3 + 3;
                fields.date.day = fields.date.days_in_month();
                fields.time = IsoTime::max();
            }
            Unit::Month => {
                fields.date.day = fields.date.days_in_month();
                fields.time = IsoTime::max();
            }
            Unit::Week => {
                let week_start = locale::active_week_start();
                let forward = (6 + week_start - fields.date.weekday()) % 7;
                fields.date = fields.date.add_days(i64::from(forward));
                fields.time = IsoTime::max();
            }
            Unit::Day => fields.time = IsoTime::max(),
            Unit::Hour => {
                fields.time.minute = 59;
                fields.time.second = 59;
                fields.time.millisecond = 999;
            }
            Unit::Minute => {
                fields.time.second = 59;
                fields.time.millisecond = 999;
            }
            Unit::Second => fields.time.millisecond = 999,
            Unit::Millisecond => return *self,
        }
        self.with_fields(fields)
    }

    /// Returns the signed difference `self − other` in the given unit,
    /// truncated toward zero.
    #[must_use]
    pub fn diff(&self, other: &Self, unit: Unit) -> Option<i64> {
        Some(self.diff_precise(other, unit)?.trunc() as i64)
    }

    /// Returns the signed difference `self − other` in the given unit
    /// without truncation.
    ///
    /// Month, quarter and year differences are calendar-aware:
    /// `2024-02-29` is one month after `2024-01-31` even though they are
    /// 29 days apart.
    #[must_use]
    pub fn diff_precise(&self, other: &Self, unit: Unit) -> Option<f64> {
        let (a, b) = (self.millis?, other.millis?);
        if let Some(unit_millis) = unit.as_millis() {
            return Some((a - b) as f64 / unit_millis as f64);
        }
        let months = self.month_diff(other)?;
        Some(match unit {
            Unit::Quarter => months / 3.0,
            Unit::Year => months / 12.0,
            _ => months,
        })
    }

    /// Calendar-aware month difference with anchor interpolation.
    fn month_diff(&self, other: &Self) -> Option<f64> {
        let (a_ms, b_ms) = (self.millis?, other.millis?);
        if a_ms < b_ms {
            return Some(-other.month_diff(self)?);
        }
        let (a, b) = (other.fields()?, self.fields()?);
        let whole = i64::from(b.date.year - a.date.year) * 12
            + i64::from(b.date.month) - i64::from(a.date.month);
        let anchor = other.add(whole, Unit::Month).epoch_millis()?;
        let fraction = if b_ms < anchor {
            let floor = other.add(whole - 1, Unit::Month).epoch_millis()?;
            if anchor == floor {
                0.0
            } else {
                (b_ms - anchor) as f64 / (anchor - floor) as f64
            }
        } else {
            let ceiling = other.add(whole + 1, Unit::Month).epoch_millis()?;
            if ceiling == anchor {
                0.0
            } else {
                (b_ms - anchor) as f64 / (ceiling - anchor) as f64
            }
        };
        Some(whole as f64 + fraction)
    }
}

// ==== Comparison API ====

impl Instant {
    /// Epoch equality; the frame flag does not participate. Invalid
    /// instants are never equal to anything, themselves included.
    #[must_use]
    pub fn equals(&self, other: &Self) -> bool {
        self == other
    }

    /// Epoch ordering; `None` when either side is invalid.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        Some(self.millis?.cmp(&other.millis?))
    }

    #[must_use]
    pub fn is_before(&self, other: &Self) -> bool {
        matches!(self.compare(other), Some(Ordering::Less))
    }

    #[must_use]
    pub fn is_after(&self, other: &Self) -> bool {
        matches!(self.compare(other), Some(Ordering::Greater))
    }

    /// Returns `true` when both instants fall inside the same period of
    /// the given unit, in this instant's active frame.
    #[must_use]
    pub fn is_same(&self, other: &Self, unit: Unit) -> bool {
        let anchor = self.start_of(unit);
        // Compare the peer in the same frame so both round identically.
        let peer = Self {
            millis: other.millis,
            utc: self.utc,
        };
        anchor == peer.start_of(unit)
    }

    #[must_use]
    pub fn is_same_or_before(&self, other: &Self, unit: Unit) -> bool {
        self.is_same(other, unit) || self.is_before(other)
    }

    #[must_use]
    pub fn is_same_or_after(&self, other: &Self, unit: Unit) -> bool {
        self.is_same(other, unit) || self.is_after(other)
    }

    /// Inclusive containment between two instants in either order.
    #[must_use]
    pub fn is_between(&self, a: &Self, b: &Self) -> bool {
        let Some(ms) = self.millis else { return false };
        let (Some(a), Some(b)) = (a.millis, b.millis) else {
            return false;
        };
        (a.min(b)..=a.max(b)).contains(&ms)
    }
}

// ==== Formatting ====

impl Instant {
    /// Formats this instant with the token vocabulary of the default
    /// context and the active locale.
    #[must_use]
    pub fn format(&self, template: &str) -> String {
        crate::default_context().format(self, template)
    }

    /// Canonical ISO-8601 emission in UTC: `YYYY-MM-DDTHH:mm:ss.SSSZ`.
    #[must_use]
    pub fn to_iso_string(&self) -> String {
        let Some(millis) = self.millis else {
            return String::from("Invalid Date");
        };
        let fields = IsoDateTime::from_epoch_millis(millis, 0);
        format!("{fields}Z")
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso_string())
    }
}

impl PartialEq for Instant {
    fn eq(&self, other: &Self) -> bool {
        matches!((self.millis, other.millis), (Some(a), Some(b)) if a == b)
    }
}

impl PartialOrd for Instant {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(other)
    }
}

impl FromStr for Instant {
    type Err = core::convert::Infallible;

    /// Parsing never fails; unparseable input is the invalid instant.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(parsers::parse(s, &ParseOptions::default()))
    }
}

impl From<IsoDate> for Instant {
    fn from(date: IsoDate) -> Self {
        Self::from_date(date)
    }
}

// ==== Instant Tests ====

#[cfg(test)]
mod tests {
    use super::{DateTimeComponents, Instant};
    use crate::options::Unit;
    use crate::sys::{self, LocalZone};

    fn utc_components(
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> Instant {
        Instant::from_components(
            &DateTimeComponents {
                year,
                month,
                day,
                hour,
                minute,
                second,
                millisecond: 0,
            },
            true,
        )
        .unwrap()
    }

    #[test]
    fn construction_from_components_is_utc_exact() {
        let instant = utc_components(2024, 6, 15, 14, 30, 0);
        assert_eq!(instant.epoch_millis(), Some(1_718_461_800_000));
        assert_eq!(instant.year(), Some(2024));
        assert_eq!(instant.month(), Some(6));
        assert_eq!(instant.day(), Some(15));
        assert_eq!(instant.hour(), Some(14));
        assert_eq!(instant.weekday(), Some(6));
        assert_eq!(instant.quarter(), Some(2));
    }

    #[test]
    fn legacy_component_array_month_is_zero_indexed() {
        let from_array = Instant::from_component_array(&[2024, 5, 15, 14, 30], true).unwrap();
        let from_record = utc_components(2024, 6, 15, 14, 30, 0);
        assert_eq!(from_array, from_record);
        assert!(Instant::from_component_array(&[2024, 12, 1], true).is_err());
    }

    #[test]
    fn mutators_return_new_instants() {
        let base = utc_components(2024, 6, 15, 14, 30, 0);
        let moved = base.with_day(1).unwrap();
        assert_eq!(base.day(), Some(15));
        assert_eq!(moved.day(), Some(1));
        assert_ne!(base, moved);
        assert!(base.with_day(31).is_err());
        assert!(base.with_month(13).is_err());
        assert!(base.with_hour(24).is_err());
    }

    #[test]
    fn with_year_clamps_leap_day() {
        let leap = utc_components(2024, 2, 29, 12, 0, 0);
        let common = leap.with_year(2023).unwrap();
        assert_eq!(common.month(), Some(2));
        assert_eq!(common.day(), Some(28));
    }

    #[test]
    fn invalid_propagates_through_everything() {
        let invalid = Instant::invalid();
        assert!(!invalid.is_valid());
        assert_eq!(invalid.year(), None);
        assert!(!invalid.equals(&invalid));
        assert_eq!(invalid.add(5, Unit::Day).epoch_millis(), None);
        assert_eq!(invalid.with_hour(3).unwrap().epoch_millis(), None);
        assert_eq!(invalid.to_iso_string(), "Invalid Date");
        assert_eq!(invalid.diff(&Instant::now(), Unit::Day), None);
    }

    #[test]
    fn overflow_arithmetic_poisons_instead_of_panicking() {
        let base = utc_components(9999, 12, 31, 0, 0, 0);
        assert!(!base.add(1, Unit::Year).is_valid());
        assert!(!base.add(i64::MAX, Unit::Day).is_valid());
        assert!(base.is_valid());
    }

    #[test]
    fn add_subtract_round_trip_sub_day_units() {
        let base = utc_components(2024, 6, 15, 14, 30, 0);
        for unit in [
            Unit::Millisecond,
            Unit::Second,
            Unit::Minute,
            Unit::Hour,
            Unit::Day,
            Unit::Week,
        ] {
            assert_eq!(base.add(17, unit).subtract(17, unit), base);
        }
    }

    #[test]
    fn month_arithmetic_clamps_to_end_of_month() {
        let jan31 = utc_components(2024, 1, 31, 0, 0, 0);
        let feb = jan31.add(1, Unit::Month);
        assert_eq!(feb.month(), Some(2));
        assert_eq!(feb.day(), Some(29));
        let quarter = jan31.add(1, Unit::Quarter);
        assert_eq!(quarter.month(), Some(4));
        assert_eq!(quarter.day(), Some(30));
    }

    #[test]
    fn start_and_end_of_periods() {
        let instant = utc_components(2024, 6, 15, 14, 30, 45);
        assert_eq!(instant.start_of(Unit::Year).to_iso_string(), "2024-01-01T00:00:00.000Z");
        assert_eq!(instant.start_of(Unit::Quarter).to_iso_string(), "2024-04-01T00:00:00.000Z");
        assert_eq!(instant.start_of(Unit::Month).to_iso_string(), "2024-06-01T00:00:00.000Z");
        assert_eq!(instant.start_of(Unit::Day).to_iso_string(), "2024-06-15T00:00:00.000Z");
        assert_eq!(instant.end_of(Unit::Month).to_iso_string(), "2024-06-30T23:59:59.999Z");
        assert_eq!(instant.end_of(Unit::Year).to_iso_string(), "2024-12-31T23:59:59.999Z");
        assert_eq!(instant.end_of(Unit::Second).to_iso_string(), "2024-06-15T14:30:45.999Z");
    }

    #[test]
    fn week_boundaries_follow_week_start() {
        // 2024-06-15 is a Saturday; with a Sunday week start the week
        // begins on the 9th and ends on the 15th.
        let _guard = sys::TEST_ZONE_LOCK.lock().unwrap();
        let instant = utc_components(2024, 6, 15, 12, 0, 0);
        assert_eq!(instant.start_of(Unit::Week).day(), Some(9));
        assert_eq!(instant.end_of(Unit::Week).day(), Some(15));
    }

    #[test]
    fn calendar_aware_month_diff() {
        let jan31 = utc_components(2024, 1, 31, 0, 0, 0);
        let feb29 = utc_components(2024, 2, 29, 0, 0, 0);
        assert_eq!(feb29.diff(&jan31, Unit::Month), Some(1));
        assert_eq!(jan31.diff(&feb29, Unit::Month), Some(-1));

        let a = utc_components(2023, 3, 10, 0, 0, 0);
        let b = utc_components(2024, 3, 10, 0, 0, 0);
        assert_eq!(b.diff(&a, Unit::Year), Some(1));
        assert_eq!(b.diff(&a, Unit::Month), Some(12));
        assert_eq!(b.diff(&a, Unit::Quarter), Some(4));
    }

    #[test]
    fn diff_in_fixed_units() {
        let a = utc_components(2024, 6, 15, 0, 0, 0);
        let b = utc_components(2024, 6, 18, 12, 0, 0);
        assert_eq!(b.diff(&a, Unit::Day), Some(3));
        assert_eq!(b.diff_precise(&a, Unit::Day), Some(3.5));
        assert_eq!(b.diff(&a, Unit::Hour), Some(84));
        assert_eq!(a.diff(&b, Unit::Day), Some(-3));
    }

    #[test]
    fn comparisons_use_epoch_only() {
        let utc = utc_components(2024, 6, 15, 0, 0, 0);
        let local_view = utc.local();
        assert!(utc.equals(&local_view));
        assert!(utc.is_same(&local_view, Unit::Millisecond));
        let later = utc.add(1, Unit::Second);
        assert!(utc.is_before(&later));
        assert!(later.is_after(&utc));
        assert!(utc.is_same(&later, Unit::Day));
        assert!(utc.is_between(&utc, &later));
    }

    #[test]
    fn utc_local_round_trip_preserves_epoch() {
        let _guard = sys::TEST_ZONE_LOCK.lock().unwrap();
        sys::set_local_zone(LocalZone::FixedOffset(540));
        let instant = utc_components(2024, 6, 15, 23, 30, 0);
        let local = instant.local();
        // JST reads the next calendar day.
        assert_eq!(local.day(), Some(16));
        assert_eq!(local.hour(), Some(8));
        assert_eq!(local.utc().epoch_millis(), instant.epoch_millis());
        assert_eq!(local.utc_offset_minutes(), Some(540));
        assert_eq!(instant.utc_offset_minutes(), Some(0));
        sys::reset_local_zone();
    }

    #[test]
    fn local_frame_mutation_respects_offset() {
        let _guard = sys::TEST_ZONE_LOCK.lock().unwrap();
        sys::set_local_zone(LocalZone::FixedOffset(-300));
        let base = utc_components(2024, 6, 15, 12, 0, 0).local();
        assert_eq!(base.hour(), Some(7));
        let moved = base.with_hour(0).unwrap();
        // Local midnight is 05:00 UTC.
        assert_eq!(moved.utc().hour(), Some(5));
        sys::reset_local_zone();
    }
}
