//! This module implements the internal ISO calendar records.
//!
//! The three record types are:
//!   - `IsoDate`
//!   - `IsoTime`
//!   - `IsoDateTime`
//!
//! An `IsoDate` is a proleptic Gregorian calendar date. An `IsoTime` is a
//! wall-clock time at millisecond precision. An `IsoDateTime` combines the
//! two. None of the records carry a frame; the frame (UTC or host-local)
//! is the owning `Instant`'s concern.

use core::fmt;

use crate::{
    error::KairosError,
    utils::{self, Epoch},
    KairosResult, MS_PER_DAY, MS_PER_HOUR, MS_PER_MINUTE, MS_PER_SECOND,
};

/// A proleptic Gregorian calendar date within the supported year range.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IsoDate {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

impl IsoDate {
    /// Creates a new `IsoDate` without validation.
    pub(crate) const fn new_unchecked(year: i32, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    /// Creates a new validated `IsoDate`.
    pub fn new(year: i32, month: u8, day: u8) -> KairosResult<Self> {
        if !(utils::MIN_YEAR..=utils::MAX_YEAR).contains(&year) {
            return Err(KairosError::date().with_message("year is outside the supported range."));
        }
        if !(1..=12).contains(&month) {
            return Err(KairosError::date().with_message("month must be in 1..=12."));
        }
        if day < 1 || day > utils::days_in_month(year, month) {
            return Err(KairosError::date().with_message("day is out of range for month."));
        }
        Ok(Self::new_unchecked(year, month, day))
    }

    /// Creates an `IsoDate` from a number of days since the Unix epoch.
    pub(crate) fn from_epoch_days(days: i64) -> Self {
        let (year, month, day) = utils::gregorian_date_from_epoch_days(days);
        Self::new_unchecked(year, month, day)
    }

    /// Returns the number of days since the Unix epoch.
    pub(crate) fn to_epoch_days(self) -> i64 {
        utils::epoch_days_from_gregorian_date(self.year, self.month, self.day)
    }

    /// Returns the day of the week, `0` being Sunday.
    pub fn weekday(self) -> u8 {
        utils::day_of_week(self.to_epoch_days())
    }

    /// Returns the ordinal day of the year, `1..=366`.
    pub fn day_of_year(self) -> u16 {
        utils::day_of_year(self.year, self.month, self.day)
    }

    /// Returns the Monday-based ISO-8601 `(week_year, week)` pair.
    pub fn iso_week(self) -> (i32, u8) {
        utils::iso_week_of_year(self.year, self.month, self.day)
    }

    /// Returns the number of days in this date's month.
    pub fn days_in_month(self) -> u8 {
        utils::days_in_month(self.year, self.month)
    }

    /// Returns this date shifted by a number of days.
    pub fn add_days(self, days: i64) -> Self {
        Self::from_epoch_days(self.to_epoch_days() + days)
    }

    /// Returns this date shifted by a number of months, clamping the day
    /// to the end of the target month.
    pub fn add_months(self, months: i64) -> Self {
        let (year, month, day) =
            utils::add_months_clamped(self.year, self.month, self.day, months);
        Self::new_unchecked(year, month, day)
    }

    /// Returns the millisecond epoch of this date's UTC midnight.
    pub(crate) fn utc_midnight_millis(self) -> i64 {
        Epoch::from_days(self.to_epoch_days()).millis()
    }
}

impl fmt::Display for IsoDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// A wall-clock time at millisecond precision.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IsoTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub millisecond: u16,
}

impl IsoTime {
    /// Creates a new `IsoTime` without validation.
    pub(crate) const fn new_unchecked(hour: u8, minute: u8, second: u8, millisecond: u16) -> Self {
        Self {
            hour,
            minute,
            second,
            millisecond,
        }
    }

    /// Creates a new validated `IsoTime`.
    pub fn new(hour: u8, minute: u8, second: u8, millisecond: u16) -> KairosResult<Self> {
        if hour > 23 {
            return Err(KairosError::date().with_message("hour must be in 0..=23."));
        }
        if minute > 59 || second > 59 {
            return Err(KairosError::date().with_message("minute and second must be in 0..=59."));
        }
        if millisecond > 999 {
            return Err(KairosError::date().with_message("millisecond must be in 0..=999."));
        }
        Ok(Self::new_unchecked(hour, minute, second, millisecond))
    }

    /// The maximum representable time of day, `23:59:59.999`.
    pub const fn max() -> Self {
        Self::new_unchecked(23, 59, 59, 999)
    }

    /// Returns the milliseconds elapsed since the start of the day.
    pub(crate) const fn millis_of_day(self) -> i64 {
        self.hour as i64 * MS_PER_HOUR
            + self.minute as i64 * MS_PER_MINUTE
            + self.second as i64 * MS_PER_SECOND
            + self.millisecond as i64
    }

    /// Creates an `IsoTime` from milliseconds elapsed since the start of
    /// the day.
    pub(crate) const fn from_millis_of_day(millis: i64) -> Self {
        Self::new_unchecked(
            (millis / MS_PER_HOUR) as u8,
            ((millis / MS_PER_MINUTE) % 60) as u8,
            ((millis / MS_PER_SECOND) % 60) as u8,
            (millis % 1000) as u16,
        )
    }
}

impl fmt::Display for IsoTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}.{:03}",
            self.hour, self.minute, self.second, self.millisecond
        )
    }
}

/// The record of an `IsoDate` and an `IsoTime`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct IsoDateTime {
    pub date: IsoDate,
    pub time: IsoTime,
}

impl IsoDateTime {
    /// Creates a new `IsoDateTime` without validation.
    pub(crate) const fn new_unchecked(date: IsoDate, time: IsoTime) -> Self {
        Self { date, time }
    }

    /// Creates an `IsoDateTime` from a millisecond epoch as observed at a
    /// fixed offset east of UTC.
    pub(crate) fn from_epoch_millis(millis: i64, offset_minutes: i32) -> Self {
        let local = Epoch::new(millis + i64::from(offset_minutes) * MS_PER_MINUTE);
        let (year, month, day) = local.ymd();
        let (hour, minute, second, millisecond) = local.time_of_day();
        Self::new_unchecked(
            IsoDate::new_unchecked(year, month, day),
            IsoTime::new_unchecked(hour, minute, second, millisecond),
        )
    }

    /// Returns the millisecond epoch of this date-time as observed at a
    /// fixed offset east of UTC.
    pub(crate) fn epoch_millis(self, offset_minutes: i32) -> i64 {
        self.date.to_epoch_days() * MS_PER_DAY + self.time.millis_of_day()
            - i64::from(offset_minutes) * MS_PER_MINUTE
    }
}

impl fmt::Display for IsoDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}T{}", self.date, self.time)
    }
}

#[cfg(test)]
mod tests {
    use super::{IsoDate, IsoDateTime, IsoTime};

    #[test]
    fn date_validation() {
        assert!(IsoDate::new(2024, 2, 29).is_ok());
        assert!(IsoDate::new(2023, 2, 29).is_err());
        assert!(IsoDate::new(2024, 13, 1).is_err());
        assert!(IsoDate::new(2024, 0, 1).is_err());
        assert!(IsoDate::new(2024, 4, 31).is_err());
        assert!(IsoDate::new(0, 1, 1).is_err());
        assert!(IsoDate::new(10_000, 1, 1).is_err());
    }

    #[test]
    fn time_validation() {
        assert!(IsoTime::new(23, 59, 59, 999).is_ok());
        assert!(IsoTime::new(24, 0, 0, 0).is_err());
        assert!(IsoTime::new(12, 60, 0, 0).is_err());
        assert!(IsoTime::new(12, 0, 0, 1000).is_err());
    }

    #[test]
    fn date_ordering_is_calendar_order() {
        let a = IsoDate::new_unchecked(2024, 1, 31);
        let b = IsoDate::new_unchecked(2024, 2, 1);
        assert!(a < b);
    }

    #[test]
    fn datetime_offset_round_trip() {
        let dt = IsoDateTime::from_epoch_millis(1_718_461_800_000, 0);
        assert_eq!(dt.to_string(), "2024-06-15T14:30:00.000");
        assert_eq!(dt.epoch_millis(0), 1_718_461_800_000);

        // +09:00 (JST): the same epoch reads nine hours later on the wall.
        let jst = IsoDateTime::from_epoch_millis(1_718_461_800_000, 540);
        assert_eq!(jst.to_string(), "2024-06-15T23:30:00.000");
        assert_eq!(jst.epoch_millis(540), 1_718_461_800_000);
    }

    #[test]
    fn month_and_day_arithmetic() {
        let d = IsoDate::new_unchecked(2024, 1, 31);
        assert_eq!(d.add_months(1), IsoDate::new_unchecked(2024, 2, 29));
        assert_eq!(d.add_days(1), IsoDate::new_unchecked(2024, 2, 1));
        assert_eq!(d.add_days(-31), IsoDate::new_unchecked(2023, 12, 31));
    }
}
