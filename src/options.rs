//! Operation options for Kairos.
//!
//! The central vocabulary is [`Unit`], accepted by instant arithmetic,
//! period boundaries, diffs, ranges, and duration conversion. String
//! forms accept the usual aliases (`"day"`, `"days"`, `"d"`).

use core::fmt;
use core::str::FromStr;

use crate::{MS_PER_DAY, MS_PER_HOUR, MS_PER_MINUTE, MS_PER_SECOND, MS_PER_WEEK};

/// The calendar or clock unit an operation works in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Unit {
    /// The `Millisecond` unit
    Millisecond,
    /// The `Second` unit
    Second,
    /// The `Minute` unit
    Minute,
    /// The `Hour` unit
    Hour,
    /// The `Day` unit
    Day,
    /// The `Week` unit
    Week,
    /// The `Month` unit
    Month,
    /// The `Quarter` unit
    Quarter,
    /// The `Year` unit
    Year,
}

impl Unit {
    /// Returns the unit's fixed millisecond magnitude, or `None` for the
    /// calendar units whose length varies by month.
    #[inline]
    #[must_use]
    pub fn as_millis(self) -> Option<i64> {
        match self {
            Self::Millisecond => Some(1),
            Self::Second => Some(MS_PER_SECOND),
            Self::Minute => Some(MS_PER_MINUTE),
            Self::Hour => Some(MS_PER_HOUR),
            Self::Day => Some(MS_PER_DAY),
            Self::Week => Some(MS_PER_WEEK),
            Self::Month | Self::Quarter | Self::Year => None,
        }
    }

    /// Returns `true` for units that require calendar arithmetic.
    #[inline]
    #[must_use]
    pub fn is_calendar_unit(self) -> bool {
        matches!(self, Self::Month | Self::Quarter | Self::Year)
    }

    /// Returns the equivalent month count for calendar units.
    #[inline]
    pub(crate) fn months(self) -> Option<i64> {
        match self {
            Self::Month => Some(1),
            Self::Quarter => Some(3),
            Self::Year => Some(12),
            _ => None,
        }
    }
}

/// A parsing error for [`Unit`].
#[derive(Debug, Clone, Copy)]
pub struct ParseUnitError;

impl fmt::Display for ParseUnitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("provided string was not a valid Unit")
    }
}

impl std::error::Error for ParseUnitError {}

impl FromStr for Unit {
    type Err = ParseUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "millisecond" | "milliseconds" | "ms" => Ok(Self::Millisecond),
            "second" | "seconds" | "sec" | "s" => Ok(Self::Second),
            "minute" | "minutes" | "min" => Ok(Self::Minute),
            "hour" | "hours" | "hr" | "h" => Ok(Self::Hour),
            "day" | "days" | "d" => Ok(Self::Day),
            "week" | "weeks" | "w" => Ok(Self::Week),
            "month" | "months" | "mo" => Ok(Self::Month),
            "quarter" | "quarters" | "q" => Ok(Self::Quarter),
            "year" | "years" | "y" => Ok(Self::Year),
            _ => Err(ParseUnitError),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Millisecond => "millisecond",
            Self::Second => "second",
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Year => "year",
        }
        .fmt(f)
    }
}

/// Resolution order for ambiguous two-number dates such as `03-05-2024`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DateOrder {
    /// Interpret the leading number as the day (European convention).
    #[default]
    DayFirst,
    /// Interpret the leading number as the month (US convention).
    MonthFirst,
}

#[cfg(test)]
mod tests {
    use super::Unit;

    #[test]
    fn unit_aliases_parse() {
        assert_eq!("ms".parse::<Unit>().unwrap(), Unit::Millisecond);
        assert_eq!("minutes".parse::<Unit>().unwrap(), Unit::Minute);
        assert_eq!("mo".parse::<Unit>().unwrap(), Unit::Month);
        assert_eq!("q".parse::<Unit>().unwrap(), Unit::Quarter);
        assert_eq!("y".parse::<Unit>().unwrap(), Unit::Year);
        assert!("fortnight".parse::<Unit>().is_err());
    }

    #[test]
    fn calendar_units_have_no_fixed_millis() {
        assert_eq!(Unit::Day.as_millis(), Some(86_400_000));
        assert_eq!(Unit::Week.as_millis(), Some(604_800_000));
        assert_eq!(Unit::Month.as_millis(), None);
        assert_eq!(Unit::Quarter.months(), Some(3));
    }
}
