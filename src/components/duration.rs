//! This module implements the Kairos `Duration` and its algebra.
//!
//! A duration is a signed integer millisecond magnitude. Conversions for
//! month, quarter and year use *average* constants (a month is 30.44
//! days, a year 365.25 days); they are approximations, fit for humanized
//! output and rough accounting, not calendar arithmetic. Use
//! `Instant::add(n, Unit::Month)` when calendar accuracy matters.

use core::cmp::Ordering;
use core::fmt;
use core::str::FromStr;

use num_traits::cast::FromPrimitive;

use crate::{
    error::KairosError,
    locale::Locale,
    options::Unit,
    parsers::duration::parse_iso_duration,
    relative, KairosResult, MS_PER_DAY, MS_PER_HOUR, MS_PER_MINUTE, MS_PER_MONTH, MS_PER_SECOND,
    MS_PER_WEEK, MS_PER_YEAR,
};

/// Largest magnitude a duration may hold, the double-precision safe
/// integer bound.
pub const MAX_SAFE_MILLIS: i64 = 9_007_199_254_740_991;

/// A component record for building a `Duration`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DurationComponents {
    pub years: i64,
    pub months: i64,
    pub weeks: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub milliseconds: i64,
}

/// The native Rust implementation of the Kairos duration.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Duration {
    millis: i64,
}

// ==== Creation ====

impl Duration {
    /// A zero-length duration.
    pub const ZERO: Self = Self { millis: 0 };

    /// Creates a duration from integer milliseconds.
    ///
    /// Magnitudes beyond the safe-integer bound fail with
    /// `InvalidDuration`.
    pub fn from_millis(millis: i64) -> KairosResult<Self> {
        if millis.abs() > MAX_SAFE_MILLIS {
            return Err(KairosError::duration()
                .with_message("duration exceeds the safe-integer millisecond bound."));
        }
        Ok(Self { millis })
    }

    /// Creates a duration from a float millisecond value, rounding to
    /// the nearest integer millisecond.
    pub fn from_millis_f64(millis: f64) -> KairosResult<Self> {
        if !millis.is_finite() {
            return Err(KairosError::duration().with_message("duration must be finite."));
        }
        let rounded = i64::from_f64(millis.round())
            .ok_or_else(|| KairosError::duration().with_message("duration must be finite."))?;
        Self::from_millis(rounded)
    }

    /// Creates a duration from a component record, normalizing through
    /// the exact sub-day constants and the average month/year constants.
    pub fn from_components(components: &DurationComponents) -> KairosResult<Self> {
        let mut total: i128 = 0;
        for (count, unit_millis) in [
            (components.years, MS_PER_YEAR),
            (components.months, MS_PER_MONTH),
            (components.weeks, MS_PER_WEEK),
            (components.days, MS_PER_DAY),
            (components.hours, MS_PER_HOUR),
            (components.minutes, MS_PER_MINUTE),
            (components.seconds, MS_PER_SECOND),
            (components.milliseconds, 1),
        ] {
            total += i128::from(count) * i128::from(unit_millis);
        }
        let millis = i64::try_from(total).map_err(|_| {
            KairosError::duration().with_message("duration exceeds the safe-integer bound.")
        })?;
        Self::from_millis(millis)
    }

    /// Parses an ISO-8601 duration string.
    pub fn from_iso(input: &str) -> KairosResult<Self> {
        let record = parse_iso_duration(input)?;
        let unsigned = Self::from_components(&DurationComponents {
            years: i64::try_from(record.years).unwrap_or(i64::MAX),
            months: i64::try_from(record.months).unwrap_or(i64::MAX),
            weeks: i64::try_from(record.weeks).unwrap_or(i64::MAX),
            days: i64::try_from(record.days).unwrap_or(i64::MAX),
            hours: i64::try_from(record.hours).unwrap_or(i64::MAX),
            minutes: i64::try_from(record.minutes).unwrap_or(i64::MAX),
            seconds: i64::try_from(record.seconds).unwrap_or(i64::MAX),
            milliseconds: i64::try_from(record.milliseconds).unwrap_or(i64::MAX),
        })?;
        if record.negative {
            return unsigned.negate();
        }
        Ok(unsigned)
    }
}

// ==== Accessors ====

impl Duration {
    /// The signed millisecond magnitude.
    #[inline]
    #[must_use]
    pub fn millis(&self) -> i64 {
        self.millis
    }

    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.millis == 0
    }

    /// Returns `-1`, `0` or `1`.
    #[inline]
    #[must_use]
    pub fn signum(&self) -> i8 {
        match self.millis.cmp(&0) {
            Ordering::Less => -1,
            Ordering::Equal => 0,
            Ordering::Greater => 1,
        }
    }

    /// Converts to the given unit. Month, quarter and year use the
    /// average constants and are approximations.
    #[must_use]
    pub fn as_unit(&self, unit: Unit) -> f64 {
        let unit_millis = match unit {
            Unit::Month => MS_PER_MONTH,
            Unit::Quarter => MS_PER_MONTH * 3,
            Unit::Year => MS_PER_YEAR,
            // Fixed-magnitude units always resolve.
            other => other.as_millis().unwrap_or(1),
        };
        self.millis as f64 / unit_millis as f64
    }
}

// ==== Algebra ====

impl Duration {
    pub fn add(&self, other: &Self) -> KairosResult<Self> {
        let sum = self.millis.checked_add(other.millis).ok_or_else(|| {
            KairosError::duration().with_message("duration exceeds the safe-integer bound.")
        })?;
        Self::from_millis(sum)
    }

    pub fn subtract(&self, other: &Self) -> KairosResult<Self> {
        let difference = self.millis.checked_sub(other.millis).ok_or_else(|| {
            KairosError::duration().with_message("duration exceeds the safe-integer bound.")
        })?;
        Self::from_millis(difference)
    }

    /// Scales by a factor, rounding to the nearest millisecond.
    pub fn multiply(&self, factor: f64) -> KairosResult<Self> {
        if !factor.is_finite() {
            return Err(KairosError::duration().with_message("scale factor must be finite."));
        }
        Self::from_millis_f64(self.millis as f64 * factor)
    }

    /// Divides by a divisor, rounding to the nearest millisecond.
    ///
    /// Fails with `DivisionByZero` for zero and `InvalidDuration` for
    /// non-finite divisors.
    pub fn divide(&self, divisor: f64) -> KairosResult<Self> {
        if divisor == 0.0 {
            return Err(
                KairosError::division_by_zero().with_message("cannot divide a duration by zero.")
            );
        }
        if !divisor.is_finite() {
            return Err(KairosError::duration().with_message("divisor must be finite."));
        }
        Self::from_millis_f64(self.millis as f64 / divisor)
    }

    pub fn negate(&self) -> KairosResult<Self> {
        let negated = self.millis.checked_neg().ok_or_else(|| {
            KairosError::duration().with_message("duration exceeds the safe-integer bound.")
        })?;
        Self::from_millis(negated)
    }

    pub fn abs(&self) -> KairosResult<Self> {
        if self.millis < 0 {
            return self.negate();
        }
        Ok(*self)
    }
}

// ==== Emission ====

impl Duration {
    /// Canonical ISO-8601 emission: zero components are omitted, the `P`
    /// prefix is always present, `T` appears only when a time component
    /// does, and seconds take a decimal only for non-zero milliseconds.
    #[must_use]
    pub fn to_iso_string(&self) -> String {
        if self.millis == 0 {
            return String::from("PT0S");
        }
        let mut out = String::new();
        if self.millis < 0 {
            out.push('-');
        }
        out.push('P');
        let mut remainder = self.millis.unsigned_abs();

        for (unit_millis, designator) in [
            (MS_PER_YEAR as u64, 'Y'),
            (MS_PER_MONTH as u64, 'M'),
            (MS_PER_DAY as u64, 'D'),
        ] {
            let count = remainder / unit_millis;
            remainder %= unit_millis;
            if count > 0 {
                out.push_str(&count.to_string());
                out.push(designator);
            }
        }

        if remainder > 0 {
            out.push('T');
            for (unit_millis, designator) in
                [(MS_PER_HOUR as u64, 'H'), (MS_PER_MINUTE as u64, 'M')]
            {
                let count = remainder / unit_millis;
                remainder %= unit_millis;
                if count > 0 {
                    out.push_str(&count.to_string());
                    out.push(designator);
                }
            }
            let seconds = remainder / 1000;
            let milliseconds = remainder % 1000;
            if milliseconds > 0 {
                let fraction = format!("{milliseconds:03}");
                out.push_str(&format!("{seconds}.{}S", fraction.trim_end_matches('0')));
            } else if seconds > 0 {
                out.push_str(&format!("{seconds}S"));
            }
        }
        out
    }

    /// Locale-aware humanization through the threshold table; a suffixed
    /// form reads as relative time (`in 2 hours` / `vor 2 Stunden`).
    #[must_use]
    pub fn humanize(&self, locale: &Locale, with_suffix: bool) -> String {
        relative::humanize_millis(self.millis, locale, with_suffix)
    }
}

impl FromStr for Duration {
    type Err = KairosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_iso(s)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso_string())
    }
}

// ==== Duration Tests ====

#[cfg(test)]
mod tests {
    use super::{Duration, DurationComponents, MAX_SAFE_MILLIS};
    use crate::error::ErrorKind;
    use crate::options::Unit;

    #[test]
    fn safe_integer_bounds() {
        assert!(Duration::from_millis(MAX_SAFE_MILLIS).is_ok());
        assert!(Duration::from_millis(-MAX_SAFE_MILLIS).is_ok());
        assert_eq!(
            Duration::from_millis(MAX_SAFE_MILLIS + 1).unwrap_err().kind(),
            ErrorKind::InvalidDuration
        );
    }

    #[test]
    fn component_normalization_uses_average_constants() {
        let one_month = Duration::from_components(&DurationComponents {
            months: 1,
            ..DurationComponents::default()
        })
        .unwrap();
        assert_eq!(one_month.millis(), 2_629_746_000);
        let one_year = Duration::from_components(&DurationComponents {
            years: 1,
            ..DurationComponents::default()
        })
        .unwrap();
        assert_eq!(one_year.millis(), 31_557_600_000);
        let mixed = Duration::from_components(&DurationComponents {
            days: 1,
            hours: 2,
            minutes: 3,
            seconds: 4,
            milliseconds: 5,
            ..DurationComponents::default()
        })
        .unwrap();
        assert_eq!(mixed.millis(), 86_400_000 + 7_200_000 + 180_000 + 4_000 + 5);
    }

    #[test]
    fn iso_round_trip_canonical_form() {
        let duration: Duration = "P1Y2M3DT4H5M6S".parse().unwrap();
        assert_eq!(duration.to_iso_string(), "P1Y2M3DT4H5M6S");
    }

    #[test]
    fn iso_emission_edges() {
        assert_eq!(Duration::ZERO.to_iso_string(), "PT0S");
        assert_eq!(Duration::from_millis(1_500).unwrap().to_iso_string(), "PT1.5S");
        assert_eq!(Duration::from_millis(25).unwrap().to_iso_string(), "PT0.025S");
        assert_eq!(Duration::from_millis(-90_000).unwrap().to_iso_string(), "-PT1M30S");
        assert_eq!(
            Duration::from_iso("P2W").unwrap().to_iso_string(),
            "P14D"
        );
        assert_eq!(
            Duration::from_millis(86_400_000).unwrap().to_iso_string(),
            "P1D"
        );
    }

    #[test]
    fn algebra() {
        let hour = Duration::from_millis(3_600_000).unwrap();
        let half = hour.divide(2.0).unwrap();
        assert_eq!(half.millis(), 1_800_000);
        assert_eq!(hour.add(&half).unwrap().millis(), 5_400_000);
        assert_eq!(hour.subtract(&half).unwrap().millis(), 1_800_000);
        assert_eq!(hour.multiply(2.5).unwrap().millis(), 9_000_000);
        let negated = hour.negate().unwrap();
        assert_eq!(negated.signum(), -1);
        assert_eq!(negated.negate().unwrap(), hour);
        assert_eq!(negated.abs().unwrap(), hour);
    }

    #[test]
    fn division_failures() {
        let hour = Duration::from_millis(3_600_000).unwrap();
        assert_eq!(hour.divide(0.0).unwrap_err().kind(), ErrorKind::DivisionByZero);
        assert_eq!(
            hour.divide(f64::NAN).unwrap_err().kind(),
            ErrorKind::InvalidDuration
        );
        assert_eq!(
            hour.multiply(f64::INFINITY).unwrap_err().kind(),
            ErrorKind::InvalidDuration
        );
    }

    #[test]
    fn unit_conversions() {
        let day = Duration::from_millis(86_400_000).unwrap();
        assert!((day.as_unit(Unit::Hour) - 24.0).abs() < f64::EPSILON);
        assert!((day.as_unit(Unit::Day) - 1.0).abs() < f64::EPSILON);
        // Approximate by design: a 30-day stretch is slightly under an
        // average month.
        let month_ish = Duration::from_millis(30 * 86_400_000).unwrap();
        let months = month_ish.as_unit(Unit::Month);
        assert!(months > 0.98 && months < 1.0);
    }
}
