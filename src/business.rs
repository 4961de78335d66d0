//! The business-day calculator.
//!
//! A business day is a day that is neither in the configured weekend
//! set nor covered by a holiday rule. All searches are bounded by the
//! configured iteration cap and fail with `NoBusinessDayFound` rather
//! than walking forever.

use std::collections::BTreeSet;
use std::sync::Mutex;

use crate::{
    cache::LruCache,
    components::Instant,
    error::KairosError,
    holiday::{HolidayEngine, HolidayRule, RuleSet},
    iso::IsoDate,
    options::Unit,
    KairosResult,
};

const DAY_CACHE_CAPACITY: usize = 512;

/// Construction-time configuration.
#[derive(Debug, Clone)]
pub struct BusinessConfig {
    /// Weekend days, `0` being Sunday.
    pub weekends: BTreeSet<u8>,
    pub holidays: Vec<HolidayRule>,
    /// Bounded-search cap for the single-step searches.
    pub max_iterations: u32,
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            weekends: BTreeSet::from([0, 6]),
            holidays: Vec::new(),
            max_iterations: 1000,
        }
    }
}

/// A weekend/holiday predicate with bounded business-day searches.
#[derive(Debug)]
pub struct BusinessCalendar {
    weekends: BTreeSet<u8>,
    rules: RuleSet,
    max_iterations: u32,
    engine: HolidayEngine,
    day_cache: Mutex<LruCache<String, bool>>,
}

impl BusinessCalendar {
    /// Validates the configuration eagerly: a seven-day weekend leaves
    /// no possible business day and a zero iteration cap can never find
    /// one, so both are `InvalidConfiguration` at construction.
    pub fn try_new(config: BusinessConfig) -> KairosResult<Self> {
        if config.weekends.iter().any(|&day| day > 6) {
            return Err(
                KairosError::configuration().with_message("weekend days must be in 0..=6.")
            );
        }
        if config.weekends.len() >= 7 {
            return Err(KairosError::configuration()
                .with_message("a seven-day weekend leaves no business days."));
        }
        if config.max_iterations < 1 {
            return Err(
                KairosError::configuration().with_message("max_iterations must be at least 1.")
            );
        }
        Ok(Self {
            weekends: config.weekends,
            rules: RuleSet::new(config.holidays)?,
            max_iterations: config.max_iterations,
            engine: HolidayEngine::new(),
            day_cache: Mutex::new(
                LruCache::try_new(DAY_CACHE_CAPACITY).unwrap_or_else(|_| unreachable!()),
            ),
        })
    }

    /// A weekend-only calendar with the default configuration.
    pub fn standard() -> Self {
        Self::try_new(BusinessConfig::default()).unwrap_or_else(|_| unreachable!())
    }

    /// Returns whether the instant's calendar date (in its active frame)
    /// is a business day.
    pub fn is_business_day(&self, instant: &Instant) -> KairosResult<bool> {
        let date = instant
            .date()
            .ok_or_else(|| KairosError::date().with_message("instant is invalid."))?;
        self.is_business_date(date)
    }

    /// The date-level predicate, cached by the calendar-date string to
    /// match the calculation frame.
    pub fn is_business_date(&self, date: IsoDate) -> KairosResult<bool> {
        let key = date.to_string();
        if let Ok(mut cache) = self.day_cache.lock() {
            if let Some(&hit) = cache.get(&key) {
                return Ok(hit);
            }
        }
        let result = !self.weekends.contains(&date.weekday())
            && self.engine.is_holiday(date, &self.rules, None)?.is_none();
        if let Ok(mut cache) = self.day_cache.lock() {
            cache.put(key, result);
        }
        Ok(result)
    }

    /// The next business day strictly after the given instant,
    /// preserving its time of day.
    pub fn next_business_day(&self, instant: &Instant) -> KairosResult<Instant> {
        self.step_search(instant, 1)
    }

    /// The last business day strictly before the given instant.
    pub fn previous_business_day(&self, instant: &Instant) -> KairosResult<Instant> {
        self.step_search(instant, -1)
    }

    fn step_search(&self, instant: &Instant, direction: i64) -> KairosResult<Instant> {
        if !instant.is_valid() {
            return Err(KairosError::date().with_message("instant is invalid."));
        }
        let mut candidate = *instant;
        for _ in 0..self.max_iterations {
            candidate = candidate.add(direction, Unit::Day);
            if self.is_business_day(&candidate)? {
                return Ok(candidate);
            }
        }
        Err(KairosError::no_business_day().with_message(format!(
            "no business day within {} steps.",
            self.max_iterations
        )))
    }

    /// Shifts by `n` business days. `n == 0` returns the input as-is,
    /// business day or not; callers wanting snap-to-business-day
    /// semantics check `is_business_day` first.
    pub fn add_business_days(&self, instant: &Instant, n: i64) -> KairosResult<Instant> {
        let mut current = *instant;
        if n == 0 {
            return Ok(current);
        }
        let direction = if n > 0 { 1 } else { -1 };
        for _ in 0..n.abs() {
            current = self.step_search(&current, direction)?;
        }
        Ok(current)
    }

    /// Counts business days in the *inclusive* interval between the two
    /// instants; the sign follows argument order. An instant compared
    /// with itself on a business day counts 1.
    pub fn business_days_between(&self, a: &Instant, b: &Instant) -> KairosResult<i64> {
        let start = a
            .date()
            .ok_or_else(|| KairosError::date().with_message("instant is invalid."))?;
        let end = b
            .date()
            .ok_or_else(|| KairosError::date().with_message("instant is invalid."))?;
        let (low, high) = if start <= end {
            (start, end)
        } else {
            (end, start)
        };
        let mut count = 0;
        let mut day = low;
        while day <= high {
            if self.is_business_date(day)? {
                count += 1;
            }
            day = day.add_days(1);
        }
        Ok(if start <= end { count } else { -count })
    }

    /// Counts business days in a calendar month.
    pub fn business_days_in_month(&self, year: i32, month: u8) -> KairosResult<u32> {
        let first = IsoDate::new(year, month, 1)?;
        let mut count = 0;
        for day in 1..=first.days_in_month() {
            if self.is_business_date(IsoDate::new_unchecked(year, month, day))? {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Counts business days in a calendar year.
    pub fn business_days_in_year(&self, year: i32) -> KairosResult<u32> {
        let mut count = 0;
        for month in 1..=12 {
            count += self.business_days_in_month(year, month)?;
        }
        Ok(count)
    }

    /// Settlement date for a T+N convention: `n` business days after the
    /// trade date.
    pub fn settlement_date(&self, trade_date: &Instant, t_plus_n: i64) -> KairosResult<Instant> {
        self.add_business_days(trade_date, t_plus_n)
    }
}

// ==== Business calendar tests ====

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::{BusinessCalendar, BusinessConfig};
    use crate::components::instant::DateTimeComponents;
    use crate::components::Instant;
    use crate::error::ErrorKind;
    use crate::holiday::{HolidayRule, ObservedRule};

    fn utc_date(year: i32, month: u8, day: u8) -> Instant {
        Instant::from_components(
            &DateTimeComponents {
                year,
                month,
                day,
                ..DateTimeComponents::default()
            },
            true,
        )
        .unwrap()
    }

    fn us_calendar() -> BusinessCalendar {
        BusinessCalendar::try_new(BusinessConfig {
            holidays: vec![
                HolidayRule::fixed("Christmas Day", 12, 25)
                    .with_observed(ObservedRule::nearest_weekday()),
                HolidayRule::fixed("New Year's Day", 1, 1)
                    .with_observed(ObservedRule::nearest_weekday()),
            ],
            ..BusinessConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn construction_validation() {
        let all_week = BusinessConfig {
            weekends: BTreeSet::from([0, 1, 2, 3, 4, 5, 6]),
            ..BusinessConfig::default()
        };
        assert_eq!(
            BusinessCalendar::try_new(all_week).unwrap_err().kind(),
            ErrorKind::InvalidConfiguration
        );
        let zero_iterations = BusinessConfig {
            max_iterations: 0,
            ..BusinessConfig::default()
        };
        assert!(BusinessCalendar::try_new(zero_iterations).is_err());
        let bad_weekday = BusinessConfig {
            weekends: BTreeSet::from([7]),
            ..BusinessConfig::default()
        };
        assert!(BusinessCalendar::try_new(bad_weekday).is_err());
    }

    #[test]
    fn weekends_and_holidays_are_not_business_days() {
        let calendar = us_calendar();
        // 2024-12-21 is a Saturday, 12-25 is Christmas (Wednesday).
        assert!(!calendar.is_business_day(&utc_date(2024, 12, 21)).unwrap());
        assert!(!calendar.is_business_day(&utc_date(2024, 12, 25)).unwrap());
        assert!(calendar.is_business_day(&utc_date(2024, 12, 23)).unwrap());
        // Repeat lookups hit the day cache.
        assert!(calendar.is_business_day(&utc_date(2024, 12, 23)).unwrap());
    }

    #[test]
    fn inclusive_business_days_between_with_holidays() {
        let calendar = us_calendar();
        // Fri 2024-12-20 ..= Fri 2024-12-27, skipping the weekend and
        // Christmas: Fri 20, Mon 23, Tue 24, Thu 26, Fri 27.
        let count = calendar
            .business_days_between(&utc_date(2024, 12, 20), &utc_date(2024, 12, 27))
            .unwrap();
        assert_eq!(count, 5);
        // Sign follows direction.
        let reversed = calendar
            .business_days_between(&utc_date(2024, 12, 27), &utc_date(2024, 12, 20))
            .unwrap();
        assert_eq!(reversed, -5);
    }

    #[test]
    fn same_business_day_counts_one() {
        let calendar = us_calendar();
        let friday = utc_date(2024, 12, 20);
        assert_eq!(calendar.business_days_between(&friday, &friday).unwrap(), 1);
        let saturday = utc_date(2024, 12, 21);
        assert_eq!(
            calendar.business_days_between(&saturday, &saturday).unwrap(),
            0
        );
    }

    #[test]
    fn next_and_previous_skip_nonbusiness_days() {
        let calendar = us_calendar();
        // From Christmas Eve: the 25th is a holiday, so next lands on
        // the 26th; previous from the 26th lands back on the 24th.
        let next = calendar.next_business_day(&utc_date(2024, 12, 24)).unwrap();
        assert_eq!(next.day(), Some(26));
        let previous = calendar
            .previous_business_day(&utc_date(2024, 12, 26))
            .unwrap();
        assert_eq!(previous.day(), Some(24));
        // From Friday the 27th, next skips the weekend to Monday.
        let monday = calendar.next_business_day(&utc_date(2024, 12, 27)).unwrap();
        assert_eq!(monday.day(), Some(30));
    }

    #[test]
    fn add_business_days_and_settlement() {
        let calendar = us_calendar();
        let trade = utc_date(2024, 12, 20);
        // T+2 from Friday the 20th: Mon 23, Tue 24.
        let settled = calendar.settlement_date(&trade, 2).unwrap();
        assert_eq!(settled.day(), Some(24));
        // T+3 crosses Christmas to the 26th.
        let settled = calendar.settlement_date(&trade, 3).unwrap();
        assert_eq!(settled.day(), Some(26));
        // Zero keeps the input, business day or not.
        let saturday = utc_date(2024, 12, 21);
        assert_eq!(
            calendar.add_business_days(&saturday, 0).unwrap(),
            saturday
        );
        // Negative counts walk backward.
        let back = calendar.add_business_days(&utc_date(2024, 12, 26), -2).unwrap();
        assert_eq!(back.day(), Some(23));
    }

    #[test]
    fn bounded_search_fails_rather_than_looping() {
        // Business days exist only one day a week; a one-step budget
        // cannot reach them from most dates.
        let calendar = BusinessCalendar::try_new(BusinessConfig {
            weekends: BTreeSet::from([0, 1, 2, 3, 4, 6]),
            max_iterations: 1,
            ..BusinessConfig::default()
        })
        .unwrap();
        // 2024-06-15 is a Saturday; the only business day is Friday.
        let err = calendar
            .next_business_day(&utc_date(2024, 6, 15))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoBusinessDayFound);
    }

    #[test]
    fn monthly_and_yearly_counts() {
        let weekends_only = BusinessCalendar::standard();
        // June 2024 has 20 weekdays.
        assert_eq!(weekends_only.business_days_in_month(2024, 6).unwrap(), 20);
        // 2024 has 262 weekdays.
        assert_eq!(weekends_only.business_days_in_year(2024).unwrap(), 262);
        let calendar = us_calendar();
        // December 2024: 22 weekdays minus Christmas.
        assert_eq!(calendar.business_days_in_month(2024, 12).unwrap(), 21);
    }

    #[test]
    fn multi_day_holidays_block_their_whole_span() {
        let calendar = BusinessCalendar::try_new(BusinessConfig {
            holidays: vec![HolidayRule::fixed("Golden Week", 10, 1).with_duration_days(3)],
            ..BusinessConfig::default()
        })
        .unwrap();
        // 2024-10-01 is a Tuesday; the 1st through 3rd are covered.
        assert!(!calendar.is_business_day(&utc_date(2024, 10, 1)).unwrap());
        assert!(!calendar.is_business_day(&utc_date(2024, 10, 2)).unwrap());
        assert!(!calendar.is_business_day(&utc_date(2024, 10, 3)).unwrap());
        assert!(calendar.is_business_day(&utc_date(2024, 10, 4)).unwrap());
    }
}
