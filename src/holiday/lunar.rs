//! The lunar calendar collaborator.
//!
//! The holiday engine does no lunar astronomy of its own; it dispatches
//! through [`LunarProvider`] and passes through whatever the provider
//! returns (zero, one, or two dates per Gregorian year).
//!
//! The bundled [`TabularLunarProvider`] uses exact tabular arithmetic
//! for the islamic (civil) and persian (2820-year cycle) calendars, and
//! mean-lunation approximations for the chinese and hebrew calendars.
//! The approximations can be off by days; production systems observing
//! those calendars should plug in a vetted astronomical implementation.

use std::sync::Once;

use crate::holiday::rules::LunarCalendarKind;
use crate::iso::IsoDate;
use crate::utils;

/// Mean synodic month in days.
const SYNODIC_MONTH: f64 = 29.530_588_861;
/// Epoch day (fractional) of the 2000-01-06 new moon.
const NEW_MOON_ANCHOR: f64 = 10_962.76;
/// Epoch day of 1 Tishrei 5784 (2023-09-16).
const HEBREW_ANCHOR_DAY: i64 = 19_616;
const HEBREW_ANCHOR_YEAR: i64 = 5784;

static APPROXIMATION_WARNING: Once = Once::new();

/// Resolves dates in a non-Gregorian lunar calendar.
///
/// `compute_gregorian` returns every occurrence of the given lunar
/// `(month, day)` that falls within the Gregorian `year` — usually one,
/// sometimes zero or two, since lunar years are shorter than solar ones.
pub trait LunarProvider: Send + Sync {
    fn compute_gregorian(
        &self,
        calendar: LunarCalendarKind,
        year: i32,
        month: u8,
        day: u8,
    ) -> Vec<IsoDate>;
}

/// The bundled arithmetic provider.
#[derive(Debug, Default, Clone, Copy)]
pub struct TabularLunarProvider;

impl LunarProvider for TabularLunarProvider {
    fn compute_gregorian(
        &self,
        calendar: LunarCalendarKind,
        year: i32,
        month: u8,
        day: u8,
    ) -> Vec<IsoDate> {
        match calendar {
            LunarCalendarKind::Islamic => islamic_in_gregorian_year(year, month, day),
            LunarCalendarKind::Persian => persian_in_gregorian_year(year, month, day),
            LunarCalendarKind::Chinese => {
                warn_approximate();
                chinese_in_gregorian_year(year, month, day)
            }
            LunarCalendarKind::Hebrew => {
                warn_approximate();
                hebrew_in_gregorian_year(year, month, day)
            }
        }
    }
}

fn warn_approximate() {
    APPROXIMATION_WARNING.call_once(|| {
        log::warn!(
            "chinese/hebrew dates use mean-lunation approximations that can be off by days; \
             plug in an astronomical LunarProvider for calendar-accurate results"
        );
    });
}

fn collect_in_year(year: i32, candidates: impl IntoIterator<Item = i64>) -> Vec<IsoDate> {
    let mut dates: Vec<IsoDate> = candidates
        .into_iter()
        .map(IsoDate::from_epoch_days)
        .filter(|date| date.year == year)
        .collect();
    dates.sort_unstable();
    dates.dedup();
    dates
}

// ==== Islamic (tabular civil) ====

/// Epoch day of an islamic civil-calendar date.
fn islamic_to_epoch_day(year: i64, month: u8, day: u8) -> i64 {
    let k = i64::from(month) - 1;
    let jdn =
        i64::from(day) + 29 * k + (k + 1) / 2 + 354 * (year - 1) + (3 + 11 * year) / 30 + 1_948_439;
    jdn - 2_440_588
}

fn islamic_in_gregorian_year(year: i32, month: u8, day: u8) -> Vec<IsoDate> {
    // An islamic year is ~354 days, so a lunar date can land in a
    // Gregorian year twice. Scan the handful of candidate years.
    let guess = (i64::from(year) - 622) * 33 / 32 + 1;
    collect_in_year(
        year,
        (guess - 2..=guess + 2).map(|iy| islamic_to_epoch_day(iy, month, day)),
    )
}

// ==== Persian (arithmetic 2820-year cycle) ====

fn persian_to_epoch_day(year: i64, month: u8, day: u8) -> i64 {
    let epbase = year - 474;
    let epyear = 474 + epbase.rem_euclid(2820);
    let mday = if month <= 7 {
        i64::from(month - 1) * 31
    } else {
        i64::from(month - 1) * 30 + 6
    };
    i64::from(day)
        + mday
        + (epyear * 682 - 110).div_euclid(2816)
        + (epyear - 1) * 365
        + epbase.div_euclid(2820) * 1_029_983
        + 1_948_320
        - 2_440_588
}

fn persian_in_gregorian_year(year: i32, month: u8, day: u8) -> Vec<IsoDate> {
    let guess = i64::from(year) - 621;
    collect_in_year(
        year,
        (guess - 2..=guess + 2).map(|py| persian_to_epoch_day(py, month, day)),
    )
}

// ==== Chinese (mean-lunation approximation) ====

fn chinese_new_year_epoch_day(year: i32) -> i64 {
    // The new year begins on the first new moon on or after January 21.
    let window_start = utils::epoch_days_from_gregorian_date(year, 1, 21) as f64;
    let lunation = ((window_start - NEW_MOON_ANCHOR) / SYNODIC_MONTH).ceil();
    (NEW_MOON_ANCHOR + lunation * SYNODIC_MONTH).floor() as i64
}

fn chinese_in_gregorian_year(year: i32, month: u8, day: u8) -> Vec<IsoDate> {
    let candidates = [year - 1, year].map(|y| {
        chinese_new_year_epoch_day(y)
            + (f64::from(month - 1) * SYNODIC_MONTH).round() as i64
            + i64::from(day)
            - 1
    });
    collect_in_year(year, candidates)
}

// ==== Hebrew (metonic mean approximation) ====

fn hebrew_months_elapsed(year: i64) -> i64 {
    (235 * year - 234) / 19
}

fn hebrew_to_epoch_day(year: i64, month: u8, day: u8) -> i64 {
    let delta = hebrew_months_elapsed(year) - hebrew_months_elapsed(HEBREW_ANCHOR_YEAR);
    let year_start = HEBREW_ANCHOR_DAY + (delta as f64 * SYNODIC_MONTH).round() as i64;
    // Religious month numbering starts at Nisan; the year starts at
    // Tishrei (month 7). Leap-month shifts are not modeled.
    let months_from_tishrei = if month >= 7 {
        i64::from(month) - 7
    } else {
        i64::from(month) + 5
    };
    year_start + (months_from_tishrei as f64 * SYNODIC_MONTH).round() as i64 + i64::from(day) - 1
}

fn hebrew_in_gregorian_year(year: i32, month: u8, day: u8) -> Vec<IsoDate> {
    let guess = i64::from(year) + 3760;
    collect_in_year(
        year,
        (guess - 1..=guess + 2).map(|hy| hebrew_to_epoch_day(hy, month, day)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn islamic_epoch_anchor() {
        // 1 Muharram 1 AH is 622-07-19 in the proleptic Gregorian
        // calendar (622-07-16 Julian).
        let date = IsoDate::from_epoch_days(islamic_to_epoch_day(1, 1, 1));
        assert_eq!((date.year, date.month, date.day), (622, 7, 19));
    }

    #[test]
    fn islamic_new_year_lands_in_expected_years() {
        // 1 Muharram 1446 was 2024-07-07 in the tabular civil calendar.
        let dates = islamic_in_gregorian_year(2024, 1, 1);
        assert_eq!(dates.len(), 1);
        assert_eq!(dates[0].year, 2024);
        assert_eq!(dates[0].month, 7);
    }

    #[test]
    fn islamic_dates_can_repeat_within_a_gregorian_year() {
        // The islamic year is ~11 days short of the solar year, so some
        // Gregorian year in any 33-year window sees a lunar date twice.
        let mut doubles = 0;
        for year in 2000..2040 {
            let hits = islamic_in_gregorian_year(year, 1, 1).len();
            assert!(hits <= 2);
            if hits == 2 {
                doubles += 1;
            }
        }
        assert!(doubles >= 1);
    }

    #[test]
    fn persian_epoch_anchor() {
        // 1 Farvardin 1 AP is 622-03-22 proleptic Gregorian.
        let date = IsoDate::from_epoch_days(persian_to_epoch_day(1, 1, 1));
        assert_eq!((date.year, date.month), (622, 3));
    }

    #[test]
    fn persian_nowruz_is_late_march() {
        for year in [2020, 2024, 2030] {
            let dates = persian_in_gregorian_year(year, 1, 1);
            assert_eq!(dates.len(), 1);
            assert_eq!(dates[0].month, 3);
            assert!((19..=22).contains(&dates[0].day));
        }
    }

    #[test]
    fn chinese_new_year_approximation_is_close() {
        // 2024 Spring Festival was February 10; the mean-lunation
        // approximation must land within a couple of days.
        let dates = chinese_in_gregorian_year(2024, 1, 1);
        assert_eq!(dates.len(), 1);
        assert_eq!(dates[0].month, 2);
        assert!((8..=12).contains(&dates[0].day));
    }

    #[test]
    fn hebrew_rosh_hashanah_approximation_is_close() {
        // 1 Tishrei 5785 was 2024-10-03.
        let dates = hebrew_in_gregorian_year(2024, 7, 1);
        assert_eq!(dates.len(), 1);
        assert!(matches!(dates[0].month, 9 | 10));
    }
}
