//! The flexible strategy: an ordered list of common date shapes.
//!
//! Every match builds a candidate date that must validate round-trip —
//! the constructed calendar date has to reproduce the parsed numbers,
//! which is what rejects rollover like `30/02/2024`. Ambiguous
//! two-number dates follow the caller's (or active locale's) date-order
//! hint; without one, the European day-first reading is tried before the
//! US month-first reading, and the first that validates wins.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::iso::{IsoDate, IsoDateTime, IsoTime};
use crate::locale;
use crate::options::DateOrder;

use super::{effective_date_order, wall_clock_to_epoch, ParseOptions};

const TIME_SUFFIX: &str = r"(?:[T ](\d{1,2}):(\d{2})(?::(\d{2}))?)?";

static YMD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^(\d{{4}})[-/.](\d{{1,2}})[-/.](\d{{1,2}}){TIME_SUFFIX}$"))
        .unwrap_or_else(|_| unreachable!())
});
static TWO_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^(\d{{1,2}})[-/.](\d{{1,2}})[-/.](\d{{4}}){TIME_SUFFIX}$"))
        .unwrap_or_else(|_| unreachable!())
});
static MONTH_NAME_FIRST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^(\p{{L}}+)\.? +(\d{{1,2}})(?:st|nd|rd|th)?,? +(\d{{4}}){TIME_SUFFIX}$"
    ))
    .unwrap_or_else(|_| unreachable!())
});
static DAY_FIRST_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^(\d{{1,2}})(?:st|nd|rd|th)?\.? +(\p{{L}}+)\.?,? +(\d{{4}}){TIME_SUFFIX}$"
    ))
    .unwrap_or_else(|_| unreachable!())
});
static COMPACT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})(\d{2})(\d{2})$").unwrap_or_else(|_| unreachable!()));

struct Candidate {
    year: i32,
    month: u8,
    day: u8,
    time: IsoTime,
}

impl Candidate {
    /// Round-trip validation: the constructed date must carry exactly
    /// the parsed components.
    fn into_epoch(self, utc: bool) -> Option<i64> {
        let date = IsoDate::new(self.year, self.month, self.day).ok()?;
        if (date.year, date.month, date.day) != (self.year, self.month, self.day) {
            return None;
        }
        Some(wall_clock_to_epoch(
            IsoDateTime::new_unchecked(date, self.time),
            utc,
        ))
    }
}

fn parse_time(captures: &regex::Captures<'_>, first_index: usize) -> Option<IsoTime> {
    let number = |index: usize| -> Option<u32> {
        captures.get(index).and_then(|m| m.as_str().parse().ok())
    };
    match captures.get(first_index) {
        None => Some(IsoTime::default()),
        Some(_) => {
            let hour = u8::try_from(number(first_index)?).ok()?;
            let minute = u8::try_from(number(first_index + 1)?).ok()?;
            let second = number(first_index + 2).map_or(Some(0), |s| u8::try_from(s).ok())?;
            IsoTime::new(hour, minute, second, 0).ok()
        }
    }
}

pub(super) fn parse(input: &str, options: &ParseOptions) -> Option<i64> {
    if let Some(captures) = YMD.captures(input) {
        let time = parse_time(&captures, 4)?;
        return Candidate {
            year: captures[1].parse().ok()?,
            month: captures[2].parse().ok()?,
            day: captures[3].parse().ok()?,
            time,
        }
        .into_epoch(options.utc);
    }

    if let Some(captures) = TWO_NUMBER.captures(input) {
        let first: u8 = captures[1].parse().ok()?;
        let second: u8 = captures[2].parse().ok()?;
        let year: i32 = captures[3].parse().ok()?;
        let time = parse_time(&captures, 4)?;
        // The hint orders preference; a reading the hint cannot satisfy
        // still falls through to the other interpretation.
        let orders: &[DateOrder] = match effective_date_order(options) {
            DateOrder::MonthFirst => &[DateOrder::MonthFirst, DateOrder::DayFirst],
            DateOrder::DayFirst => &[DateOrder::DayFirst, DateOrder::MonthFirst],
        };
        return orders.iter().find_map(|order| {
            let (month, day) = match order {
                DateOrder::DayFirst => (second, first),
                DateOrder::MonthFirst => (first, second),
            };
            Candidate {
                year,
                month,
                day,
                time,
            }
            .into_epoch(options.utc)
        });
    }

    for (pattern, name_index, day_index) in
        [(&MONTH_NAME_FIRST, 1, 2), (&DAY_FIRST_NAME, 2, 1)]
    {
        if let Some(captures) = pattern.captures(input) {
            let month = month_from_name(&captures[name_index])?;
            let time = parse_time(&captures, 4)?;
            return Candidate {
                year: captures[3].parse().ok()?,
                month,
                day: captures[day_index].parse().ok()?,
                time,
            }
            .into_epoch(options.utc);
        }
    }

    if let Some(captures) = COMPACT.captures(input) {
        return Candidate {
            year: captures[1].parse().ok()?,
            month: captures[2].parse().ok()?,
            day: captures[3].parse().ok()?,
            time: IsoTime::default(),
        }
        .into_epoch(options.utc);
    }

    None
}

/// Resolves a month name through the active locale, with an English
/// fallback so `kairos("March 5, 2024")` works under any active locale.
fn month_from_name(name: &str) -> Option<u8> {
    const ENGLISH: [&str; 12] = [
        "january",
        "february",
        "march",
        "april",
        "may",
        "june",
        "july",
        "august",
        "september",
        "october",
        "november",
        "december",
    ];
    if let Some(month) = locale::active_locale().month_from_name(name) {
        return Some(month);
    }
    let needle = name.to_lowercase();
    ENGLISH
        .iter()
        .position(|month| month.starts_with(&needle) && needle.len() >= 3)
        .map(|index| index as u8 + 1)
}

#[cfg(test)]
mod tests {
    use super::parse;
    use crate::options::DateOrder;
    use crate::parsers::ParseOptions;

    fn utc_options() -> ParseOptions {
        ParseOptions::utc()
    }

    fn with_order(order: DateOrder) -> ParseOptions {
        ParseOptions {
            utc: true,
            date_order: Some(order),
        }
    }

    #[test]
    fn separators_are_interchangeable() {
        let dash = parse("2024-6-15", &utc_options()).unwrap();
        assert_eq!(parse("2024/6/15", &utc_options()), Some(dash));
        assert_eq!(parse("2024.6.15", &utc_options()), Some(dash));
        assert_eq!(parse("20240615", &utc_options()), Some(dash));
    }

    #[test]
    fn rollover_is_rejected_by_round_trip() {
        assert_eq!(parse("30/02/2024", &with_order(DateOrder::DayFirst)), None);
        assert_eq!(parse("2024-02-30", &utc_options()), None);
        assert_eq!(parse("20230229", &utc_options()), None);
    }

    #[test]
    fn ambiguous_dates_follow_the_hint() {
        let day_first = parse("03-05-2024", &with_order(DateOrder::DayFirst)).unwrap();
        let month_first = parse("03-05-2024", &with_order(DateOrder::MonthFirst)).unwrap();
        // Day-first reads May 3; month-first reads March 5.
        assert_eq!(
            day_first,
            parse("2024-05-03", &utc_options()).unwrap()
        );
        assert_eq!(
            month_first,
            parse("2024-03-05", &utc_options()).unwrap()
        );
    }

    #[test]
    fn unambiguous_two_number_dates_resolve_under_either_hint() {
        // 25 can only be a day, so the month-first reading fails its
        // round-trip and the day-first reading wins.
        let expected = parse("2024-05-25", &utc_options()).unwrap();
        assert_eq!(
            parse("25/05/2024", &with_order(DateOrder::MonthFirst)),
            Some(expected)
        );
    }

    #[test]
    fn english_month_names_parse() {
        let expected = parse("2024-03-05", &utc_options()).unwrap();
        assert_eq!(parse("March 5, 2024", &utc_options()), Some(expected));
        assert_eq!(parse("Mar 5 2024", &utc_options()), Some(expected));
        assert_eq!(parse("5 March 2024", &utc_options()), Some(expected));
        assert_eq!(parse("March 5th, 2024", &utc_options()), Some(expected));
    }

    #[test]
    fn time_suffixes_attach() {
        let midnight = parse("2024-06-15", &utc_options()).unwrap();
        let afternoon = parse("2024-06-15 14:30", &utc_options()).unwrap();
        assert_eq!(afternoon - midnight, (14 * 60 + 30) * 60_000);
        let with_seconds = parse("15/06/2024 14:30:45", &with_order(DateOrder::DayFirst)).unwrap();
        assert_eq!(with_seconds - midnight, ((14 * 60 + 30) * 60 + 45) * 1_000);
    }

    #[test]
    fn nonsense_stays_unparsed() {
        assert_eq!(parse("month 5, 2024", &utc_options()), None);
        assert_eq!(parse("15//2024", &utc_options()), None);
    }
}
