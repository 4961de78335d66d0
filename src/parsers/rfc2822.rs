//! The RFC-2822 strategy: `[Day, ]DD Mon YYYY HH:MM[:SS] (zone)`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::iso::{IsoDate, IsoDateTime, IsoTime};

static RFC_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?xi)^
        (?: (?:Mon|Tue|Wed|Thu|Fri|Sat|Sun) \s* , \s* )?
        (\d{1,2}) \s+
        (Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec) \s+
        (\d{4}) \s+
        (\d{2}) : (\d{2}) (?: : (\d{2}) )?
        (?: \s+ (GMT|UT|UTC|[+-]\d{4}) )?
        $",
    )
    .unwrap_or_else(|_| unreachable!("the RFC-2822 pattern is statically valid"))
});

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Parses an RFC-2822 date-time. The month-name lookup is
/// case-insensitive; a missing zone reads as GMT.
pub(super) fn parse(input: &str) -> Option<i64> {
    let captures = RFC_PATTERN.captures(input)?;
    let number = |index: usize| -> Option<u32> { captures.get(index)?.as_str().parse().ok() };

    let day = u8::try_from(number(1)?).ok()?;
    let month_name = captures.get(2)?.as_str().to_ascii_lowercase();
    let month = MONTHS
        .iter()
        .position(|name| *name == month_name)
        .map(|index| index as u8 + 1)?;
    let year = i32::try_from(number(3)?).ok()?;
    let date = IsoDate::new(year, month, day).ok()?;

    let hour = u8::try_from(number(4)?).ok()?;
    let minute = u8::try_from(number(5)?).ok()?;
    let second = number(6).map_or(Some(0), |s| u8::try_from(s).ok())?;
    let time = IsoTime::new(hour, minute, second, 0).ok()?;

    let offset_minutes = match captures.get(7).map(|zone| zone.as_str()) {
        None => 0,
        Some(zone) if zone.eq_ignore_ascii_case("GMT") => 0,
        Some(zone) if zone.eq_ignore_ascii_case("UT") || zone.eq_ignore_ascii_case("UTC") => 0,
        Some(zone) => {
            let sign = if zone.starts_with('-') { -1 } else { 1 };
            let hours: i32 = zone[1..3].parse().ok()?;
            let minutes: i32 = zone[3..5].parse().ok()?;
            if hours > 23 || minutes > 59 {
                return None;
            }
            sign * (hours * 60 + minutes)
        }
    };

    Some(IsoDateTime::new_unchecked(date, time).epoch_millis(offset_minutes))
}

#[cfg(test)]
mod tests {
    use super::parse;

    #[test]
    fn full_rfc_form() {
        // 2024-06-15T14:30:00Z
        assert_eq!(parse("Sat, 15 Jun 2024 14:30:00 GMT"), Some(1_718_461_800_000));
    }

    #[test]
    fn day_name_is_optional_and_zone_defaults_to_gmt() {
        assert_eq!(parse("15 Jun 2024 14:30:00"), Some(1_718_461_800_000));
    }

    #[test]
    fn month_names_are_case_insensitive() {
        assert_eq!(
            parse("15 JUN 2024 14:30:00 GMT"),
            parse("15 jun 2024 14:30:00 gmt")
        );
        assert!(parse("15 Jun 2024 14:30:00 GMT").is_some());
    }

    #[test]
    fn numeric_zones_apply() {
        let utc = parse("15 Jun 2024 18:30:00 GMT").unwrap();
        assert_eq!(parse("15 Jun 2024 14:30:00 -0400"), Some(utc));
        assert_eq!(parse("15 Jun 2024 23:30:00 +0500"), Some(utc));
    }

    #[test]
    fn invalid_dates_are_rejected() {
        assert_eq!(parse("30 Feb 2024 00:00:00 GMT"), None);
        assert_eq!(parse("15 Foo 2024 00:00:00 GMT"), None);
        assert_eq!(parse("15 Jun 2024 25:00:00 GMT"), None);
    }
}
