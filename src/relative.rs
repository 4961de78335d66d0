//! Relative time: threshold-table humanization and calendar phrases.

use crate::{
    components::Instant,
    fmt::Formatter,
    locale::{Locale, RelativeSlot},
    options::Unit,
    sys,
};

/// Average days per month / year used by the banding, matching the
/// duration approximation constants.
const DAYS_PER_MONTH: f64 = 30.44;
const DAYS_PER_YEAR: f64 = 365.25;

/// Humanizes a signed millisecond span through the locale's threshold
/// table. With `with_suffix` the phrase is wrapped in the future/past
/// template based on the sign.
#[must_use]
pub fn humanize_millis(diff_millis: i64, locale: &Locale, with_suffix: bool) -> String {
    let phrase = band_phrase(diff_millis.unsigned_abs(), locale);
    if !with_suffix {
        return phrase;
    }
    let template = if diff_millis >= 0 {
        &locale.relative.future
    } else {
        &locale.relative.past
    };
    template.replace("%s", &phrase)
}

fn band_phrase(magnitude_millis: u64, locale: &Locale) -> String {
    let thresholds = &locale.thresholds;
    let phrases = &locale.relative;
    let millis = magnitude_millis as f64;
    let seconds = (millis / 1000.0).round() as i64;
    let minutes = (millis / 60_000.0).round() as i64;
    let hours = (millis / 3_600_000.0).round() as i64;
    let days = (millis / 86_400_000.0).round() as i64;
    let months = (days as f64 / DAYS_PER_MONTH).round() as i64;
    let years = (days as f64 / DAYS_PER_YEAR).round() as i64;

    if seconds <= thresholds.few_seconds {
        phrases.few_seconds.clone()
    } else if seconds <= thresholds.minute {
        phrases.minute.clone()
    } else if minutes <= thresholds.minutes {
        counted(locale, RelativeSlot::Minutes, minutes.max(2), &phrases.minutes)
    } else if hours <= 1 {
        phrases.hour.clone()
    } else if hours <= thresholds.hours {
        counted(locale, RelativeSlot::Hours, hours, &phrases.hours)
    } else if hours <= thresholds.day {
        phrases.day.clone()
    } else if days <= 1 {
        phrases.day.clone()
    } else if days <= thresholds.days {
        counted(locale, RelativeSlot::Days, days, &phrases.days)
    } else if months <= 1 {
        phrases.month.clone()
    } else if months <= thresholds.months {
        counted(locale, RelativeSlot::Months, months, &phrases.months)
    } else if years <= 1 {
        phrases.year.clone()
    } else {
        counted(locale, RelativeSlot::Years, years, &phrases.years)
    }
}

fn counted(locale: &Locale, slot: RelativeSlot, count: i64, template: &str) -> String {
    if let Some(hook) = locale.relative_count {
        return hook(slot, count);
    }
    template.replace("%d", &count.to_string())
}

/// Humanizes the span from `reference` to `target`.
#[must_use]
pub fn from(target: &Instant, reference: &Instant, locale: &Locale, with_suffix: bool) -> String {
    match (target.epoch_millis(), reference.epoch_millis()) {
        (Some(target_millis), Some(reference_millis)) => {
            humanize_millis(target_millis - reference_millis, locale, with_suffix)
        }
        _ => String::from("Invalid Date"),
    }
}

/// Humanizes the span from the current wall-clock time to `target`.
#[must_use]
pub fn from_now(target: &Instant, locale: &Locale, with_suffix: bool) -> String {
    let now = Instant::from_epoch_millis(sys::now_millis());
    from(target, &now, locale, with_suffix)
}

/// Formats the locale's calendar-window phrase for `target` relative to
/// `reference`: named phrases inside the ±2-day window, weekday phrases
/// inside the week window, the locale's `L` shortcut beyond it.
#[must_use]
pub fn calendar(
    target: &Instant,
    reference: &Instant,
    formatter: &Formatter,
    locale: &Locale,
) -> String {
    if !target.is_valid() || !reference.is_valid() {
        return String::from("Invalid Date");
    }
    let Some(day_diff) = target
        .start_of(Unit::Day)
        .diff(&reference.start_of(Unit::Day), Unit::Day)
    else {
        return String::from("Invalid Date");
    };
    let phrases = &locale.calendar;
    let template = match day_diff {
        0 => &phrases.same_day,
        1 => &phrases.next_day,
        -1 => &phrases.last_day,
        2 => phrases.day_after_tomorrow.as_ref().unwrap_or(&phrases.next_week),
        -2 => phrases
            .day_before_yesterday
            .as_ref()
            .unwrap_or(&phrases.last_week),
        3..=6 => &phrases.next_week,
        -6..=-3 => &phrases.last_week,
        _ => &phrases.same_else,
    };
    formatter.format(target, template, locale)
}

#[cfg(test)]
mod tests {
    use super::{calendar, from, humanize_millis};
    use crate::components::instant::DateTimeComponents;
    use crate::components::Instant;
    use crate::fmt::Formatter;
    use crate::locale;
    use crate::MS_PER_DAY;

    fn en() -> std::sync::Arc<locale::Locale> {
        locale::get("en-US").unwrap()
    }

    fn utc(year: i32, month: u8, day: u8, hour: u8) -> Instant {
        Instant::from_components(
            &DateTimeComponents {
                year,
                month,
                day,
                hour,
                ..DateTimeComponents::default()
            },
            true,
        )
        .unwrap()
    }

    #[test]
    fn threshold_bands() {
        let en = en();
        let cases: &[(i64, &str)] = &[
            (30_000, "a few seconds"),
            (44_000, "a few seconds"),
            (45_000, "a minute"),
            (89_000, "a minute"),
            (90_000, "2 minutes"),
            (44 * 60_000, "44 minutes"),
            (45 * 60_000, "an hour"),
            (89 * 60_000, "an hour"),
            (90 * 60_000, "2 hours"),
            (21 * 3_600_000, "21 hours"),
            (22 * 3_600_000, "a day"),
            (25 * 3_600_000, "a day"),
            (26 * 3_600_000, "a day"),
            (3 * MS_PER_DAY, "3 days"),
            (25 * MS_PER_DAY, "25 days"),
            (35 * MS_PER_DAY, "a month"),
            (100 * MS_PER_DAY, "3 months"),
            (300 * MS_PER_DAY, "10 months"),
            (350 * MS_PER_DAY, "a year"),
            (800 * MS_PER_DAY, "2 years"),
        ];
        for &(millis, expected) in cases {
            assert_eq!(humanize_millis(millis, &en, false), expected, "{millis}");
        }
    }

    #[test]
    fn suffix_wraps_by_sign() {
        let en = en();
        assert_eq!(humanize_millis(120_000, &en, true), "in 2 minutes");
        assert_eq!(humanize_millis(-120_000, &en, true), "2 minutes ago");
        let de = locale::get("de-DE").unwrap();
        assert_eq!(humanize_millis(-3_600_000, &de, true), "vor einer Stunde");
        assert_eq!(humanize_millis(3_600_000, &de, true), "in einer Stunde");
    }

    #[test]
    fn russian_plurals_flow_through() {
        let ru = locale::get("ru-RU").unwrap();
        assert_eq!(humanize_millis(5 * 60_000, &ru, true), "через 5 минут");
        assert_eq!(humanize_millis(-3 * 60_000, &ru, false), "3 минуты");
        assert_eq!(humanize_millis(21 * 60_000, &ru, false), "21 минуту");
    }

    #[test]
    fn from_handles_invalid_operands() {
        let en = en();
        let valid = utc(2024, 6, 15, 12);
        assert_eq!(from(&Instant::invalid(), &valid, &en, true), "Invalid Date");
    }

    #[test]
    fn calendar_windows() {
        let en = en();
        let formatter = Formatter::new();
        let reference = utc(2024, 6, 15, 12);
        let cases: &[(Instant, &str)] = &[
            (utc(2024, 6, 15, 9), "Today at 9:00 AM"),
            (utc(2024, 6, 16, 9), "Tomorrow at 9:00 AM"),
            (utc(2024, 6, 14, 22), "Yesterday at 10:00 PM"),
            (utc(2024, 6, 18, 9), "Tuesday at 9:00 AM"),
            (utc(2024, 6, 12, 9), "Last Wednesday at 9:00 AM"),
            (utc(2024, 6, 30, 9), "06/30/2024"),
            (utc(2024, 5, 1, 9), "05/01/2024"),
        ];
        for (target, expected) in cases {
            assert_eq!(calendar(target, &reference, &formatter, &en), *expected);
        }
    }

    #[test]
    fn calendar_two_day_phrases_when_the_locale_has_them() {
        let de = locale::get("de-DE").unwrap();
        let formatter = Formatter::new();
        let reference = utc(2024, 6, 15, 12);
        assert_eq!(
            calendar(&utc(2024, 6, 17, 9), &reference, &formatter, &de),
            "übermorgen um 09:00 Uhr"
        );
        assert_eq!(
            calendar(&utc(2024, 6, 13, 9), &reference, &formatter, &de),
            "vorgestern um 09:00 Uhr"
        );
    }
}
