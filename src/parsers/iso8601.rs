//! The ISO-8601 strategy.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::iso::{IsoDate, IsoDateTime, IsoTime};

use super::wall_clock_to_epoch;

static ISO_PATTERN: Lazy<Regex> = Lazy::new(|| {
    // Date, optional time, optional fraction (1-3 digits), optional zone.
    Regex::new(
        r"(?x)^
        (\d{4})-(\d{2})-(\d{2})
        (?:
            [T\ ]
            (\d{2}):(\d{2})
            (?: :(\d{2}) (?:\.(\d{1,3}))? )?
            \s*
            (Z|z|[+-]\d{2}:?\d{2})?
        )?
        $",
    )
    .unwrap_or_else(|_| unreachable!("the ISO pattern is statically valid"))
});

/// Parses an anchored ISO-8601 date or date-time.
///
/// Every numeric sub-match must parse cleanly; any failure rejects the
/// whole candidate rather than propagating a bogus component. A `Z`
/// suffix pins UTC; `±hh:mm` applies with correct sign, including
/// offsets with a zero hour such as `-00:30`.
pub(super) fn parse(input: &str, assume_utc: bool) -> Option<i64> {
    let captures = ISO_PATTERN.captures(input)?;
    let number = |index: usize| -> Option<u32> { captures.get(index)?.as_str().parse().ok() };

    let year = i32::try_from(number(1)?).ok()?;
    let month = u8::try_from(number(2)?).ok()?;
    let day = u8::try_from(number(3)?).ok()?;
    let date = IsoDate::new(year, month, day).ok()?;

    let time = if captures.get(4).is_some() {
        let hour = u8::try_from(number(4)?).ok()?;
        let minute = u8::try_from(number(5)?).ok()?;
        let second = number(6).map_or(Some(0), |s| u8::try_from(s).ok())?;
        let millisecond = match captures.get(7) {
            // Right-pad to milliseconds: `.5` is 500 ms.
            Some(fraction) => format!("{:0<3}", fraction.as_str()).parse().ok()?,
            None => 0,
        };
        IsoTime::new(hour, minute, second, millisecond).ok()?
    } else {
        IsoTime::default()
    };

    let fields = IsoDateTime::new_unchecked(date, time);
    match captures.get(8).map(|zone| zone.as_str()) {
        Some("Z" | "z") => Some(fields.epoch_millis(0)),
        Some(offset) => {
            let minutes = parse_offset_minutes(offset)?;
            Some(fields.epoch_millis(minutes))
        }
        None => Some(wall_clock_to_epoch(fields, assume_utc)),
    }
}

/// Parses `±hh:mm` or `±hhmm` into signed minutes east of UTC.
///
/// The sign applies to the whole offset, so `-00:30` is minus thirty
/// minutes, not plus.
fn parse_offset_minutes(offset: &str) -> Option<i32> {
    let (sign, digits) = match offset.as_bytes().first()? {
        b'+' => (1, &offset[1..]),
        b'-' => (-1, &offset[1..]),
        _ => return None,
    };
    let digits = digits.replace(':', "");
    if digits.len() != 4 {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(sign * (hours * 60 + minutes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offset_millis(minutes: i32) -> i64 {
        i64::from(minutes) * crate::MS_PER_MINUTE
    }

    #[test]
    fn date_only_is_utc_midnight_in_utc_mode() {
        let millis = parse("2024-06-15", true).unwrap();
        assert_eq!(millis, 1_718_409_600_000);
    }

    #[test]
    fn full_datetime_with_zulu() {
        let millis = parse("2024-06-15T14:30:00Z", true).unwrap();
        assert_eq!(millis, 1_718_461_800_000);
        // A space separator and lowercase z are accepted.
        assert_eq!(parse("2024-06-15 14:30:00z", true), Some(millis));
    }

    #[test]
    fn fractional_seconds_right_pad() {
        let base = parse("2024-06-15T14:30:00Z", true).unwrap();
        assert_eq!(parse("2024-06-15T14:30:00.5Z", true), Some(base + 500));
        assert_eq!(parse("2024-06-15T14:30:00.05Z", true), Some(base + 50));
        assert_eq!(parse("2024-06-15T14:30:00.123Z", true), Some(base + 123));
        assert_eq!(parse("2024-06-15T14:30:00.1234Z", true), None);
    }

    #[test]
    fn positive_and_negative_offsets() {
        let utc = parse("2024-06-15T18:30:00Z", true).unwrap();
        assert_eq!(parse("2024-06-15T14:30:00-04:00", true), Some(utc));
        assert_eq!(parse("2024-06-15T14:30:00-0400", true), Some(utc));
        let plus = parse("2024-06-15T14:30:00+04:00", true).unwrap();
        assert_eq!(utc - plus, offset_millis(8 * 60));
    }

    #[test]
    fn zero_hour_offsets_keep_their_sign() {
        // -00:30 and +00:30 are an hour apart.
        let minus = parse("2024-06-15T12:00:00-00:30", true).unwrap();
        let plus = parse("2024-06-15T12:00:00+00:30", true).unwrap();
        assert_eq!(minus - plus, offset_millis(60));
    }

    #[test]
    fn component_rollover_is_rejected() {
        assert_eq!(parse("2024-02-30", true), None);
        assert_eq!(parse("2023-02-29", true), None);
        assert_eq!(parse("2024-06-15T24:00:00Z", true), None);
        assert_eq!(parse("2024-06-15T14:60:00Z", true), None);
        assert_eq!(parse("2024-00-10", true), None);
    }

    #[test]
    fn leap_day_parses_in_leap_years() {
        assert!(parse("2024-02-29", true).is_some());
    }

    #[test]
    fn anchoring_rejects_trailing_garbage() {
        assert_eq!(parse("2024-06-15T14:30:00Z extra", true), None);
        assert_eq!(parse("x2024-06-15", true), None);
    }
}
