//! The multi-strategy parser pipeline.
//!
//! Input runs through a strict strategy order — ISO-8601, RFC-2822,
//! Unix epoch, then the flexible pattern list — until one strategy
//! yields a valid instant. Parsing never fails loudly: when no strategy
//! accepts the input the result is the invalid instant and callers
//! check `is_valid()`.

use crate::{
    components::Instant,
    iso::IsoDateTime,
    locale,
    options::DateOrder,
    sys,
};

pub(crate) mod duration;
mod epoch;
mod flexible;
mod iso8601;
mod rfc2822;

/// Options threaded through the strategy chain.
#[derive(Debug, Default, Clone, Copy)]
pub struct ParseOptions {
    /// Interpret offset-less inputs as UTC wall-clock time and return a
    /// UTC-frame instant.
    pub utc: bool,
    /// Resolution order for ambiguous two-number dates; `None` defers to
    /// the active locale.
    pub date_order: Option<DateOrder>,
}

impl ParseOptions {
    /// The UTC-frame parse options.
    #[must_use]
    pub fn utc() -> Self {
        Self {
            utc: true,
            date_order: None,
        }
    }
}

/// Parses an input string through the strategy chain.
///
/// Returns the invalid instant when every strategy rejects the input.
#[must_use]
pub fn parse(input: &str, options: &ParseOptions) -> Instant {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Instant::invalid();
    }
    let millis = iso8601::parse(trimmed, options.utc)
        .or_else(|| rfc2822::parse(trimmed))
        .or_else(|| epoch::parse(trimmed))
        .or_else(|| flexible::parse(trimmed, options));
    match millis {
        Some(millis) => Instant::from_raw(millis, options.utc),
        None => Instant::invalid(),
    }
}

/// Converts wall-clock fields to an epoch value in the requested frame.
///
/// The local frame needs the offset at the target instant, which is not
/// known until the target is known; a second pass refines the first
/// guess with the offset observed there.
pub(crate) fn wall_clock_to_epoch(fields: IsoDateTime, utc: bool) -> i64 {
    if utc {
        return fields.epoch_millis(0);
    }
    let guess = fields.epoch_millis(sys::local_offset_minutes(fields.epoch_millis(0)));
    fields.epoch_millis(sys::local_offset_minutes(guess))
}

/// The active locale's date-order hint, unless the caller pinned one.
pub(crate) fn effective_date_order(options: &ParseOptions) -> DateOrder {
    options
        .date_order
        .unwrap_or_else(|| locale::active_locale().date_order)
}

#[cfg(test)]
mod tests {
    use super::{parse, ParseOptions};

    #[test]
    fn strategy_order_is_iso_first() {
        // `2024-06-15` matches both the ISO strategy and the flexible
        // Y-M-D pattern; ISO must win (identical result, but the parse
        // must not fall through to the looser grammar for, e.g.,
        // fractional seconds).
        let instant = parse("2024-06-15T14:30:00.123Z", &ParseOptions::utc());
        assert_eq!(instant.millisecond(), Some(123));
    }

    #[test]
    fn unparseable_input_is_invalid_not_an_error() {
        for garbage in ["definitely not a date", "2024-13-99", "....", "P1D"] {
            assert!(!parse(garbage, &ParseOptions::default()).is_valid(), "{garbage}");
        }
    }

    #[test]
    fn blank_input_is_invalid() {
        assert!(!parse("", &ParseOptions::default()).is_valid());
        assert!(!parse("   ", &ParseOptions::default()).is_valid());
    }
}
