//! The Unix epoch strategy.
//!
//! Purely numeric input is a timestamp. Magnitudes below 10^10 read as
//! seconds, anything at or above the boundary as milliseconds (so the
//! boundary itself belongs to the millisecond side). A candidate whose
//! calendar year falls outside [1970, 2100] is retried under the other
//! interpretation; only when both interpretations miss the window is
//! the input rejected. The window is a convention carried over for
//! plausibility filtering, not a hard model limit.

use num_traits::cast::FromPrimitive;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::utils::Epoch;
use crate::{EPOCH_MS_MAX, EPOCH_MS_MIN};

/// Seconds/milliseconds heuristic boundary.
const SECONDS_BOUNDARY: f64 = 1e10;
/// Plausibility window for timestamp years.
const YEAR_RANGE: core::ops::RangeInclusive<i32> = 1970..=2100;

static NUMERIC_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?\d+(?:\.\d+)?$")
        .unwrap_or_else(|_| unreachable!("the numeric pattern is statically valid"))
});

pub(super) fn parse(input: &str) -> Option<i64> {
    if !NUMERIC_PATTERN.is_match(input) {
        return None;
    }
    let value: f64 = input.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    let (primary, alternate) = if value.abs() < SECONDS_BOUNDARY {
        (value * 1000.0, value)
    } else {
        (value, value * 1000.0)
    };
    to_plausible_millis(primary).or_else(|| to_plausible_millis(alternate))
}

fn to_plausible_millis(candidate: f64) -> Option<i64> {
    let millis = i64::from_f64(candidate.round())?;
    if !(EPOCH_MS_MIN..=EPOCH_MS_MAX).contains(&millis) {
        return None;
    }
    let (year, _, _) = Epoch::new(millis).ymd();
    YEAR_RANGE.contains(&year).then_some(millis)
}
