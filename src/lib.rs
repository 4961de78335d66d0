//! Kairos is a date and time computation library: an immutable instant
//! engine with multi-strategy parsing, token-driven formatting,
//! duration algebra, date ranges, a rule-based holiday engine, and
//! business-day arithmetic, all in-process with no I/O.
//!
//! The quickest route in is the module-level entry points, which share
//! one default [`Kairos`] context:
//!
//! ```
//! let instant = kairos::parse_utc("2024-06-15T14:30:00Z");
//! assert!(instant.is_valid());
//! assert_eq!(instant.format("YYYY-MM-DD"), "2024-06-15");
//!
//! let duration: kairos::Duration = "P1Y2M3DT4H5M6S".parse().unwrap();
//! assert_eq!(duration.to_iso_string(), "P1Y2M3DT4H5M6S");
//! ```
//!
//! Everything is value-typed: parsing yields an [`Instant`] that is
//! either valid or the propagating invalid instant (never a panic), and
//! every mutator returns a new value.
#![cfg_attr(not(test), forbid(clippy::unwrap_used))]
#![allow(
    clippy::module_name_repetitions,
    clippy::too_many_lines,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_possible_wrap
)]

pub mod business;
pub mod cache;
pub mod context;
pub mod error;
pub mod fmt;
pub mod holiday;
pub mod iso;
pub mod locale;
pub mod options;
pub mod parsers;
pub mod plugin;
pub mod relative;
pub mod sys;

pub(crate) mod components;
pub(crate) mod utils;

use once_cell::sync::Lazy;

#[doc(inline)]
pub use components::{
    DateTimeComponents, Duration, DurationComponents, Instant, Range, RangeIter,
};
#[doc(inline)]
pub use context::{Kairos, KairosConfig};
#[doc(inline)]
pub use error::KairosError;
#[doc(inline)]
pub use options::{DateOrder, Unit};
#[doc(inline)]
pub use parsers::ParseOptions;

/// The `kairos` result type.
pub type KairosResult<T> = Result<T, KairosError>;

// Relevant numeric constants
/// Milliseconds per second constant.
pub const MS_PER_SECOND: i64 = 1000;
/// Milliseconds per minute constant.
pub const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
/// Milliseconds per hour constant.
pub const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
/// Milliseconds per day constant: 8.64e+7.
pub const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;
/// Milliseconds per week constant.
pub const MS_PER_WEEK: i64 = 7 * MS_PER_DAY;
/// Milliseconds per *average* month (30.44 days). An approximation for
/// duration conversion, never for calendar arithmetic.
pub const MS_PER_MONTH: i64 = 2_629_746_000;
/// Milliseconds per *average* year (365.25 days). An approximation for
/// duration conversion, never for calendar arithmetic.
pub const MS_PER_YEAR: i64 = 31_557_600_000;

/// Smallest representable epoch millisecond (0001-01-01T00:00:00Z).
pub const EPOCH_MS_MIN: i64 = -62_135_596_800_000;
/// Largest representable epoch millisecond (9999-12-31T23:59:59.999Z).
pub const EPOCH_MS_MAX: i64 = 253_402_300_799_999;

static DEFAULT_CONTEXT: Lazy<Kairos> = Lazy::new(Kairos::new);

/// The process-wide default context backing the entry points below.
#[must_use]
pub fn default_context() -> &'static Kairos {
    &DEFAULT_CONTEXT
}

/// The current time in the host-local frame.
#[must_use]
pub fn now() -> Instant {
    default_context().now()
}

/// The current time in the UTC frame; never invalid.
#[must_use]
pub fn utc_now() -> Instant {
    default_context().utc_now()
}

/// Parses input in the host-local frame. Unparseable input yields the
/// invalid instant; check [`Instant::is_valid`].
#[must_use]
pub fn parse(input: &str) -> Instant {
    default_context().parse(input)
}

/// Parses input in the UTC frame.
#[must_use]
pub fn parse_utc(input: &str) -> Instant {
    default_context().parse_utc(input)
}

/// An instant from Unix epoch seconds.
#[must_use]
pub fn unix(seconds: f64) -> Instant {
    default_context().unix(seconds)
}

/// A duration from integer milliseconds.
pub fn duration(millis: i64) -> KairosResult<Duration> {
    Duration::from_millis(millis)
}

/// A duration from an ISO-8601 string.
pub fn duration_iso(input: &str) -> KairosResult<Duration> {
    Duration::from_iso(input)
}

/// A day-stepped range between two instants.
pub fn range(start: Instant, end: Instant) -> KairosResult<Range> {
    default_context().range(start, end)
}

/// Switches the process-wide active locale.
pub fn locale(code: &str) -> KairosResult<()> {
    default_context().locale(code)
}

/// Installs a plugin into the default context.
pub fn use_plugin(plugin: plugin::Plugin) -> KairosResult<()> {
    default_context().use_plugin(plugin)
}

/// Installs a batch of plugins into the default context.
pub fn use_plugins(plugins: Vec<plugin::Plugin>) -> KairosResult<()> {
    default_context().use_plugins(plugins)
}
