//! This module implements `KairosError`.

use core::fmt;
use std::borrow::Cow;

/// `ErrorKind` maps to the failure categories a `KairosError` can carry.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A component was outside its natural range or an input was unparseable
    /// while strict validation was active.
    #[default]
    InvalidDate,
    /// A duration value was non-finite, over-bounds, or malformed.
    InvalidDuration,
    /// A configuration would produce a nonsensical or non-terminating
    /// computation (zero cache capacity, seven-day weekends, ...).
    InvalidConfiguration,
    /// A range chunk size was non-positive or non-integral.
    InvalidChunkSize,
    /// A duration was divided by zero or a non-finite value.
    DivisionByZero,
    /// A plugin named a dependency that is not registered.
    MissingDependency,
    /// The plugin dependency graph contains a cycle.
    CircularDependency,
    /// Relative holiday rules reference each other in a cycle.
    HolidayCycle,
    /// A bounded business-day search was exhausted.
    NoBusinessDayFound,
    /// A locale code has no registered data.
    UnknownLocale,
    /// An assertion error, this error should never occur.
    Assert,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDate => "InvalidDate",
            Self::InvalidDuration => "InvalidDuration",
            Self::InvalidConfiguration => "InvalidConfiguration",
            Self::InvalidChunkSize => "InvalidChunkSize",
            Self::DivisionByZero => "DivisionByZero",
            Self::MissingDependency => "MissingDependency",
            Self::CircularDependency => "CircularDependency",
            Self::HolidayCycle => "HolidayCycle",
            Self::NoBusinessDayFound => "NoBusinessDayFound",
            Self::UnknownLocale => "UnknownLocale",
            Self::Assert => "Assert",
        }
        .fmt(f)
    }
}

/// The error type for `kairos`.
///
/// Errors are built up from a kind plus an optional message:
///
/// ```
/// use kairos::error::{ErrorKind, KairosError};
///
/// let err = KairosError::configuration().with_message("capacity must be positive");
/// assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KairosError {
    kind: ErrorKind,
    msg: Cow<'static, str>,
}

impl KairosError {
    #[inline]
    #[must_use]
    const fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            msg: Cow::Borrowed(""),
        }
    }

    /// Creates an `InvalidDate` error.
    #[inline]
    #[must_use]
    pub const fn date() -> Self {
        Self::new(ErrorKind::InvalidDate)
    }

    /// Creates an `InvalidDuration` error.
    #[inline]
    #[must_use]
    pub const fn duration() -> Self {
        Self::new(ErrorKind::InvalidDuration)
    }

    /// Creates an `InvalidConfiguration` error.
    #[inline]
    #[must_use]
    pub const fn configuration() -> Self {
        Self::new(ErrorKind::InvalidConfiguration)
    }

    /// Creates an `InvalidChunkSize` error.
    #[inline]
    #[must_use]
    pub const fn chunk_size() -> Self {
        Self::new(ErrorKind::InvalidChunkSize)
    }

    /// Creates a `DivisionByZero` error.
    #[inline]
    #[must_use]
    pub const fn division_by_zero() -> Self {
        Self::new(ErrorKind::DivisionByZero)
    }

    /// Creates a `MissingDependency` error.
    #[inline]
    #[must_use]
    pub const fn missing_dependency() -> Self {
        Self::new(ErrorKind::MissingDependency)
    }

    /// Creates a `CircularDependency` error.
    #[inline]
    #[must_use]
    pub const fn circular_dependency() -> Self {
        Self::new(ErrorKind::CircularDependency)
    }

    /// Creates a `HolidayCycle` error.
    #[inline]
    #[must_use]
    pub const fn holiday_cycle() -> Self {
        Self::new(ErrorKind::HolidayCycle)
    }

    /// Creates a `NoBusinessDayFound` error.
    #[inline]
    #[must_use]
    pub const fn no_business_day() -> Self {
        Self::new(ErrorKind::NoBusinessDayFound)
    }

    /// Creates an `UnknownLocale` error.
    #[inline]
    #[must_use]
    pub const fn unknown_locale() -> Self {
        Self::new(ErrorKind::UnknownLocale)
    }

    /// Create an abrupt end error.
    #[inline]
    #[must_use]
    pub const fn assert() -> Self {
        Self::new(ErrorKind::Assert)
    }

    /// Attaches a message to the error.
    #[must_use]
    pub fn with_message<S>(mut self, msg: S) -> Self
    where
        S: Into<Cow<'static, str>>,
    {
        self.msg = msg.into();
        self
    }

    /// Returns this error's kind.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the attached message, which may be empty.
    #[inline]
    #[must_use]
    pub fn message(&self) -> &str {
        &self.msg
    }

    /// Consumes the error, returning the owned message.
    #[inline]
    #[must_use]
    pub fn into_message(self) -> Cow<'static, str> {
        self.msg
    }
}

impl fmt::Display for KairosError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if !self.msg.is_empty() {
            write!(f, ": {}", self.msg)?;
        }
        Ok(())
    }
}

impl std::error::Error for KairosError {}

#[cfg(test)]
mod tests {
    use super::{ErrorKind, KairosError};

    #[test]
    fn error_display_includes_kind_and_message() {
        let err = KairosError::configuration().with_message("cache capacity must be positive.");
        assert_eq!(
            err.to_string(),
            "InvalidConfiguration: cache capacity must be positive."
        );
        assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
    }

    #[test]
    fn bare_error_displays_kind_only() {
        assert_eq!(KairosError::holiday_cycle().to_string(), "HolidayCycle");
    }
}
