//! Holiday rule definitions.
//!
//! A rule is a set of shared fields plus a [`RuleKind`] variant carrying
//! exactly the payload its calculation needs. The JSON schema the engine
//! accepts mirrors the variants through a `type` tag; every field is
//! validated at registration, not at calculation time.

use core::fmt;
use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;

use crate::{error::KairosError, iso::IsoDate, KairosResult};

/// The lunar calendar a [`RuleKind::Lunar`] rule is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LunarCalendarKind {
    Islamic,
    Chinese,
    Hebrew,
    Persian,
}

impl LunarCalendarKind {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Islamic => "islamic",
            Self::Chinese => "chinese",
            Self::Hebrew => "hebrew",
            Self::Persian => "persian",
        }
    }
}

/// How an observed date is searched for when the original falls on a
/// weekend.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftDirection {
    #[default]
    Forward,
    Backward,
    Nearest,
}

/// The observed-substitution policy attached to a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedRule {
    pub kind: ObservedKind,
    /// Weekend days, `0` being Sunday. Defaults to `{0, 6}`.
    pub weekends: BTreeSet<u8>,
    pub direction: ShiftDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservedKind {
    Substitute,
    Bridge,
    NearestWeekday,
}

impl ObservedRule {
    fn default_weekends() -> BTreeSet<u8> {
        BTreeSet::from([0, 6])
    }

    /// A substitute policy shifting in the given direction.
    #[must_use]
    pub fn substitute(direction: ShiftDirection) -> Self {
        Self {
            kind: ObservedKind::Substitute,
            weekends: Self::default_weekends(),
            direction,
        }
    }

    /// The nearest-weekday policy used by most US federal holidays.
    #[must_use]
    pub fn nearest_weekday() -> Self {
        Self {
            kind: ObservedKind::NearestWeekday,
            weekends: Self::default_weekends(),
            direction: ShiftDirection::Nearest,
        }
    }

    /// A bridge policy shifting in the given direction.
    #[must_use]
    pub fn bridge(direction: ShiftDirection) -> Self {
        Self {
            kind: ObservedKind::Bridge,
            weekends: Self::default_weekends(),
            direction,
        }
    }

    /// Replaces the weekend set.
    #[must_use]
    pub fn with_weekends<I: IntoIterator<Item = u8>>(mut self, weekends: I) -> Self {
        self.weekends = weekends.into_iter().collect();
        self
    }

    /// The direction the search actually walks; a nearest-weekday policy
    /// always searches outward from the original date.
    pub(crate) fn effective_direction(&self) -> ShiftDirection {
        match self.kind {
            ObservedKind::NearestWeekday => ShiftDirection::Nearest,
            _ => self.direction,
        }
    }

    fn validate(&self) -> KairosResult<()> {
        if self.weekends.iter().any(|&day| day > 6) {
            return Err(
                KairosError::configuration().with_message("weekend days must be in 0..=6.")
            );
        }
        // A seven-day weekend has no representable substitute; reject at
        // registration rather than exhausting the bounded search.
        if self.weekends.len() >= 7 {
            return Err(KairosError::configuration()
                .with_message("observed rule weekends cannot cover all seven days."));
        }
        Ok(())
    }
}

/// A user-supplied calculation for [`RuleKind::Custom`].
pub type CustomCalculation = Arc<dyn Fn(i32) -> Vec<IsoDate> + Send + Sync>;

/// The tagged calculation variants.
#[derive(Clone)]
pub enum RuleKind {
    /// A fixed month/day every year, skipped in years where the date
    /// does not exist (February 29).
    Fixed { month: u8, day: u8 },
    /// The nth occurrence of a weekday in a month; `nth == -1` counts
    /// from the end.
    NthWeekday { month: u8, weekday: u8, nth: i8 },
    /// A date at a fixed day offset from another rule's computed date.
    Relative {
        relative_to: String,
        offset_days: i32,
    },
    /// A date in a non-Gregorian lunar calendar, resolved through the
    /// lunar collaborator.
    Lunar {
        calendar: LunarCalendarKind,
        month: u8,
        day: u8,
    },
    /// A day offset from Easter Sunday (Gaussian computus).
    EasterBased { offset_days: i32 },
    /// An opaque user calculation.
    Custom { calculate: CustomCalculation },
}

impl fmt::Debug for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed { month, day } => f
                .debug_struct("Fixed")
                .field("month", month)
                .field("day", day)
                .finish(),
            Self::NthWeekday {
                month,
                weekday,
                nth,
            } => f
                .debug_struct("NthWeekday")
                .field("month", month)
                .field("weekday", weekday)
                .field("nth", nth)
                .finish(),
            Self::Relative {
                relative_to,
                offset_days,
            } => f
                .debug_struct("Relative")
                .field("relative_to", relative_to)
                .field("offset_days", offset_days)
                .finish(),
            Self::Lunar {
                calendar,
                month,
                day,
            } => f
                .debug_struct("Lunar")
                .field("calendar", calendar)
                .field("month", month)
                .field("day", day)
                .finish(),
            Self::EasterBased { offset_days } => f
                .debug_struct("EasterBased")
                .field("offset_days", offset_days)
                .finish(),
            Self::Custom { .. } => f.debug_struct("Custom").finish_non_exhaustive(),
        }
    }
}

/// A holiday rule: shared metadata plus its calculation variant.
#[derive(Debug, Clone)]
pub struct HolidayRule {
    pub name: String,
    pub id: Option<String>,
    /// Number of consecutive days the holiday spans, at least 1.
    pub duration_days: u16,
    /// Regions the rule applies to; `None` applies everywhere.
    pub regions: Option<BTreeSet<String>>,
    pub active: bool,
    pub observed: Option<ObservedRule>,
    pub kind: RuleKind,
}

// ==== Construction helpers ====

impl HolidayRule {
    fn base(name: impl Into<String>, kind: RuleKind) -> Self {
        Self {
            name: name.into(),
            id: None,
            duration_days: 1,
            regions: None,
            active: true,
            observed: None,
            kind,
        }
    }

    #[must_use]
    pub fn fixed(name: impl Into<String>, month: u8, day: u8) -> Self {
        Self::base(name, RuleKind::Fixed { month, day })
    }

    #[must_use]
    pub fn nth_weekday(name: impl Into<String>, month: u8, weekday: u8, nth: i8) -> Self {
        Self::base(
            name,
            RuleKind::NthWeekday {
                month,
                weekday,
                nth,
            },
        )
    }

    #[must_use]
    pub fn relative(
        name: impl Into<String>,
        relative_to: impl Into<String>,
        offset_days: i32,
    ) -> Self {
        Self::base(
            name,
            RuleKind::Relative {
                relative_to: relative_to.into(),
                offset_days,
            },
        )
    }

    #[must_use]
    pub fn lunar(
        name: impl Into<String>,
        calendar: LunarCalendarKind,
        month: u8,
        day: u8,
    ) -> Self {
        Self::base(
            name,
            RuleKind::Lunar {
                calendar,
                month,
                day,
            },
        )
    }

    #[must_use]
    pub fn easter_based(name: impl Into<String>, offset_days: i32) -> Self {
        Self::base(name, RuleKind::EasterBased { offset_days })
    }

    #[must_use]
    pub fn custom(
        name: impl Into<String>,
        calculate: impl Fn(i32) -> Vec<IsoDate> + Send + Sync + 'static,
    ) -> Self {
        Self::base(
            name,
            RuleKind::Custom {
                calculate: Arc::new(calculate),
            },
        )
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_duration_days(mut self, days: u16) -> Self {
        self.duration_days = days;
        self
    }

    #[must_use]
    pub fn with_regions<I, S>(mut self, regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.regions = Some(
            regions
                .into_iter()
                .map(|region| region.into().to_ascii_lowercase())
                .collect(),
        );
        self
    }

    #[must_use]
    pub fn with_observed(mut self, observed: ObservedRule) -> Self {
        self.observed = Some(observed);
        self
    }

    #[must_use]
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

// ==== Identity, hashing, validation ====

impl HolidayRule {
    /// The key other rules reference this rule by: its id when present,
    /// its name otherwise.
    #[must_use]
    pub fn key(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.name)
    }

    /// The variant tag as used in the JSON schema.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self.kind {
            RuleKind::Fixed { .. } => "fixed",
            RuleKind::NthWeekday { .. } => "nth_weekday",
            RuleKind::Relative { .. } => "relative",
            RuleKind::Lunar { .. } => "lunar",
            RuleKind::EasterBased { .. } => "easter_based",
            RuleKind::Custom { .. } => "custom",
        }
    }

    /// The stable cache identity: tag plus the canonical JSON of the
    /// rule body, keys in lexicographic order. Semantically equal bodies
    /// hash byte-identically regardless of construction order.
    ///
    /// A custom rule's body is an opaque function, so its identity falls
    /// back to the id/name pair.
    #[must_use]
    pub fn stable_hash(&self) -> String {
        let body = match &self.kind {
            RuleKind::Fixed { month, day } => json!({ "day": day, "month": month }),
            RuleKind::NthWeekday {
                month,
                weekday,
                nth,
            } => json!({ "month": month, "nth": nth, "weekday": weekday }),
            RuleKind::Relative {
                relative_to,
                offset_days,
            } => json!({ "offset_days": offset_days, "relative_to": relative_to }),
            RuleKind::Lunar {
                calendar,
                month,
                day,
            } => json!({ "calendar": calendar.as_str(), "day": day, "month": month }),
            RuleKind::EasterBased { offset_days } => json!({ "offset_days": offset_days }),
            RuleKind::Custom { .. } => json!({ "id": self.id, "name": self.name }),
        };
        format!("{}||{}", self.tag(), body)
    }

    /// Validates every field; called at registration.
    pub fn validate(&self) -> KairosResult<()> {
        if self.name.is_empty() {
            return Err(KairosError::configuration().with_message("rule name cannot be empty."));
        }
        if self.duration_days < 1 {
            return Err(
                KairosError::configuration().with_message("duration_days must be at least 1.")
            );
        }
        match &self.kind {
            RuleKind::Fixed { month, day } => {
                validate_month_day(*month, *day)?;
            }
            RuleKind::NthWeekday {
                month,
                weekday,
                nth,
            } => {
                if !(1..=12).contains(month) {
                    return Err(KairosError::configuration()
                        .with_message("nth-weekday month must be in 1..=12."));
                }
                if *weekday > 6 {
                    return Err(KairosError::configuration()
                        .with_message("nth-weekday weekday must be in 0..=6."));
                }
                if *nth != -1 && !(1..=5).contains(nth) {
                    return Err(KairosError::configuration()
                        .with_message("nth must be -1 or in 1..=5."));
                }
            }
            RuleKind::Relative { relative_to, .. } => {
                if relative_to.is_empty() {
                    return Err(KairosError::configuration()
                        .with_message("relative rule requires a target name or id."));
                }
            }
            RuleKind::Lunar { month, day, .. } => {
                validate_month_day(*month, *day)?;
            }
            RuleKind::EasterBased { .. } | RuleKind::Custom { .. } => {}
        }
        if let Some(observed) = &self.observed {
            observed.validate()?;
        }
        Ok(())
    }
}

fn validate_month_day(month: u8, day: u8) -> KairosResult<()> {
    if !(1..=12).contains(&month) {
        return Err(KairosError::configuration().with_message("month must be in 1..=12."));
    }
    if !(1..=31).contains(&day) {
        return Err(KairosError::configuration().with_message("day must be in 1..=31."));
    }
    Ok(())
}

// ==== JSON schema ====

#[derive(Deserialize)]
struct RawObservedRule {
    #[serde(rename = "type")]
    kind: ObservedKind,
    weekends: Option<BTreeSet<u8>>,
    direction: Option<ShiftDirection>,
}

impl From<RawObservedRule> for ObservedRule {
    fn from(raw: RawObservedRule) -> Self {
        Self {
            kind: raw.kind,
            weekends: raw.weekends.unwrap_or_else(ObservedRule::default_weekends),
            direction: raw.direction.unwrap_or_default(),
        }
    }
}

#[derive(Deserialize)]
struct RawHolidayRule {
    name: String,
    #[serde(rename = "type")]
    tag: String,
    id: Option<String>,
    duration_days: Option<u16>,
    regions: Option<BTreeSet<String>>,
    active: Option<bool>,
    observed_rule: Option<RawObservedRule>,
    month: Option<u8>,
    day: Option<u8>,
    weekday: Option<u8>,
    nth: Option<i8>,
    relative_to: Option<String>,
    offset_days: Option<i32>,
    calendar: Option<LunarCalendarKind>,
}

impl HolidayRule {
    /// Parses and validates one rule from its JSON form.
    pub fn from_json(json: &str) -> KairosResult<Self> {
        let raw: RawHolidayRule = serde_json::from_str(json)
            .map_err(|err| KairosError::configuration().with_message(err.to_string()))?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawHolidayRule) -> KairosResult<Self> {
        let missing =
            |field: &'static str| KairosError::configuration().with_message(format!(
                "rule type `{}` requires the `{field}` field.",
                raw.tag
            ));
        let kind = match raw.tag.as_str() {
            "fixed" => RuleKind::Fixed {
                month: raw.month.ok_or_else(|| missing("month"))?,
                day: raw.day.ok_or_else(|| missing("day"))?,
            },
            "nth_weekday" => RuleKind::NthWeekday {
                month: raw.month.ok_or_else(|| missing("month"))?,
                weekday: raw.weekday.ok_or_else(|| missing("weekday"))?,
                nth: raw.nth.ok_or_else(|| missing("nth"))?,
            },
            "relative" => RuleKind::Relative {
                relative_to: raw.relative_to.ok_or_else(|| missing("relative_to"))?,
                offset_days: raw.offset_days.ok_or_else(|| missing("offset_days"))?,
            },
            "lunar" => RuleKind::Lunar {
                calendar: raw.calendar.ok_or_else(|| missing("calendar"))?,
                month: raw.month.ok_or_else(|| missing("month"))?,
                day: raw.day.ok_or_else(|| missing("day"))?,
            },
            "easter_based" => RuleKind::EasterBased {
                offset_days: raw.offset_days.ok_or_else(|| missing("offset_days"))?,
            },
            other => {
                return Err(KairosError::configuration()
                    .with_message(format!("unknown rule type `{other}`.")))
            }
        };
        let rule = Self {
            name: raw.name,
            id: raw.id,
            duration_days: raw.duration_days.unwrap_or(1),
            regions: raw.regions.map(|regions| {
                regions
                    .into_iter()
                    .map(|region| region.to_ascii_lowercase())
                    .collect()
            }),
            active: raw.active.unwrap_or(true),
            observed: raw.observed_rule.map(ObservedRule::from),
            kind,
        };
        rule.validate()?;
        Ok(rule)
    }
}
