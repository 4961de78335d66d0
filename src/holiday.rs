//! The holiday rule engine.
//!
//! Rules are registered into a validated [`RuleSet`]; the engine
//! dispatches each rule's [`RuleKind`] to its calculator, memoizes
//! results in a two-level `rule_hash → year → dates` cache (the rule
//! level is LRU-bounded), resolves relative rules against other rules
//! with cycle detection, and applies observed-date substitution for
//! holidays falling on a weekend.

use std::sync::{Arc, Mutex};

use rustc_hash::FxHashMap;

use crate::{
    cache::LruCache,
    components::Instant,
    error::KairosError,
    iso::IsoDate,
    KairosResult,
};

pub mod easter;
pub mod lunar;
pub mod rules;

#[doc(inline)]
pub use lunar::{LunarProvider, TabularLunarProvider};
#[doc(inline)]
pub use rules::{
    HolidayRule, LunarCalendarKind, ObservedKind, ObservedRule, RuleKind, ShiftDirection,
};

/// Bounded number of rules the engine keeps year-maps for.
const RULE_CACHE_CAPACITY: usize = 256;
/// How many years ahead/behind the next/previous searches scan before
/// giving up on rule sets that produce nothing.
const HOLIDAY_SEARCH_YEARS: i32 = 8;

/// A resolved holiday occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidayInfo {
    /// The rule's key (id when present, name otherwise).
    pub id: String,
    pub name: String,
    /// The rule's variant tag (`"fixed"`, `"nth_weekday"`, ...).
    pub kind: &'static str,
    /// The observed calendar date.
    pub date: IsoDate,
    /// The computed date before observed substitution.
    pub original_date: IsoDate,
    /// `true` when an observed rule shifted the date.
    pub observed: bool,
    pub duration_days: u16,
    pub regions: Option<std::collections::BTreeSet<String>>,
}

impl HolidayInfo {
    /// The observed date as an instant at UTC midnight.
    #[must_use]
    pub fn instant(&self) -> Instant {
        Instant::from_date(self.date)
    }

    /// Returns `true` when the holiday (including multi-day spans) is in
    /// effect on the given date.
    #[must_use]
    pub fn in_effect(&self, date: IsoDate) -> bool {
        let start = self.date.to_epoch_days();
        let probe = date.to_epoch_days();
        (start..start + i64::from(self.duration_days)).contains(&probe)
    }
}

/// A validated, immutable collection of holiday rules.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Arc<HolidayRule>>,
    index: FxHashMap<String, usize>,
}

impl RuleSet {
    /// Validates and indexes a set of rules.
    ///
    /// Fails with `InvalidConfiguration` on any out-of-range field,
    /// duplicate key, or relative rule whose target is not in the set.
    pub fn new(rules: impl IntoIterator<Item = HolidayRule>) -> KairosResult<Self> {
        let rules: Vec<Arc<HolidayRule>> = rules.into_iter().map(Arc::new).collect();
        let mut index = FxHashMap::default();
        for (position, rule) in rules.iter().enumerate() {
            rule.validate()?;
            if index.insert(rule.key().to_string(), position).is_some() {
                return Err(KairosError::configuration()
                    .with_message(format!("duplicate rule key `{}`.", rule.key())));
            }
        }
        for rule in &rules {
            if let RuleKind::Relative { relative_to, .. } = &rule.kind {
                if !index.contains_key(relative_to) {
                    return Err(KairosError::configuration().with_message(format!(
                        "relative rule `{}` references unknown rule `{relative_to}`.",
                        rule.key()
                    )));
                }
            }
        }
        Ok(Self { rules, index })
    }

    /// Parses a JSON array of rules.
    pub fn from_json(json: &str) -> KairosResult<Self> {
        let values: Vec<serde_json::Value> = serde_json::from_str(json)
            .map_err(|err| KairosError::configuration().with_message(err.to_string()))?;
        let mut rules = Vec::with_capacity(values.len());
        for value in values {
            rules.push(HolidayRule::from_json(&value.to_string())?);
        }
        Self::new(rules)
    }

    /// Looks a rule up by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Arc<HolidayRule>> {
        self.index.get(key).map(|&position| &self.rules[position])
    }

    #[must_use]
    pub fn rules(&self) -> &[Arc<HolidayRule>] {
        &self.rules
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn region_matches(rule: &HolidayRule, region: Option<&str>) -> bool {
        // A missing or empty region string means "no region filter".
        let Some(region) = region.map(str::trim).filter(|region| !region.is_empty()) else {
            return true;
        };
        match &rule.regions {
            None => true,
            Some(regions) => regions.contains(&region.to_ascii_lowercase()),
        }
    }
}

type YearCache = FxHashMap<i32, Arc<Vec<IsoDate>>>;

/// The rule calculation engine.
pub struct HolidayEngine {
    cache: Mutex<LruCache<String, YearCache>>,
    lunar: Arc<dyn LunarProvider>,
}

impl core::fmt::Debug for HolidayEngine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HolidayEngine").finish_non_exhaustive()
    }
}

impl Default for HolidayEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl HolidayEngine {
    /// Creates an engine with the bundled tabular lunar provider.
    #[must_use]
    pub fn new() -> Self {
        Self::with_lunar_provider(Arc::new(TabularLunarProvider))
    }

    /// Creates an engine dispatching lunar rules to the given provider.
    #[must_use]
    pub fn with_lunar_provider(lunar: Arc<dyn LunarProvider>) -> Self {
        Self {
            // Capacity is positive by construction.
            cache: Mutex::new(
                LruCache::try_new(RULE_CACHE_CAPACITY).unwrap_or_else(|_| unreachable!()),
            ),
            lunar,
        }
    }

    /// Computes the dates a rule produces in a year, memoized.
    ///
    /// Fixed rules yield an empty list in years where the date does not
    /// exist (February 29); relative rules resolve against their target
    /// rule within `rules`.
    pub fn compute(
        &self,
        rule: &HolidayRule,
        year: i32,
        rules: &RuleSet,
    ) -> KairosResult<Vec<IsoDate>> {
        let mut visited = Vec::new();
        self.resolve(rule, year, rules, &mut visited)
            .map(|dates| dates.as_ref().clone())
    }

    /// Recursive resolution with a per-call visited set for cycle
    /// detection; the set is call-local state, never engine state.
    fn resolve(
        &self,
        rule: &HolidayRule,
        year: i32,
        rules: &RuleSet,
        visited: &mut Vec<String>,
    ) -> KairosResult<Arc<Vec<IsoDate>>> {
        let hash = rule.stable_hash();
        if let Some(cached) = self.cache_lookup(&hash, year)? {
            return Ok(cached);
        }
        if visited.iter().any(|seen| seen.as_str() == rule.key()) {
            return Err(KairosError::holiday_cycle().with_message(format!(
                "relative holiday rules form a cycle through `{}`.",
                rule.key()
            )));
        }
        visited.push(rule.key().to_string());
        let computed = self.calculate(rule, year, rules, visited);
        visited.pop();

        let dates = Arc::new(computed?);
        self.cache_store(hash, year, Arc::clone(&dates))?;
        Ok(dates)
    }

    fn calculate(
        &self,
        rule: &HolidayRule,
        year: i32,
        rules: &RuleSet,
        visited: &mut Vec<String>,
    ) -> KairosResult<Vec<IsoDate>> {
        let dates = match &rule.kind {
            RuleKind::Fixed { month, day } => {
                // Validated against the month's actual day count here, at
                // calculation time: Feb 29 exists only in leap years.
                IsoDate::new(year, *month, *day).ok().into_iter().collect()
            }
            RuleKind::NthWeekday {
                month,
                weekday,
                nth,
            } => crate::utils::nth_weekday_of_month(year, *month, *weekday, *nth)
                .map(|day| IsoDate::new_unchecked(year, *month, day))
                .into_iter()
                .collect(),
            RuleKind::Relative {
                relative_to,
                offset_days,
            } => {
                let target = rules.get(relative_to).ok_or_else(|| {
                    KairosError::configuration().with_message(format!(
                        "relative rule `{}` references unknown rule `{relative_to}`.",
                        rule.key()
                    ))
                })?;
                let base = self.resolve(target, year, rules, visited)?;
                base.iter()
                    .map(|date| date.add_days(i64::from(*offset_days)))
                    .collect()
            }
            RuleKind::Lunar {
                calendar,
                month,
                day,
            } => self.lunar.compute_gregorian(*calendar, year, *month, *day),
            RuleKind::EasterBased { offset_days } => {
                vec![easter::easter_sunday(year).add_days(i64::from(*offset_days))]
            }
            RuleKind::Custom { calculate } => {
                let mut dates = calculate(year);
                dates.sort_unstable();
                dates
            }
        };
        Ok(dates)
    }

    fn cache_lookup(&self, hash: &str, year: i32) -> KairosResult<Option<Arc<Vec<IsoDate>>>> {
        let mut cache = self.cache.lock().map_err(|_| KairosError::assert())?;
        Ok(cache
            .get(&hash.to_string())
            .and_then(|years| years.get(&year))
            .cloned())
    }

    fn cache_store(&self, hash: String, year: i32, dates: Arc<Vec<IsoDate>>) -> KairosResult<()> {
        let mut cache = self.cache.lock().map_err(|_| KairosError::assert())?;
        if let Some(years) = cache.get_mut(&hash) {
            years.insert(year, dates);
        } else {
            let mut years = YearCache::default();
            years.insert(year, dates);
            cache.put(hash, years);
        }
        Ok(())
    }

    /// Returns every holiday of the year, ascending by date with ties
    /// broken by key.
    ///
    /// Relative rules are resolved in a second pass against the first
    /// pass's results.
    pub fn holidays_in_year(
        &self,
        year: i32,
        rules: &RuleSet,
        region: Option<&str>,
    ) -> KairosResult<Vec<HolidayInfo>> {
        let mut infos = Vec::new();
        let selected: Vec<&Arc<HolidayRule>> = rules
            .rules()
            .iter()
            .filter(|rule| rule.active && RuleSet::region_matches(rule, region))
            .collect();
        // Pass 1: everything that resolves on its own.
        for rule in &selected {
            if !matches!(rule.kind, RuleKind::Relative { .. }) {
                self.collect_infos(rule.as_ref(), year, rules, &mut infos)?;
            }
        }
        // Pass 2: relative rules, resolved against the pass-1 results
        // (already memoized).
        for rule in &selected {
            if matches!(rule.kind, RuleKind::Relative { .. }) {
                self.collect_infos(rule.as_ref(), year, rules, &mut infos)?;
            }
        }
        infos.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
        Ok(infos)
    }

    fn collect_infos(
        &self,
        rule: &HolidayRule,
        year: i32,
        rules: &RuleSet,
        infos: &mut Vec<HolidayInfo>,
    ) -> KairosResult<()> {
        let mut visited = Vec::new();
        let dates = self.resolve(rule, year, rules, &mut visited)?;
        for &original in dates.iter().filter(|date| date.year == year) {
            let observed_date = observed_substitute(rule, original);
            infos.push(HolidayInfo {
                id: rule.key().to_string(),
                name: rule.name.clone(),
                kind: rule.tag(),
                date: observed_date.unwrap_or(original),
                original_date: original,
                observed: observed_date.is_some(),
                duration_days: rule.duration_days,
                regions: rule.regions.clone(),
            });
        }
        Ok(())
    }

    /// Returns the holiday in effect on a date, if any.
    pub fn is_holiday(
        &self,
        date: IsoDate,
        rules: &RuleSet,
        region: Option<&str>,
    ) -> KairosResult<Option<HolidayInfo>> {
        // Multi-day holidays can spill over a year boundary, so the
        // previous year's tail is also consulted.
        for year in [date.year - 1, date.year] {
            if year < crate::utils::MIN_YEAR {
                continue;
            }
            let infos = self.holidays_in_year(year, rules, region)?;
            if let Some(hit) = infos.into_iter().find(|info| info.in_effect(date)) {
                return Ok(Some(hit));
            }
        }
        Ok(None)
    }

    /// Returns the holidays within the inclusive date interval, in
    /// ascending date order.
    pub fn holidays_in_range(
        &self,
        start: IsoDate,
        end: IsoDate,
        rules: &RuleSet,
        region: Option<&str>,
    ) -> KairosResult<Vec<HolidayInfo>> {
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        let mut infos = Vec::new();
        for year in start.year..=end.year {
            for info in self.holidays_in_year(year, rules, region)? {
                if info.date >= start && info.date <= end {
                    infos.push(info);
                }
            }
        }
        infos.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
        Ok(infos)
    }

    /// Returns the first holiday strictly after the given date.
    pub fn next_holiday(
        &self,
        after: IsoDate,
        rules: &RuleSet,
        region: Option<&str>,
    ) -> KairosResult<Option<HolidayInfo>> {
        for year in after.year..=after.year + HOLIDAY_SEARCH_YEARS {
            if year > crate::utils::MAX_YEAR {
                break;
            }
            let hit = self
                .holidays_in_year(year, rules, region)?
                .into_iter()
                .find(|info| info.date > after);
            if hit.is_some() {
                return Ok(hit);
            }
        }
        Ok(None)
    }

    /// Returns the last holiday strictly before the given date.
    pub fn previous_holiday(
        &self,
        before: IsoDate,
        rules: &RuleSet,
        region: Option<&str>,
    ) -> KairosResult<Option<HolidayInfo>> {
        for year in (before.year - HOLIDAY_SEARCH_YEARS..=before.year).rev() {
            if year < crate::utils::MIN_YEAR {
                break;
            }
            let hit = self
                .holidays_in_year(year, rules, region)?
                .into_iter()
                .rev()
                .find(|info| info.date < before);
            if hit.is_some() {
                return Ok(hit);
            }
        }
        Ok(None)
    }
}

/// Applies a rule's observed policy to a computed date: when the date
/// falls on a configured weekend day, searches for a substitute in the
/// policy's direction, bounded to seven steps.
///
/// Only fixed and nth-weekday holidays observe; returns `None` when no
/// shift applies.
fn observed_substitute(rule: &HolidayRule, original: IsoDate) -> Option<IsoDate> {
    if !matches!(
        rule.kind,
        RuleKind::Fixed { .. } | RuleKind::NthWeekday { .. }
    ) {
        return None;
    }
    let observed = rule.observed.as_ref()?;
    if !observed.weekends.contains(&original.weekday()) {
        return None;
    }
    let is_free = |date: IsoDate| !observed.weekends.contains(&date.weekday());
    match observed.effective_direction() {
        ShiftDirection::Forward => (1..=7)
            .map(|step| original.add_days(step))
            .find(|&date| is_free(date)),
        ShiftDirection::Backward => (1..=7)
            .map(|step| original.add_days(-step))
            .find(|&date| is_free(date)),
        ShiftDirection::Nearest => (1..=7).find_map(|step| {
            [original.add_days(step), original.add_days(-step)]
                .into_iter()
                .find(|&date| is_free(date))
        }),
    }
}

// ==== Holiday engine tests ====

#[cfg(test)]
mod tests {
    use super::*;
    use crate::holiday::rules::{HolidayRule, ObservedRule, ShiftDirection};

    fn engine() -> HolidayEngine {
        HolidayEngine::new()
    }

    #[test]
    fn us_thanksgiving_2024() {
        let rules =
            RuleSet::new([HolidayRule::nth_weekday("Thanksgiving", 11, 4, 4)]).unwrap();
        let dates = engine()
            .compute(&rules.rules()[0], 2024, &rules)
            .unwrap();
        assert_eq!(dates, vec![IsoDate::new_unchecked(2024, 11, 28)]);
    }

    #[test]
    fn german_easter_monday_2024() {
        let rules = RuleSet::new([HolidayRule::easter_based("Ostermontag", 1)]).unwrap();
        let dates = engine()
            .compute(&rules.rules()[0], 2024, &rules)
            .unwrap();
        assert_eq!(dates, vec![IsoDate::new_unchecked(2024, 4, 1)]);
    }

    #[test]
    fn fixed_rule_determinism_and_leap_skips() {
        let rules = RuleSet::new([HolidayRule::fixed("Leap Day", 2, 29)]).unwrap();
        let engine = engine();
        for year in 1970..2100 {
            let dates = engine.compute(&rules.rules()[0], year, &rules).unwrap();
            if crate::utils::in_leap_year(year) {
                assert_eq!(dates, vec![IsoDate::new_unchecked(year, 2, 29)]);
            } else {
                assert!(dates.is_empty());
            }
        }
    }

    #[test]
    fn observed_substitution_nearest() {
        // July 4, 2026 is a Saturday; nearest substitution observes on
        // Friday the 3rd while preserving the original date.
        let rules = RuleSet::new([HolidayRule::fixed("Independence Day", 7, 4)
            .with_observed(ObservedRule::substitute(ShiftDirection::Nearest))])
        .unwrap();
        let infos = engine().holidays_in_year(2026, &rules, None).unwrap();
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].date, IsoDate::new_unchecked(2026, 7, 3));
        assert_eq!(infos[0].original_date, IsoDate::new_unchecked(2026, 7, 4));
        assert!(infos[0].observed);
    }

    #[test]
    fn observed_substitution_forward_from_sunday() {
        // July 4, 2027 is a Sunday; a forward substitute observes Monday.
        let rules = RuleSet::new([HolidayRule::fixed("Independence Day", 7, 4)
            .with_observed(ObservedRule::substitute(ShiftDirection::Forward))])
        .unwrap();
        let infos = engine().holidays_in_year(2027, &rules, None).unwrap();
        assert_eq!(infos[0].date, IsoDate::new_unchecked(2027, 7, 5));
        assert!(infos[0].observed);
    }

    #[test]
    fn observed_dates_stay_within_seven_days_and_off_weekends() {
        let rules = RuleSet::new([HolidayRule::fixed("X", 7, 4).with_observed(
            ObservedRule::substitute(ShiftDirection::Forward).with_weekends([0, 1, 2, 3, 6]),
        )])
        .unwrap();
        let engine = engine();
        for year in 2024..2040 {
            let infos = engine.holidays_in_year(year, &rules, None).unwrap();
            let info = &infos[0];
            let distance =
                (info.date.to_epoch_days() - info.original_date.to_epoch_days()).abs();
            assert!(distance <= 7);
            assert!(!matches!(info.date.weekday(), 0 | 1 | 2 | 3 | 6));
        }
    }

    #[test]
    fn relative_rules_resolve_against_their_target() {
        let rules = RuleSet::new([
            HolidayRule::fixed("Christmas", 12, 25).with_id("christmas"),
            HolidayRule::relative("Boxing Day", "christmas", 1),
        ])
        .unwrap();
        let infos = engine().holidays_in_year(2024, &rules, None).unwrap();
        assert_eq!(infos.len(), 2);
        assert_eq!(infos[1].name, "Boxing Day");
        assert_eq!(infos[1].date, IsoDate::new_unchecked(2024, 12, 26));
    }

    #[test]
    fn relative_cycles_are_detected() {
        // The set itself validates target existence, so build a cycle
        // through two mutually relative rules.
        let rules = RuleSet::new([
            HolidayRule::relative("A", "B", 1).with_id("A"),
            HolidayRule::relative("B", "A", 1).with_id("B"),
        ])
        .unwrap();
        let err = engine()
            .compute(&rules.rules()[0], 2024, &rules)
            .unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::HolidayCycle);
    }

    #[test]
    fn unknown_relative_target_fails_registration() {
        let err = RuleSet::new([HolidayRule::relative("Ghost", "nothing", 1)]).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidConfiguration);
    }

    #[test]
    fn year_ordering_and_ties() {
        let rules = RuleSet::new([
            HolidayRule::fixed("Zeta Day", 5, 1).with_id("zeta"),
            HolidayRule::fixed("Alpha Day", 5, 1).with_id("alpha"),
            HolidayRule::fixed("New Year", 1, 1),
        ])
        .unwrap();
        let infos = engine().holidays_in_year(2024, &rules, None).unwrap();
        let keys: Vec<&str> = infos.iter().map(|info| info.id.as_str()).collect();
        assert_eq!(keys, vec!["New Year", "alpha", "zeta"]);
    }

    #[test]
    fn region_filtering_is_case_normalized() {
        let rules = RuleSet::new([
            HolidayRule::fixed("Everywhere", 1, 1),
            HolidayRule::fixed("Bavaria Only", 1, 6).with_regions(["BY"]),
        ])
        .unwrap();
        let engine = engine();
        let everywhere = engine.holidays_in_year(2024, &rules, None).unwrap();
        assert_eq!(everywhere.len(), 2);
        let bavaria = engine.holidays_in_year(2024, &rules, Some("by")).unwrap();
        assert_eq!(bavaria.len(), 2);
        let berlin = engine.holidays_in_year(2024, &rules, Some("BE")).unwrap();
        assert_eq!(berlin.len(), 1);
        // Whitespace-only region means no filter.
        let blank = engine.holidays_in_year(2024, &rules, Some("  ")).unwrap();
        assert_eq!(blank.len(), 2);
    }

    #[test]
    fn multi_day_holidays_span_and_cross_years() {
        let rules = RuleSet::new([
            HolidayRule::fixed("Festival", 12, 31).with_duration_days(3)
        ])
        .unwrap();
        let engine = engine();
        for (y, m, d, expected) in [
            (2024, 12, 30, false),
            (2024, 12, 31, true),
            (2025, 1, 1, true),
            (2025, 1, 2, true),
            (2025, 1, 3, false),
        ] {
            let hit = engine
                .is_holiday(IsoDate::new_unchecked(y, m, d), &rules, None)
                .unwrap();
            assert_eq!(hit.is_some(), expected, "{y}-{m}-{d}");
        }
    }

    #[test]
    fn next_and_previous_holiday_search() {
        let rules = RuleSet::new([
            HolidayRule::fixed("New Year", 1, 1),
            HolidayRule::fixed("Christmas", 12, 25),
        ])
        .unwrap();
        let engine = engine();
        let next = engine
            .next_holiday(IsoDate::new_unchecked(2024, 12, 26), &rules, None)
            .unwrap()
            .unwrap();
        assert_eq!(next.date, IsoDate::new_unchecked(2025, 1, 1));
        let previous = engine
            .previous_holiday(IsoDate::new_unchecked(2024, 12, 26), &rules, None)
            .unwrap()
            .unwrap();
        assert_eq!(previous.date, IsoDate::new_unchecked(2024, 12, 25));
        // A rule set that never produces dates terminates the bounded
        // search empty-handed.
        let empty = RuleSet::new([HolidayRule::custom("Never", |_| Vec::new())]).unwrap();
        assert!(engine
            .next_holiday(IsoDate::new_unchecked(2024, 1, 1), &empty, None)
            .unwrap()
            .is_none());
    }

    #[test]
    fn custom_rules_pass_through() {
        let rules = RuleSet::new([HolidayRule::custom("Second Tuesday", |year| {
            crate::utils::nth_weekday_of_month(year, 4, 2, 2)
                .map(|day| IsoDate::new_unchecked(year, 4, day))
                .into_iter()
                .collect()
        })])
        .unwrap();
        let dates = engine().compute(&rules.rules()[0], 2024, &rules).unwrap();
        assert_eq!(dates, vec![IsoDate::new_unchecked(2024, 4, 9)]);
    }

    #[test]
    fn computed_results_are_memoized() {
        let rules = RuleSet::new([HolidayRule::fixed("New Year", 1, 1)]).unwrap();
        let engine = engine();
        let first = engine.compute(&rules.rules()[0], 2024, &rules).unwrap();
        let second = engine.compute(&rules.rules()[0], 2024, &rules).unwrap();
        assert_eq!(first, second);
    }
}
