//! Locale data and the process-wide locale store.
//!
//! A [`Locale`] bundles month/weekday names, week conventions, format
//! shortcuts, ordinal and meridiem functions, relative-time phrase
//! tables, and the locale's holiday rule sets. The store is process-wide
//! state with an initialize-then-read lifecycle: built-in locales are
//! registered at first use, `set_active` switches the active locale, and
//! [`reset`] restores the defaults.

use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use tinystr::TinyAsciiStr;

use crate::{
    error::KairosError,
    holiday::{HolidayRule, RuleSet},
    options::DateOrder,
    KairosResult,
};

pub mod data;

/// A locale identifier such as `en-US`, at most eight ASCII bytes.
pub type LocaleCode = TinyAsciiStr<8>;

/// The slots a plural-aware phrase hook can be asked to format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeSlot {
    Minutes,
    Hours,
    Days,
    Months,
    Years,
}

/// Phrase templates for humanized durations; `%s` receives the phrase,
/// `%d` the count.
#[derive(Debug, Clone)]
pub struct RelativePhrases {
    pub future: String,
    pub past: String,
    pub few_seconds: String,
    pub minute: String,
    pub minutes: String,
    pub hour: String,
    pub hours: String,
    pub day: String,
    pub days: String,
    pub month: String,
    pub months: String,
    pub year: String,
    pub years: String,
}

/// Humanization band boundaries, adjustable per locale.
#[derive(Debug, Clone, Copy)]
pub struct RelativeThresholds {
    /// Max seconds still phrased as "a few seconds".
    pub few_seconds: i64,
    /// Max seconds still phrased as "a minute".
    pub minute: i64,
    /// Max minutes still phrased in minutes.
    pub minutes: i64,
    /// Max hours still phrased in hours.
    pub hours: i64,
    /// Max hours still phrased as "a day".
    pub day: i64,
    /// Max days still phrased in days.
    pub days: i64,
    /// Max months still phrased in months.
    pub months: i64,
}

impl Default for RelativeThresholds {
    fn default() -> Self {
        Self {
            few_seconds: 44,
            minute: 89,
            minutes: 44,
            hours: 21,
            day: 25,
            days: 25,
            months: 10,
        }
    }
}

/// Calendar-window format templates (`calendar()` output). Each entry is
/// a format template, so literals sit inside `[...]` blocks.
#[derive(Debug, Clone)]
pub struct CalendarPhrases {
    pub same_day: String,
    pub next_day: String,
    pub next_week: String,
    pub last_day: String,
    pub last_week: String,
    /// Phrase for two days ahead, where the language has one.
    pub day_after_tomorrow: Option<String>,
    /// Phrase for two days back, where the language has one.
    pub day_before_yesterday: Option<String>,
    /// Fallback shortcut outside the week window, typically `L`.
    pub same_else: String,
}

/// A complete locale record.
#[derive(Debug, Clone)]
pub struct Locale {
    pub code: LocaleCode,
    pub months: [String; 12],
    pub months_short: [String; 12],
    pub weekdays: [String; 7],
    pub weekdays_short: [String; 7],
    pub weekdays_min: [String; 7],
    /// First day of the week, `0` being Sunday.
    pub week_start: u8,
    /// How ambiguous two-number dates are read in this locale.
    pub date_order: DateOrder,
    /// Format shortcuts (`LT`, `L`, `LL`, ...) to their expansions.
    pub shortcuts: Vec<(String, String)>,
    pub ordinal: fn(u16) -> String,
    /// `(hour, minute, lowercase)` to the meridiem label.
    pub meridiem: fn(u8, u8, bool) -> String,
    pub relative: RelativePhrases,
    /// Plural-aware override for counted phrases (Slavic languages).
    pub relative_count: Option<fn(RelativeSlot, i64) -> String>,
    pub thresholds: RelativeThresholds,
    pub calendar: CalendarPhrases,
    /// National holiday rules.
    pub holidays: Vec<HolidayRule>,
    /// Additional rules per region code (lower-cased at registration).
    pub regional_holidays: FxHashMap<String, Vec<HolidayRule>>,
}

impl Locale {
    /// Expands a format shortcut, longest token first.
    #[must_use]
    pub fn shortcut(&self, token: &str) -> Option<&str> {
        self.shortcuts
            .iter()
            .find(|(name, _)| name == token)
            .map(|(_, expansion)| expansion.as_str())
    }

    /// Builds the validated rule set for this locale, optionally merged
    /// with one region's additional rules.
    pub fn rule_set(&self, region: Option<&str>) -> KairosResult<RuleSet> {
        let mut rules = self.holidays.clone();
        if let Some(region) = region
            .map(str::trim)
            .filter(|region| !region.is_empty())
        {
            if let Some(extra) = self.regional_holidays.get(&region.to_ascii_lowercase()) {
                rules.extend(extra.iter().cloned());
            }
        }
        RuleSet::new(rules)
    }

    /// Looks up a month name (full or abbreviated, case-insensitive),
    /// returning the 1-indexed month.
    #[must_use]
    pub fn month_from_name(&self, name: &str) -> Option<u8> {
        let needle = name.trim_end_matches('.').to_lowercase();
        let position = |table: &[String; 12]| {
            table
                .iter()
                .position(|month| month.trim_end_matches('.').to_lowercase() == needle)
        };
        position(&self.months)
            .or_else(|| position(&self.months_short))
            .map(|index| index as u8 + 1)
    }
}

// ==== Process-wide store ====

struct LocaleStore {
    locales: FxHashMap<LocaleCode, Arc<Locale>>,
    active: LocaleCode,
}

impl LocaleStore {
    fn bootstrap() -> Self {
        let mut locales = FxHashMap::default();
        for locale in data::builtin_locales() {
            locales.insert(locale.code, Arc::new(locale));
        }
        Self {
            locales,
            active: data::DEFAULT_LOCALE
                .parse()
                .unwrap_or_else(|_| unreachable!()),
        }
    }

    fn lookup(&self, code: &str) -> Option<&Arc<Locale>> {
        if let Ok(parsed) = code.parse::<LocaleCode>() {
            if let Some(locale) = self.locales.get(&parsed) {
                return Some(locale);
            }
        }
        // Fall back to a case-insensitive scan: `en-us` finds `en-US`.
        self.locales
            .iter()
            .find(|(registered, _)| registered.as_str().eq_ignore_ascii_case(code))
            .map(|(_, locale)| locale)
    }
}

static STORE: Lazy<RwLock<LocaleStore>> = Lazy::new(|| RwLock::new(LocaleStore::bootstrap()));

fn read_store<T>(reader: impl FnOnce(&LocaleStore) -> T) -> T {
    match STORE.read() {
        Ok(guard) => reader(&guard),
        Err(poisoned) => reader(&poisoned.into_inner()),
    }
}

fn write_store<T>(writer: impl FnOnce(&mut LocaleStore) -> T) -> T {
    match STORE.write() {
        Ok(mut guard) => writer(&mut guard),
        Err(poisoned) => writer(&mut poisoned.into_inner()),
    }
}

/// Registers (or replaces) a locale after validating its rule sets.
pub fn register(locale: Locale) -> KairosResult<()> {
    RuleSet::new(locale.holidays.clone())?;
    for rules in locale.regional_holidays.values() {
        let mut combined = locale.holidays.clone();
        combined.extend(rules.iter().cloned());
        RuleSet::new(combined)?;
    }
    write_store(|store| {
        if store.locales.contains_key(&locale.code) {
            log::warn!("locale `{}` re-registered; replacing", locale.code);
        }
        store.locales.insert(locale.code, Arc::new(locale));
    });
    Ok(())
}

/// Returns a registered locale; lookup is case-insensitive.
#[must_use]
pub fn get(code: &str) -> Option<Arc<Locale>> {
    read_store(|store| store.lookup(code).cloned())
}

/// Returns the active locale's code.
#[must_use]
pub fn active() -> String {
    read_store(|store| store.active.to_string())
}

/// Returns the active locale's data.
#[must_use]
pub fn active_locale() -> Arc<Locale> {
    read_store(|store| {
        if let Some(locale) = store.locales.get(&store.active) {
            return Arc::clone(locale);
        }
        // The default locale is always registered.
        store
            .locales
            .values()
            .next()
            .cloned()
            .unwrap_or_else(|| unreachable!("locale store cannot be empty"))
    })
}

/// Switches the active locale.
///
/// An unknown code is a warning, not a failure mode that disturbs state:
/// the previous active locale stays in effect and `UnknownLocale` is
/// returned so strict callers can surface it.
pub fn set_active(code: &str) -> KairosResult<()> {
    write_store(|store| match store.lookup(code).map(|locale| locale.code) {
        Some(found) => {
            store.active = found;
            Ok(())
        }
        None => {
            log::warn!("unknown locale `{code}`; keeping `{}` active", store.active);
            Err(KairosError::unknown_locale()
                .with_message(format!("no locale data registered for `{code}`.")))
        }
    })
}

/// Lists registered locale codes, sorted.
#[must_use]
pub fn list() -> Vec<String> {
    let mut codes =
        read_store(|store| store.locales.keys().map(|code| code.to_string()).collect::<Vec<_>>());
    codes.sort();
    codes
}

/// Restores the built-in locales and the default active locale.
pub fn reset() {
    write_store(|store| *store = LocaleStore::bootstrap());
}

/// The active locale's first day of week.
pub(crate) fn active_week_start() -> u8 {
    active_locale().week_start
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_locales_are_registered() {
        for code in [
            "en-US", "de-DE", "fr-FR", "es-ES", "it-IT", "pt-BR", "ru-RU", "zh-CN", "ja-JP",
            "tr-TR",
        ] {
            assert!(get(code).is_some(), "missing builtin locale {code}");
        }
        assert!(list().len() >= 10);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let locale = get("EN-us").unwrap();
        assert_eq!(locale.code.as_str(), "en-US");
    }

    #[test]
    fn unknown_active_locale_keeps_previous() {
        let _guard = crate::sys::TEST_ZONE_LOCK.lock().unwrap();
        reset();
        assert_eq!(active(), "en-US");
        let err = set_active("xx-XX").unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::UnknownLocale);
        assert_eq!(active(), "en-US");
        set_active("de-DE").unwrap();
        assert_eq!(active(), "de-DE");
        reset();
        assert_eq!(active(), "en-US");
    }

    #[test]
    fn month_name_lookup() {
        let en = get("en-US").unwrap();
        assert_eq!(en.month_from_name("March"), Some(3));
        assert_eq!(en.month_from_name("mar"), Some(3));
        assert_eq!(en.month_from_name("Nonmonth"), None);
        let de = get("de-DE").unwrap();
        assert_eq!(de.month_from_name("März"), Some(3));
        assert_eq!(de.month_from_name("Dez."), Some(12));
    }

    #[test]
    fn locale_rule_sets_build() {
        let en = get("en-US").unwrap();
        let rules = en.rule_set(None).unwrap();
        assert!(rules.len() >= 10);
        let de = get("de-DE").unwrap();
        let national = de.rule_set(None).unwrap();
        let bavarian = de.rule_set(Some("BY")).unwrap();
        assert!(bavarian.len() > national.len());
    }
}
