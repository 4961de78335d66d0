//! The `Kairos` context: the caches, engines and registries behind the
//! entry points.
//!
//! A context owns the parse cache, the formatter (with its compiled
//! matcher cache), the holiday engine and the plugin registry. The
//! crate keeps one default context for the module-level entry points;
//! embedders who want isolated state construct their own and pass it
//! around explicitly.

use std::sync::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{
    cache::LruCache,
    components::{Instant, Range},
    error::KairosError,
    fmt::Formatter,
    holiday::{HolidayEngine, HolidayInfo},
    locale,
    parsers::{self, ParseOptions},
    plugin::{Plugin, PluginRegistry, PluginValue},
    relative, KairosResult,
};

/// Construction-time configuration for a context.
#[derive(Debug, Clone, Copy)]
pub struct KairosConfig {
    /// Capacity of the parse-result cache.
    pub parse_cache_capacity: usize,
}

impl Default for KairosConfig {
    fn default() -> Self {
        Self {
            parse_cache_capacity: 512,
        }
    }
}

/// The context object behind the `kairos` entry points.
#[derive(Debug)]
pub struct Kairos {
    parse_cache: Mutex<LruCache<(String, bool), i64>>,
    formatter: RwLock<Formatter>,
    holidays: HolidayEngine,
    plugins: RwLock<PluginRegistry>,
}

impl Default for Kairos {
    fn default() -> Self {
        Self::new()
    }
}

impl Kairos {
    /// A context with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(KairosConfig::default()).unwrap_or_else(|_| unreachable!())
    }

    /// A context with explicit cache sizing; a zero capacity fails with
    /// `InvalidConfiguration`.
    pub fn with_config(config: KairosConfig) -> KairosResult<Self> {
        Ok(Self {
            parse_cache: Mutex::new(LruCache::try_new(config.parse_cache_capacity)?),
            formatter: RwLock::new(Formatter::new()),
            holidays: HolidayEngine::new(),
            plugins: RwLock::new(PluginRegistry::default()),
        })
    }

    fn formatter_read(&self) -> RwLockReadGuard<'_, Formatter> {
        match self.formatter.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn formatter_write(&self) -> RwLockWriteGuard<'_, Formatter> {
        match self.formatter.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn plugins_read(&self) -> RwLockReadGuard<'_, PluginRegistry> {
        match self.plugins.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    // ==== Instants ====

    /// The current time in the host-local frame.
    #[must_use]
    pub fn now(&self) -> Instant {
        Instant::now()
    }

    /// The current time in the UTC frame; never invalid.
    #[must_use]
    pub fn utc_now(&self) -> Instant {
        Instant::now_utc()
    }

    /// Parses input in the local frame through the cache.
    #[must_use]
    pub fn parse(&self, input: &str) -> Instant {
        self.parse_with(input, &ParseOptions::default())
    }

    /// Parses input in the UTC frame through the cache.
    #[must_use]
    pub fn parse_utc(&self, input: &str) -> Instant {
        self.parse_with(input, &ParseOptions::utc())
    }

    /// Parses with explicit options.
    ///
    /// Results are cached keyed by the trimmed input and the UTC flag;
    /// invalid parses are never cached, and neither are parses under a
    /// caller-pinned date-order hint (their key would collide with the
    /// default interpretation).
    #[must_use]
    pub fn parse_with(&self, input: &str, options: &ParseOptions) -> Instant {
        let trimmed = input.trim();
        let cacheable = options.date_order.is_none();
        if cacheable {
            if let Ok(mut cache) = self.parse_cache.lock() {
                if let Some(&millis) = cache.get(&(trimmed.to_string(), options.utc)) {
                    return Instant::from_raw(millis, options.utc);
                }
            }
        }
        let mut instant = parsers::parse(trimmed, options);
        if !instant.is_valid() {
            // Plugin strategies get a shot only after the built-in chain
            // rejects the input.
            if let Some(millis) = self
                .plugins_read()
                .try_parsers(trimmed)
                .and_then(|parsed| parsed.epoch_millis())
            {
                instant = Instant::from_raw(millis, options.utc);
            }
        }
        if cacheable {
            if let Some(millis) = instant.epoch_millis() {
                if let Ok(mut cache) = self.parse_cache.lock() {
                    cache.put((trimmed.to_string(), options.utc), millis);
                }
            }
        }
        instant
    }

    /// An instant from Unix epoch seconds, fractional seconds allowed.
    #[must_use]
    pub fn unix(&self, seconds: f64) -> Instant {
        if !seconds.is_finite() {
            return Instant::invalid();
        }
        Instant::from_epoch_millis((seconds * 1000.0).round() as i64)
    }

    /// A day-stepped range between two instants.
    pub fn range(&self, start: Instant, end: Instant) -> KairosResult<Range> {
        Range::new(start, end)
    }

    // ==== Formatting and relative time ====

    /// Formats with the context's token vocabulary and the active
    /// locale.
    #[must_use]
    pub fn format(&self, instant: &Instant, template: &str) -> String {
        self.formatter_read()
            .format(instant, template, &locale::active_locale())
    }

    /// Formats with an explicit locale.
    #[must_use]
    pub fn format_with_locale(
        &self,
        instant: &Instant,
        template: &str,
        locale: &locale::Locale,
    ) -> String {
        self.formatter_read().format(instant, template, locale)
    }

    /// Humanizes the span from now to the instant (`in 2 hours`).
    #[must_use]
    pub fn from_now(&self, instant: &Instant, with_suffix: bool) -> String {
        relative::from_now(instant, &locale::active_locale(), with_suffix)
    }

    /// Humanizes the span from a reference instant to a target.
    #[must_use]
    pub fn from(&self, target: &Instant, reference: &Instant, with_suffix: bool) -> String {
        relative::from(target, reference, &locale::active_locale(), with_suffix)
    }

    /// The calendar-window phrase (`Today at 2:30 PM`, `Last Friday at
    /// 9:00 AM`, else the locale's `L` format).
    #[must_use]
    pub fn calendar(&self, target: &Instant, reference: &Instant) -> String {
        relative::calendar(
            target,
            reference,
            &self.formatter_read(),
            &locale::active_locale(),
        )
    }

    // ==== Locale ====

    /// Switches the active locale; unknown codes warn and keep the
    /// previous locale active.
    pub fn locale(&self, code: &str) -> KairosResult<()> {
        locale::set_active(code)
    }

    // ==== Holidays ====

    /// The context's holiday engine.
    #[must_use]
    pub fn holiday_engine(&self) -> &HolidayEngine {
        &self.holidays
    }

    /// The active locale's holidays for a year, optionally with one
    /// region's additional rules.
    pub fn holidays_in_year(
        &self,
        year: i32,
        region: Option<&str>,
    ) -> KairosResult<Vec<HolidayInfo>> {
        let locale = locale::active_locale();
        let rules = locale.rule_set(region)?;
        self.holidays.holidays_in_year(year, &rules, region)
    }

    /// The active locale's holiday in effect on the instant's date, if
    /// any.
    pub fn is_holiday(
        &self,
        instant: &Instant,
        region: Option<&str>,
    ) -> KairosResult<Option<HolidayInfo>> {
        let date = instant
            .date()
            .ok_or_else(|| KairosError::date().with_message("instant is invalid."))?;
        let locale = locale::active_locale();
        let rules = locale.rule_set(region)?;
        self.holidays.is_holiday(date, &rules, region)
    }

    /// The first active-locale holiday after the instant.
    pub fn next_holiday(
        &self,
        instant: &Instant,
        region: Option<&str>,
    ) -> KairosResult<Option<HolidayInfo>> {
        let date = instant
            .date()
            .ok_or_else(|| KairosError::date().with_message("instant is invalid."))?;
        let locale = locale::active_locale();
        let rules = locale.rule_set(region)?;
        self.holidays.next_holiday(date, &rules, region)
    }

    /// The last active-locale holiday before the instant.
    pub fn previous_holiday(
        &self,
        instant: &Instant,
        region: Option<&str>,
    ) -> KairosResult<Option<HolidayInfo>> {
        let date = instant
            .date()
            .ok_or_else(|| KairosError::date().with_message("instant is invalid."))?;
        let locale = locale::active_locale();
        let rules = locale.rule_set(region)?;
        self.holidays.previous_holiday(date, &rules, region)
    }

    // ==== Plugins ====

    /// Installs one plugin.
    pub fn use_plugin(&self, plugin: Plugin) -> KairosResult<()> {
        self.use_plugins(vec![plugin])
    }

    /// Installs a batch of plugins in dependency order.
    pub fn use_plugins(&self, plugins: Vec<Plugin>) -> KairosResult<()> {
        let mut formatter = self.formatter_write();
        let mut registry = match self.plugins.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        registry.install(&mut formatter, plugins)
    }

    /// Returns whether a plugin is installed.
    #[must_use]
    pub fn has_plugin(&self, name: &str) -> bool {
        self.plugins_read().has(name)
    }

    /// Dispatches a plugin instance operation on an instant.
    pub fn call(
        &self,
        name: &str,
        instant: &Instant,
        args: &[PluginValue],
    ) -> KairosResult<PluginValue> {
        self.plugins_read().call_instance(name, instant, args)
    }

    /// Dispatches a plugin static operation.
    pub fn call_static(&self, name: &str, args: &[PluginValue]) -> KairosResult<PluginValue> {
        self.plugins_read().call_static(name, args)
    }
}

#[cfg(test)]
mod tests {
    use super::{Kairos, KairosConfig};
    use crate::error::ErrorKind;

    #[test]
    fn zero_cache_capacity_is_rejected() {
        let err = Kairos::with_config(KairosConfig {
            parse_cache_capacity: 0,
        })
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
    }

    #[test]
    fn parse_results_are_cached_and_invalid_results_are_not() {
        let kairos = Kairos::new();
        let first = kairos.parse_utc("2024-06-15T14:30:00Z");
        let second = kairos.parse_utc("2024-06-15T14:30:00Z");
        assert_eq!(first, second);

        let invalid = kairos.parse_utc("not a date");
        assert!(!invalid.is_valid());
        // Still invalid on the second attempt; a poisoned cache entry
        // would have produced something else.
        assert!(!kairos.parse_utc("not a date").is_valid());
    }

    #[test]
    fn cache_keys_separate_utc_and_local() {
        let kairos = Kairos::new();
        let utc = kairos.parse_utc("2024-06-15");
        assert!(utc.is_utc());
        let local = kairos.parse("2024-06-15");
        assert!(!local.is_utc());
    }

    #[test]
    fn unix_entry_point() {
        let kairos = Kairos::new();
        assert_eq!(
            kairos.unix(1_718_461_800.0).epoch_millis(),
            Some(1_718_461_800_000)
        );
        assert_eq!(
            kairos.unix(1_718_461_800.25).epoch_millis(),
            Some(1_718_461_800_250)
        );
        assert!(!kairos.unix(f64::NAN).is_valid());
    }

    #[test]
    fn plugin_parsers_extend_the_chain() {
        use std::sync::Arc;

        let kairos = Kairos::new();
        assert!(!kairos.parse_utc("@1718461800").is_valid());
        let plugin = crate::plugin::Plugin::new("at-epoch", |host: &mut crate::plugin::PluginHost<'_>| {
            host.register_parser(Arc::new(|input: &str| {
                let seconds: i64 = input.strip_prefix('@')?.parse().ok()?;
                Some(crate::Instant::from_epoch_seconds(seconds))
            }));
            Ok(())
        });
        kairos.use_plugin(plugin).unwrap();
        let parsed = kairos.parse_utc("@1718461800");
        assert_eq!(parsed.epoch_millis(), Some(1_718_461_800_000));
        assert!(parsed.is_utc());
    }

    #[test]
    fn utc_now_is_never_invalid() {
        let kairos = Kairos::new();
        let now = kairos.utc_now();
        assert!(now.is_valid());
        assert!(now.is_utc());
    }
}
