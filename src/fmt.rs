//! The token-driven formatter.
//!
//! Templates mix literal escape blocks (`[...]`, passed through
//! verbatim), locale format shortcuts (`L`, `LT`, ...), and the token
//! vocabulary below. Tokens match longest-first, so `YYYY` wins over
//! `YY`; the combined matcher for a vocabulary is compiled once and kept
//! in a bounded LRU keyed by the vocabulary itself, which is how plugin
//! token extensions get their own matcher without recompiling per call.
//!
//! | Token | Output                        |
//! |-------|-------------------------------|
//! | YYYY / YY | 4-digit / 2-digit year    |
//! | MMMM / MMM / MM / M | month name, short name, padded, plain |
//! | Do / DD / D | ordinal / padded / plain day of month |
//! | dddd / ddd | weekday name / short name |
//! | HH / H / hh / h | 24h and 12h hours   |
//! | mm / m / ss / s | minutes and seconds |
//! | SSS / SS / S | milli / centi / deci-seconds |
//! | A / a | meridiem, upper and lower     |
//! | Q | quarter                           |
//! | ww / w | ISO week, padded and plain   |
//! | DDDD / DDD | day of year, padded and plain |
//! | x / X | epoch milliseconds / seconds  |
//! | Z / ZZ | offset `+05:00` / `+0500`    |
//!
//! An invalid instant formats as the literal string `Invalid Date`.

use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::{
    cache::LruCache,
    components::Instant,
    error::KairosError,
    iso::IsoDateTime,
    locale::Locale,
    KairosResult,
};

/// A plugin-supplied token producer.
pub type TokenFn = Arc<dyn Fn(&Instant, &Locale) -> String + Send + Sync>;

/// The built-in token vocabulary.
const BASE_TOKENS: &[&str] = &[
    "YYYY", "YY", "MMMM", "MMM", "MM", "M", "Do", "DD", "D", "dddd", "ddd", "HH", "H", "hh",
    "h", "mm", "m", "ss", "s", "SSS", "SS", "S", "A", "a", "Q", "w", "ww", "DDD", "DDDD", "x",
    "X", "Z", "ZZ",
];

/// Default number of compiled matchers kept around.
const MATCHER_CACHE_CAPACITY: usize = 16;

static SHORTCUT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    // Escape blocks first so a literal `[L]` survives expansion.
    Regex::new(r"(\[[^\]]*\])|(LTS|LLLL|LLL|LL|LT|L)")
        .unwrap_or_else(|_| unreachable!("the shortcut pattern is statically valid"))
});

/// The formatter: a token vocabulary plus its cached compiled matchers.
pub struct Formatter {
    matchers: Mutex<LruCache<String, Regex>>,
    extensions: Vec<(String, TokenFn)>,
}

impl core::fmt::Debug for Formatter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Formatter")
            .field(
                "extensions",
                &self
                    .extensions
                    .iter()
                    .map(|(token, _)| token.as_str())
                    .collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            matchers: Mutex::new(
                LruCache::try_new(MATCHER_CACHE_CAPACITY).unwrap_or_else(|_| unreachable!()),
            ),
            extensions: Vec::new(),
        }
    }

    /// Registers a plugin token. Extension tokens take precedence over
    /// built-ins of the same spelling.
    pub fn register_token(
        &mut self,
        token: impl Into<String>,
        producer: TokenFn,
    ) -> KairosResult<()> {
        let token = token.into();
        if token.is_empty() || !token.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(KairosError::configuration()
                .with_message("format tokens must be non-empty and alphanumeric."));
        }
        self.extensions.retain(|(existing, _)| *existing != token);
        self.extensions.push((token, producer));
        Ok(())
    }

    /// Formats an instant against a template with the given locale.
    #[must_use]
    pub fn format(&self, instant: &Instant, template: &str, locale: &Locale) -> String {
        let Some(fields) = instant.fields() else {
            return String::from("Invalid Date");
        };
        let offset_minutes = instant.utc_offset_minutes().unwrap_or(0);
        let expanded = expand_shortcuts(template, locale);
        let matcher = self.matcher();
        matcher
            .replace_all(&expanded, |captures: &Captures<'_>| {
                if let Some(literal) = captures.get(1) {
                    let inner = literal.as_str();
                    return inner[1..inner.len() - 1].to_string();
                }
                let token = &captures[2];
                if let Some((_, producer)) =
                    self.extensions.iter().find(|(name, _)| name == token)
                {
                    return producer(instant, locale);
                }
                produce(token, instant, fields, offset_minutes, locale)
            })
            .into_owned()
    }

    /// Fetches (or compiles and caches) the matcher for the current
    /// vocabulary.
    fn matcher(&self) -> Regex {
        let mut tokens: Vec<&str> = BASE_TOKENS
            .iter()
            .copied()
            .chain(self.extensions.iter().map(|(token, _)| token.as_str()))
            .collect();
        // Longest first so YYYY matches before YY; ties lexicographic
        // for a deterministic cache key.
        tokens.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        tokens.dedup();
        let vocabulary = tokens.join("|");

        if let Ok(mut cache) = self.matchers.lock() {
            if let Some(matcher) = cache.get(&vocabulary) {
                return matcher.clone();
            }
        }
        let escaped: Vec<String> = tokens.iter().map(|token| regex::escape(token)).collect();
        let pattern = format!(r"(\[[^\]]*\])|({})", escaped.join("|"));
        let matcher =
            Regex::new(&pattern).unwrap_or_else(|_| unreachable!("tokens are escaped"));
        if let Ok(mut cache) = self.matchers.lock() {
            cache.put(vocabulary, matcher.clone());
        }
        matcher
    }
}

/// Expands locale format shortcuts outside escape blocks.
fn expand_shortcuts(template: &str, locale: &Locale) -> String {
    SHORTCUT_PATTERN
        .replace_all(template, |captures: &Captures<'_>| {
            if let Some(literal) = captures.get(1) {
                return literal.as_str().to_string();
            }
            let token = &captures[2];
            locale
                .shortcut(token)
                .map_or_else(|| token.to_string(), str::to_string)
        })
        .into_owned()
}

fn produce(
    token: &str,
    instant: &Instant,
    fields: IsoDateTime,
    offset_minutes: i32,
    locale: &Locale,
) -> String {
    let date = fields.date;
    let time = fields.time;
    let hour12 = (time.hour + 11) % 12 + 1;
    match token {
        "YYYY" => format!("{:04}", date.year),
        "YY" => format!("{:02}", date.year.rem_euclid(100)),
        "MMMM" => locale.months[usize::from(date.month) - 1].clone(),
        "MMM" => locale.months_short[usize::from(date.month) - 1].clone(),
        "MM" => format!("{:02}", date.month),
        "M" => date.month.to_string(),
        "Do" => (locale.ordinal)(u16::from(date.day)),
        "DD" => format!("{:02}", date.day),
        "D" => date.day.to_string(),
        "dddd" => locale.weekdays[usize::from(date.weekday())].clone(),
        "ddd" => locale.weekdays_short[usize::from(date.weekday())].clone(),
        "HH" => format!("{:02}", time.hour),
        "H" => time.hour.to_string(),
        "hh" => format!("{hour12:02}"),
        "h" => hour12.to_string(),
        "mm" => format!("{:02}", time.minute),
        "m" => time.minute.to_string(),
        "ss" => format!("{:02}", time.second),
        "s" => time.second.to_string(),
        "SSS" => format!("{:03}", time.millisecond),
        "SS" => format!("{:02}", time.millisecond / 10),
        "S" => (time.millisecond / 100).to_string(),
        "A" => (locale.meridiem)(time.hour, time.minute, false),
        "a" => (locale.meridiem)(time.hour, time.minute, true),
        "Q" => ((date.month - 1) / 3 + 1).to_string(),
        "ww" => format!("{:02}", date.iso_week().1),
        "w" => date.iso_week().1.to_string(),
        "DDDD" => format!("{:03}", date.day_of_year()),
        "DDD" => date.day_of_year().to_string(),
        "x" => instant.epoch_millis().unwrap_or_default().to_string(),
        "X" => instant.epoch_seconds().unwrap_or_default().to_string(),
        "Z" => format_offset(offset_minutes, true),
        "ZZ" => format_offset(offset_minutes, false),
        _ => token.to_string(),
    }
}

fn format_offset(minutes: i32, with_colon: bool) -> String {
    let sign = if minutes < 0 { '-' } else { '+' };
    let magnitude = minutes.abs();
    if with_colon {
        format!("{sign}{:02}:{:02}", magnitude / 60, magnitude % 60)
    } else {
        format!("{sign}{:02}{:02}", magnitude / 60, magnitude % 60)
    }
}
