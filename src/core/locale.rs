//! Locale resolution and localized month/weekday names.

use chrono::{Locale, TimeZone, Utc};

use crate::common::constants::DEFAULT_LOCALE;

/// Environment variables consulted for the locale, in priority order.
const LOCALE_ENV_VARS: [&str; 3] = ["LC_ALL", "LC_TIME", "LANG"];

/// Turn `de-DE`, `de_DE.UTF-8` or `sr_RS@latin` into the `de_DE` form chrono knows.
pub fn normalize_locale_name(raw: &str) -> Option<String> {
    let name = raw
        .trim()
        .split(['.', '@'])
        .next()
        .unwrap_or_default()
        .replace('-', "_");

    if name.is_empty() || name == "C" || name == "POSIX" {
        None
    } else {
        Some(name)
    }
}

/// Parse a locale name, accepting the spellings of [`normalize_locale_name`].
pub fn parse_locale(raw: &str) -> Option<Locale> {
    let name = normalize_locale_name(raw)?;
    Locale::try_from(name.as_str()).ok()
}

/// Pick the locale used for dial labels.
///
/// The configured name wins, then the environment. Unknown names are reported
/// and fall back to `en_US`.
pub fn resolve_locale(configured: Option<&str>) -> Locale {
    if let Some(name) = configured {
        match parse_locale(name) {
            Some(locale) => return locale,
            None => {
                log_warning!("Unknown locale '{}', using {}", name, DEFAULT_LOCALE);
                return Locale::en_US;
            }
        }
    }

    LOCALE_ENV_VARS
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find_map(|value| parse_locale(&value))
        .unwrap_or(Locale::en_US)
}

/// Long month names, January first.
pub fn month_names(locale: Locale) -> Vec<String> {
    (1..=12)
        .filter_map(|month| Utc.with_ymd_and_hms(2021, month, 1, 12, 0, 0).single())
        .map(|date| date.format_localized("%B", locale).to_string())
        .collect()
}

/// Long weekday names, Sunday first.
pub fn weekday_names(locale: Locale) -> Vec<String> {
    // 2021-01-03 was a Sunday
    (3..=9)
        .filter_map(|day| Utc.with_ymd_and_hms(2021, 1, day, 12, 0, 0).single())
        .map(|date| date.format_localized("%A", locale).to_string())
        .collect()
}
