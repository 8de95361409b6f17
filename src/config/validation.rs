//! Validation of the global configuration values.
//!
//! Dial markers are not checked here; they are resolved one by one at layout
//! time so a single bad entry only disables its own dial.

use anyhow::Result;

use super::Config;
use crate::common::constants::*;
use crate::core::locale::parse_locale;

pub fn validate_config(config: &Config) -> Result<()> {
    if let Some(interval) = config.frame_interval
        && !(MINIMUM_FRAME_INTERVAL..=MAXIMUM_FRAME_INTERVAL).contains(&interval)
    {
        anyhow::bail!(
            "frame_interval ({} ms) must be between {} and {} milliseconds",
            interval,
            MINIMUM_FRAME_INTERVAL,
            MAXIMUM_FRAME_INTERVAL
        );
    }

    if let Some(spacing) = config.ring_spacing
        && !(MINIMUM_RING_SPACING..=MAXIMUM_RING_SPACING).contains(&spacing)
    {
        anyhow::bail!(
            "ring_spacing ({}) must be between {} and {} cells",
            spacing,
            MINIMUM_RING_SPACING,
            MAXIMUM_RING_SPACING
        );
    }

    if let Some(tz) = config.timezone.as_deref()
        && tz.parse::<chrono_tz::Tz>().is_err()
    {
        anyhow::bail!("timezone '{}' is not a known IANA timezone", tz);
    }

    // An unknown locale is not fatal, labels fall back to English
    if let Some(locale) = config.locale.as_deref()
        && parse_locale(locale).is_none()
    {
        log_warning!(
            "locale '{}' is not supported, labels will use {}",
            locale,
            DEFAULT_LOCALE
        );
    }

    if config.dials.is_empty() {
        log_warning!("No [[dial]] entries configured, nothing will be drawn");
    }

    Ok(())
}
