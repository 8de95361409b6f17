//! Configuration for dialclock.
//!
//! Settings live in `dialclock.toml`, searched in
//! `$XDG_CONFIG_HOME/dialclock/` (or the directory given with `--config`).
//! A commented default file is created on first start.
//!
//! ```toml
//! locale = "en_US"          # Label language; unset = LC_ALL / LC_TIME / LANG
//! timezone = "Europe/Paris" # IANA zone the dials show; unset = local time
//! frame_interval = 50       # Milliseconds between frames (10-1000)
//! ring_spacing = 2          # Cells between neighbouring rings (1-10)
//!
//! [[dial]]
//! kind = "seconds"          # seconds, minutes, hours, day-of-month, month, year, weekday
//! divisions = 60            # Optional position count
//! id = "seconds"            # Optional identity, defaults to the kind
//! radius = 15               # Optional ring radius in cells
//! ```
//!
//! Global values are validated strictly and reject the whole file. Each
//! `[[dial]]` entry is a declarative marker: a broken one only skips that dial
//! when the dials are laid out.

pub mod builder;
pub mod loading;
pub mod validation;
pub mod watcher;

use anyhow::Result;
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

use crate::common::constants::*;

pub use builder::create_default_config;
pub use loading::{get_config_path, get_custom_config_dir, load, load_from_path, set_config_dir};
pub use watcher::start_config_watcher;

/// A single `[[dial]]` value as written in the file.
///
/// Any TOML value is accepted here so a mistyped field only disables its own
/// dial when the marker is resolved.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum Marker {
    Count(i64),
    Text(String),
    Other(toml::Value),
}

impl Marker {
    /// Positive count the marker denotes, if it denotes one.
    pub fn count(&self) -> Option<u32> {
        match self {
            Marker::Count(n) => u32::try_from(*n).ok(),
            Marker::Text(text) => text.trim().parse().ok(),
            Marker::Other(_) => None,
        }
    }

    /// Text of a string marker.
    pub fn text(&self) -> Option<&str> {
        match self {
            Marker::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<&str> for Marker {
    fn from(text: &str) -> Self {
        Marker::Text(text.to_string())
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Marker::Count(n) => write!(f, "{n}"),
            Marker::Text(text) => f.write_str(text),
            Marker::Other(value) => write!(f, "{value}"),
        }
    }
}

/// One `[[dial]]` entry.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct DialSpec {
    pub kind: Option<Marker>,
    pub divisions: Option<Marker>,
    pub id: Option<Marker>,
    pub radius: Option<Marker>,
}

/// Contents of `dialclock.toml`.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct Config {
    pub locale: Option<String>,
    pub timezone: Option<String>,
    pub frame_interval: Option<u64>, // milliseconds
    pub ring_spacing: Option<u16>,   // cells
    #[serde(default, rename = "dial")]
    pub dials: Vec<DialSpec>,
}

impl Config {
    pub fn load() -> Result<Self> {
        load()
    }

    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        load_from_path(path)
    }

    pub fn get_config_path() -> Result<PathBuf> {
        get_config_path()
    }

    pub fn frame_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.frame_interval.unwrap_or(DEFAULT_FRAME_INTERVAL))
    }

    pub fn ring_spacing(&self) -> u16 {
        self.ring_spacing.unwrap_or(DEFAULT_RING_SPACING)
    }

    /// Parsed display timezone. Validation guarantees a set name parses.
    pub fn timezone(&self) -> Option<chrono_tz::Tz> {
        self.timezone.as_deref().and_then(|tz| tz.parse().ok())
    }

    pub fn log_config(&self) {
        log_block_start!("Loaded configuration");
        log_indented!(
            "Locale: {}",
            self.locale.as_deref().unwrap_or("from environment")
        );
        log_indented!(
            "Timezone: {}",
            self.timezone.as_deref().unwrap_or("local time")
        );
        log_indented!("Frame interval: {}ms", self.frame_interval().as_millis());
        log_indented!("Ring spacing: {} cells", self.ring_spacing());
        log_indented!("Dials declared: {}", self.dials.len());
        for spec in &self.dials {
            let kind = spec
                .kind
                .as_ref()
                .map_or_else(|| "<missing>".to_string(), |kind| kind.to_string());
            match &spec.divisions {
                Some(divisions) => log_indented!("  {} ({} divisions)", kind, divisions),
                None => log_indented!("  {}", kind),
            }
        }
    }
}

#[cfg(test)]
mod tests;
