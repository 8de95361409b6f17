//! Writing the default `dialclock.toml`.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::common::constants::*;
use crate::common::utils::private_path;
use crate::core::dial::DialKind;

/// Create the default configuration file at `path`, declaring all seven dials
/// outermost first.
pub fn create_default_config(path: &PathBuf) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    fs::write(path, default_config_content())
        .with_context(|| format!("Failed to write default config to {}", private_path(path)))?;

    log_block_start!("Created default configuration");
    log_indented!("{}", private_path(path));

    Ok(())
}

/// Text of the default configuration file.
pub fn default_config_content() -> String {
    let mut builder = ConfigBuilder::new()
        .add_section("Display")
        .add_disabled_setting(
            "locale",
            &format!("\"{DEFAULT_LOCALE}\""),
            "Label language (unset = LC_ALL / LC_TIME / LANG)",
        )
        .add_disabled_setting(
            "timezone",
            "\"Europe/Paris\"",
            "IANA timezone shown by the dials (unset = local time)",
        )
        .add_setting(
            "frame_interval",
            &DEFAULT_FRAME_INTERVAL.to_string(),
            &format!(
                "Milliseconds between frames ({MINIMUM_FRAME_INTERVAL}-{MAXIMUM_FRAME_INTERVAL})"
            ),
        )
        .add_setting(
            "ring_spacing",
            &DEFAULT_RING_SPACING.to_string(),
            &format!("Cells between rings ({MINIMUM_RING_SPACING}-{MAXIMUM_RING_SPACING})"),
        );

    // Outer rings hold the longer labels
    let order = [
        DialKind::Year,
        DialKind::Month,
        DialKind::Weekday,
        DialKind::DayOfMonth,
        DialKind::Hours,
        DialKind::Minutes,
        DialKind::Seconds,
    ];
    for kind in order {
        builder = builder.add_table("dial").add_setting(
            "kind",
            &format!("\"{}\"", kind.as_str()),
            "seconds, minutes, hours, day-of-month, month, year, weekday",
        );
        if kind == DialKind::DayOfMonth {
            builder = builder.add_setting(
                "divisions",
                "31",
                "Fixed slot count (unset = days in the current month)",
            );
        }
    }

    builder.build()
}

/// Aligned TOML writer for hand-readable config files.
struct ConfigBuilder {
    entries: Vec<ConfigEntry>,
}

enum ConfigEntry {
    Section(String),
    Table(String),
    Setting { line: String, comment: String },
}

impl ConfigBuilder {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn add_section(mut self, title: &str) -> Self {
        self.entries.push(ConfigEntry::Section(format!("#[{title}]")));
        self
    }

    fn add_table(mut self, name: &str) -> Self {
        self.entries.push(ConfigEntry::Table(format!("[[{name}]]")));
        self
    }

    fn add_setting(mut self, key: &str, value: &str, comment: &str) -> Self {
        self.entries.push(ConfigEntry::Setting {
            line: format!("{key} = {value}"),
            comment: format!("# {comment}"),
        });
        self
    }

    /// A setting shown as an example but commented out.
    fn add_disabled_setting(mut self, key: &str, value: &str, comment: &str) -> Self {
        self.entries.push(ConfigEntry::Setting {
            line: format!("#{key} = {value}"),
            comment: format!("# {comment}"),
        });
        self
    }

    fn build(self) -> String {
        let max_width = self
            .entries
            .iter()
            .filter_map(|entry| match entry {
                ConfigEntry::Setting { line, .. } => Some(line.len()),
                _ => None,
            })
            .max()
            .unwrap_or(0)
            + 1;

        let mut result = Vec::new();
        for (i, entry) in self.entries.into_iter().enumerate() {
            match entry {
                ConfigEntry::Section(title) | ConfigEntry::Table(title) => {
                    if i > 0 {
                        result.push(String::new());
                    }
                    result.push(title);
                }
                ConfigEntry::Setting { line, comment } => {
                    let padding = " ".repeat(max_width - line.len());
                    result.push(format!("{line}{padding}{comment}"));
                }
            }
        }

        result.push(String::new());
        result.join("\n")
    }
}
