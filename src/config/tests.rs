use super::builder::default_config_content;
use super::validation::validate_config;
use super::*;
use crate::common::constants::test_constants::*;
use crate::core::board::DialBoard;
use crate::core::dial::{Dial, DialError, DialKind};
use serial_test::serial;
use std::fs;
use tempfile::tempdir;

fn parse(content: &str) -> Config {
    toml::from_str(content).unwrap()
}

#[test]
fn test_parse_full_config() {
    let config = parse(&format!(
        r#"
locale = "{TEST_LOCALE}"
timezone = "{TEST_TIMEZONE}"
frame_interval = {TEST_FRAME_INTERVAL}
ring_spacing = 3

[[dial]]
kind = "seconds"
divisions = 60

[[dial]]
kind = "days"
id = "calendar-day"
radius = 7
"#
    ));

    assert_eq!(config.locale.as_deref(), Some(TEST_LOCALE));
    assert_eq!(config.timezone(), Some(chrono_tz::Europe::Paris));
    assert_eq!(
        config.frame_interval(),
        std::time::Duration::from_millis(TEST_FRAME_INTERVAL)
    );
    assert_eq!(config.ring_spacing(), 3);
    assert_eq!(config.dials.len(), 2);
    assert_eq!(config.dials[0].divisions, Some(Marker::Count(60)));
    assert_eq!(config.dials[1].id, Some(Marker::from("calendar-day")));
    assert_eq!(config.dials[1].radius, Some(Marker::Count(7)));
    assert!(validate_config(&config).is_ok());
}

#[test]
fn test_defaults_when_unset() {
    let config = parse("");
    assert_eq!(
        config.frame_interval(),
        std::time::Duration::from_millis(DEFAULT_FRAME_INTERVAL)
    );
    assert_eq!(config.ring_spacing(), DEFAULT_RING_SPACING);
    assert_eq!(config.timezone(), None);
    assert!(config.dials.is_empty());
}

#[test]
fn test_malformed_markers_still_parse() {
    let config = parse(
        r#"
[[dial]]
kind = "fortnights"

[[dial]]
divisions = "sixty"

[[dial]]
kind = "hours"
divisions = "24"
"#,
    );

    assert_eq!(config.dials.len(), 3);
    assert!(validate_config(&config).is_ok());

    assert_eq!(
        Dial::from_spec(&config.dials[0]),
        Err(DialError::UnrecognizedKind("fortnights".to_string()))
    );
    assert_eq!(Dial::from_spec(&config.dials[1]), Err(DialError::MissingKind));
    assert_eq!(
        Dial::from_spec(&config.dials[2]).map(|d| d.kind),
        Ok(DialKind::Hours)
    );
}

#[test]
fn test_mistyped_markers_only_drop_their_dial() {
    for bad_dial in [
        "kind = \"hours\"\ndivisions = 24.5",
        "kind = \"hours\"\nradius = \"big\"",
        "kind = \"hours\"\nradius = -1",
        "kind = 5",
        "kind = \"hours\"\nid = [1, 2]",
    ] {
        let content = format!("[[dial]]\nkind = \"seconds\"\n\n[[dial]]\n{bad_dial}\n");
        let config: Config = toml::from_str(&content)
            .unwrap_or_else(|e| panic!("config with `{bad_dial}` was rejected: {e}"));
        assert!(validate_config(&config).is_ok());

        let board = DialBoard::from_config(&config);
        let ids: Vec<&str> = board.dial_ids().collect();
        assert_eq!(ids, ["seconds"], "for `{bad_dial}`");
    }
}

#[test]
fn test_validation_frame_interval_range() {
    let mut config = parse("");
    config.frame_interval = Some(MINIMUM_FRAME_INTERVAL);
    assert!(validate_config(&config).is_ok());
    config.frame_interval = Some(MAXIMUM_FRAME_INTERVAL);
    assert!(validate_config(&config).is_ok());

    config.frame_interval = Some(MINIMUM_FRAME_INTERVAL - 1);
    assert!(validate_config(&config).is_err());
    config.frame_interval = Some(MAXIMUM_FRAME_INTERVAL + 1);
    assert!(validate_config(&config).is_err());
}

#[test]
fn test_validation_ring_spacing_range() {
    let mut config = parse("");
    config.ring_spacing = Some(0);
    assert!(validate_config(&config).is_err());
    config.ring_spacing = Some(MAXIMUM_RING_SPACING + 1);
    assert!(validate_config(&config).is_err());
}

#[test]
fn test_validation_rejects_unknown_timezone() {
    let mut config = parse("");
    config.timezone = Some("Mars/Olympus_Mons".to_string());
    let err = validate_config(&config).unwrap_err();
    assert!(err.to_string().contains("Mars/Olympus_Mons"));
}

#[test]
fn test_validation_tolerates_unknown_locale() {
    let mut config = parse("");
    config.locale = Some("xx_NOPE".to_string());
    assert!(validate_config(&config).is_ok());
}

#[test]
fn test_default_config_declares_every_kind() {
    let config = parse(&default_config_content());
    assert!(validate_config(&config).is_ok());
    assert_eq!(config.locale, None);
    assert_eq!(config.timezone, None);

    let kinds: Vec<DialKind> = config
        .dials
        .iter()
        .map(|spec| Dial::from_spec(spec).unwrap().kind)
        .collect();
    for kind in DialKind::ALL {
        assert!(kinds.contains(&kind), "default config lacks {kind}");
    }
}

#[test]
fn test_load_from_path_reports_parse_errors() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("dialclock.toml");
    fs::write(&path, "frame_interval = \"fast\"").unwrap();

    let err = load_from_path(&path).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to parse config"));
}

#[test]
fn test_load_from_missing_path_fails() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("missing.toml");
    assert!(load_from_path(&path).is_err());
}

#[test]
#[serial]
fn test_load_creates_default_config() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("dialclock").join("dialclock.toml");

    let original = std::env::var("XDG_CONFIG_HOME").ok();
    unsafe {
        std::env::set_var("XDG_CONFIG_HOME", temp_dir.path());
    }

    let result = Config::load();

    unsafe {
        match original {
            Some(val) => std::env::set_var("XDG_CONFIG_HOME", val),
            None => std::env::remove_var("XDG_CONFIG_HOME"),
        }
    }

    let config = result.unwrap();
    assert!(config_path.exists());
    assert_eq!(config.dials.len(), DialKind::ALL.len());
}
