//! `show`: print what every dial reads right now and exit.

use anyhow::Result;

use crate::common::logger::Log;
use crate::config::Config;
use crate::core::board::{DialBoard, DialReading};
use crate::core::dial::ClockFields;
use crate::core::rotation::AngleLedger;
use crate::surface::headless::HeadlessSurface;

/// Run one layout and one update of `config`'s dials at `fields`.
pub fn read_dials(config: &Config, fields: &ClockFields) -> Result<Vec<DialReading>> {
    let mut board = DialBoard::from_config(config);
    let mut ledger = AngleLedger::new();
    let mut surface = HeadlessSurface::new();

    board.layout(fields, &mut ledger, &mut surface)?;
    board.update(fields, &mut ledger, &mut surface)
}

pub fn handle_show_command(debug_enabled: bool) -> Result<()> {
    log_version!();

    let config = Config::load()?;
    if debug_enabled {
        config.log_config();
    }
    Log::set_display_timezone(config.timezone());

    let fields = crate::core::current_fields(&config);
    let readings = read_dials(&config, &fields)?;

    log_block_start!("Current readings:");
    for reading in &readings {
        log_indented!(
            "{:<14} {:<12} {:>3}/{:<3} {:>7.2}°",
            reading.dial_id,
            reading.label,
            reading.value,
            reading.divisions,
            reading.rotation.angle
        );
    }
    log_end!();
    Ok(())
}

pub fn display_help() {
    log_version!();
    log_block_start!("show - Print every dial's current reading");
    log_block_start!("Usage: dialclock show [OPTIONS]");
    log_block_start!("Description:");
    log_indented!("Reads the clock once and lists, for each configured dial, its");
    log_indented!("label, position out of its divisions and rotation angle.");
    log_block_start!("Options:");
    log_indented!("-c, --config <dir>  Use custom configuration directory");
    log_indented!("-d, --debug         Also print the loaded configuration");
    log_end!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DialSpec, Marker};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_read_dials_reports_labels_and_angles() {
        let config = Config {
            dials: ["month", "weekday", "fortnights", "seconds"]
                .iter()
                .map(|kind| DialSpec {
                    kind: Some(Marker::from(*kind)),
                    ..Default::default()
                })
                .collect(),
            locale: Some("en_US".to_string()),
            ..Default::default()
        };
        // A Sunday in July
        let fields = ClockFields::from_datetime(&Utc.with_ymd_and_hms(2021, 7, 4, 9, 30, 7).unwrap());

        let readings = read_dials(&config, &fields).unwrap();
        assert_eq!(readings.len(), 3);

        assert_eq!(readings[0].label, "July");
        assert!((readings[0].rotation.angle - 180.0).abs() < 1e-9);

        assert_eq!(readings[1].label, "Sunday");
        assert_eq!(readings[1].value, 0);

        assert_eq!(readings[2].label, "07");
        assert!((readings[2].rotation.angle - 42.0).abs() < 1e-9);
    }
}
