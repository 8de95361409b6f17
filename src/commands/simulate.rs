//! `simulate`: run the dials on an accelerated clock.
//!
//! This command only installs a [`SimulatedTimeSource`]; the normal run then
//! reads its time from it and stops when the end time is reached.

use anyhow::{Result, bail};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use std::sync::Arc;

use crate::common::constants::MAXIMUM_SIMULATED_FRAME_STEP;
use crate::common::logger::Log;
use crate::config::Config;
use crate::time_source::{self, SimulatedTimeSource};

/// Parse "YYYY-MM-DD HH:MM:SS" in the display timezone when one is configured.
fn parse_in_display_zone(s: &str, tz: Option<chrono_tz::Tz>) -> Result<DateTime<Local>, String> {
    match tz {
        None => time_source::parse_datetime(s),
        Some(tz) => {
            let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                .map_err(|e| format!("Invalid datetime format: {e}. Use YYYY-MM-DD HH:MM:SS"))?;
            tz.from_local_datetime(&naive)
                .single()
                .map(|t| t.with_timezone(&Local))
                .ok_or_else(|| format!("Ambiguous or invalid time in timezone {tz}"))
        }
    }
}

/// Install the simulated clock; the caller then runs the dials normally.
///
/// # Arguments
/// * `start_time` - Start time in format "YYYY-MM-DD HH:MM:SS"
/// * `end_time` - End time in format "YYYY-MM-DD HH:MM:SS"
/// * `multiplier` - Simulated seconds per real second
pub fn handle_simulate_command(
    start_time: &str,
    end_time: &str,
    multiplier: f64,
    debug_enabled: bool,
) -> Result<()> {
    // Times are entered as the dials will show them
    let display_tz = Config::load().ok().and_then(|config| config.timezone());

    let start = parse_in_display_zone(start_time, display_tz)
        .map_err(|e| anyhow::anyhow!("Invalid start time: {e}"))?;
    let end = parse_in_display_zone(end_time, display_tz)
        .map_err(|e| anyhow::anyhow!("Invalid end time: {e}"))?;

    if end <= start {
        bail!("End time must be after start time");
    }

    // Before any logging, so every line carries simulated timestamps
    time_source::init_time_source(Arc::new(SimulatedTimeSource::new(start, end, multiplier)));
    Log::set_display_timezone(display_tz);

    log_version!();
    log_block_start!("Simulation Mode");

    let duration = end.signed_duration_since(start);
    log_decorated!("Simulating from {start_time} to {end_time}");
    log_indented!(
        "Total simulated time: {} hours {} minutes",
        duration.num_hours(),
        duration.num_minutes() % 60
    );
    log_indented!(
        "Time acceleration: {}x (will complete in ~{:.1} seconds)",
        multiplier,
        duration.num_seconds() as f64 / multiplier
    );
    let frame_budget = MAXIMUM_SIMULATED_FRAME_STEP.as_secs_f64() / multiplier;
    if frame_budget < 1.0 {
        log_indented!(
            "Frames drawn slower than {:.1}ms stretch the run",
            frame_budget * 1000.0
        );
    }

    if debug_enabled {
        log_pipe!();
        log_debug!("Simulated time source initialized");
    }

    Ok(())
}

pub fn display_help() {
    log_version!();
    log_block_start!("simulate - Run the dials on an accelerated clock");
    log_block_start!("Usage: dialclock simulate <start> <end> [multiplier]");
    log_block_start!("Arguments:");
    log_indented!("start       \"YYYY-MM-DD HH:MM:SS\" in the configured timezone");
    log_indented!("end         \"YYYY-MM-DD HH:MM:SS\", after start");
    log_indented!("multiplier  Simulated seconds per real second, 0.1-3600 (default 60)");
    log_block_start!("Examples:");
    log_indented!("# Watch the seconds, minutes and hours dials roll over at New Year");
    log_indented!("dialclock simulate \"2026-12-31 23:59:30\" \"2027-01-01 00:00:30\" 2");
    log_pipe!();
    log_indented!("# Watch the day dial relabel when February ends");
    log_indented!("dialclock simulate \"2027-02-28 22:00:00\" \"2027-03-01 02:00:00\" 3600");
    log_end!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_in_display_zone() {
        let paris = parse_in_display_zone("2026-07-01 12:00:00", Some(chrono_tz::Europe::Paris)).unwrap();
        let utc = parse_in_display_zone("2026-07-01 10:00:00", Some(chrono_tz::UTC)).unwrap();
        assert_eq!(paris, utc);

        assert!(parse_in_display_zone("2026-07-01", None).is_err());
    }
}
