//! Application-wide constants: defaults, validation limits and exit codes.

// # Application Defaults

/// Milliseconds between two frames of the update phase.
pub const DEFAULT_FRAME_INTERVAL: u64 = 50;

/// Terminal cells between two neighbouring rings.
pub const DEFAULT_RING_SPACING: u16 = 2;

/// Locale used when neither the config nor the environment names a usable one.
pub const DEFAULT_LOCALE: &str = "en_US";

/// Simulation speed when `simulate` is given no multiplier (one minute per second).
pub const DEFAULT_SIMULATION_MULTIPLIER: f64 = 60.0;

// # Validation Limits

pub const MINIMUM_FRAME_INTERVAL: u64 = 10;
pub const MAXIMUM_FRAME_INTERVAL: u64 = 1000;

pub const MINIMUM_RING_SPACING: u16 = 1;
pub const MAXIMUM_RING_SPACING: u16 = 10;

/// Upper bound for the `divisions` marker of a single dial.
pub const MAXIMUM_DIVISIONS: u32 = 360;

pub const MINIMUM_SIMULATION_MULTIPLIER: f64 = 0.1;
pub const MAXIMUM_SIMULATION_MULTIPLIER: f64 = 3600.0;

/// Most simulated time one frame may advance, kept under half a turn of the
/// seconds dial so it never takes the short way backwards.
pub const MAXIMUM_SIMULATED_FRAME_STEP: std::time::Duration =
    std::time::Duration::from_secs(20);

// # Dial Geometry

pub const DEGREES_IN_CIRCLE: f64 = 360.0;

/// First year shown on the year dial; the dial covers `YEAR_DIAL_BASE..=YEAR_DIAL_BASE + 100`.
pub const YEAR_DIAL_BASE: i32 = 2000;

/// Radius, in rows, of the innermost ring when no `radius` is declared.
pub const BASE_RADIUS: u16 = 3;

/// Terminal cells are roughly twice as tall as they are wide.
pub const CELL_ASPECT_RATIO: f64 = 2.0;

// # Exit Codes

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;

#[cfg(test)]
pub mod test_constants {
    pub const TEST_LOCALE: &str = "en_US";
    pub const TEST_TIMEZONE: &str = "Europe/Paris";
    pub const TEST_FRAME_INTERVAL: u64 = 100;
}
