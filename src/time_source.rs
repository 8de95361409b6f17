//! Where the frame loop reads the time.
//!
//! Normally this is the system clock. The `simulate` command installs a
//! [`SimulatedTimeSource`] instead, which runs an accelerated clock from a
//! start to an end time so dial wrap-arounds (midnight, month ends, New Year)
//! can be watched without waiting for them.

use chrono::{DateTime, Duration as ChronoDuration, Local, NaiveDateTime, TimeZone};
use once_cell::sync::OnceCell;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration as StdDuration, Instant};

use crate::common::constants::MAXIMUM_SIMULATED_FRAME_STEP;

/// Global time source instance, defaults to RealTimeSource
static TIME_SOURCE: OnceCell<Arc<dyn TimeSource>> = OnceCell::new();

/// Trait for abstracting time operations
pub trait TimeSource: Send + Sync {
    /// Get the current time
    fn now(&self) -> DateTime<Local>;

    /// Sleep for the specified duration (or simulate it)
    fn sleep(&self, duration: StdDuration);

    /// Check if this is a simulated time source
    fn is_simulated(&self) -> bool;

    /// Check if simulation has ended (always false for real time)
    fn is_ended(&self) -> bool {
        false
    }
}

/// Real-time implementation that uses actual system time
pub struct RealTimeSource;

impl TimeSource for RealTimeSource {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn sleep(&self, duration: StdDuration) {
        std::thread::sleep(duration);
    }

    fn is_simulated(&self) -> bool {
        false
    }
}

/// Accelerated clock between two instants.
///
/// Simulated time follows real time scaled by the multiplier. Each call to
/// [`TimeSource::sleep`] waits `duration / multiplier` and then advances the
/// clock by the real time spent since the previous step, frame work included.
/// One step never exceeds [`MAXIMUM_SIMULATED_FRAME_STEP`] nor passes
/// `end_time`; frames that take too long slow the simulation down instead.
pub struct SimulatedTimeSource {
    start_time: DateTime<Local>,
    end_time: DateTime<Local>,
    /// Simulated seconds per real second
    time_multiplier: f64,
    progress: Mutex<Progress>,
}

struct Progress {
    elapsed: StdDuration,
    last_step: Instant,
}

impl SimulatedTimeSource {
    pub fn new(start_time: DateTime<Local>, end_time: DateTime<Local>, multiplier: f64) -> Self {
        Self {
            start_time,
            end_time,
            time_multiplier: if multiplier > 0.0 { multiplier } else { 1.0 },
            progress: Mutex::new(Progress {
                elapsed: StdDuration::ZERO,
                last_step: Instant::now(),
            }),
        }
    }

    fn progress(&self) -> MutexGuard<'_, Progress> {
        self.progress.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn time_after(&self, elapsed: StdDuration) -> DateTime<Local> {
        let elapsed = ChronoDuration::from_std(elapsed).unwrap_or(ChronoDuration::MAX);
        self.start_time
            .checked_add_signed(elapsed)
            .map_or(self.end_time, |t| t.min(self.end_time))
    }

    fn current_time(&self) -> DateTime<Local> {
        self.time_after(self.progress().elapsed)
    }

    /// Move the clock forward by the real time since the last step.
    fn step(&self) {
        let mut progress = self.progress();
        let remaining = (self.end_time - self.time_after(progress.elapsed))
            .to_std()
            .unwrap_or(StdDuration::ZERO);

        let advance = progress
            .last_step
            .elapsed()
            .mul_f64(self.time_multiplier)
            .min(MAXIMUM_SIMULATED_FRAME_STEP)
            .min(remaining);

        progress.elapsed += advance;
        progress.last_step = Instant::now();
    }
}

impl TimeSource for SimulatedTimeSource {
    fn now(&self) -> DateTime<Local> {
        self.current_time()
    }

    fn sleep(&self, duration: StdDuration) {
        if self.is_ended() {
            return;
        }

        std::thread::sleep(duration.div_f64(self.time_multiplier));
        self.step();
    }

    fn is_simulated(&self) -> bool {
        true
    }

    fn is_ended(&self) -> bool {
        self.current_time() >= self.end_time
    }
}

/// Initialize the global time source (call once at startup)
pub fn init_time_source(source: Arc<dyn TimeSource>) {
    TIME_SOURCE.set(source).ok();
}

/// Check if the time source has been initialized
pub fn is_initialized() -> bool {
    TIME_SOURCE.get().is_some()
}

fn source() -> &'static Arc<dyn TimeSource> {
    TIME_SOURCE.get_or_init(|| Arc::new(RealTimeSource))
}

/// Get the current time from the global time source
pub fn now() -> DateTime<Local> {
    source().now()
}

/// Sleep for the specified duration using the global time source
pub fn sleep(duration: StdDuration) {
    source().sleep(duration)
}

/// Check if we're running in simulation mode
pub fn is_simulated() -> bool {
    source().is_simulated()
}

/// Check if simulation has reached its end time (always false for real time)
pub fn simulation_ended() -> bool {
    source().is_ended()
}

/// Parse a datetime string in the format "YYYY-MM-DD HH:MM:SS" as local time
pub fn parse_datetime(s: &str) -> Result<DateTime<Local>, String> {
    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map_err(|e| format!("Invalid datetime format: {e}. Use YYYY-MM-DD HH:MM:SS"))?;
    Local
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| "Ambiguous or invalid local time".to_string())
}
