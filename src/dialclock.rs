//! Application coordinator that manages the complete lifecycle of dialclock.
//!
//! This module acquires the resources the frame loop needs and hands them to
//! [`Core`]:
//! - Configuration loading
//! - Signal handler setup and the config file watcher
//! - Terminal setup with an RAII guard
//! - Choosing the surface the dials are drawn on
//!
//! `Dialclock` uses a builder so the `simulate` command, which prints its own
//! header, can run the same lifecycle: `Dialclock::new(debug).without_headers().run()`.

use anyhow::{Context, Result};

use crate::{
    common::{logger::Log, utils::TerminalGuard},
    config::{self, Config},
    core::{Core, CoreParams},
    io::signals::setup_signal_handler,
    surface::{DialSurface, plain::PlainSurface, terminal::TerminalSurface},
};

/// Builder for configuring and running the dialclock application.
///
/// ```no_run
/// use dialclock::Dialclock;
///
/// # fn main() -> anyhow::Result<()> {
/// Dialclock::new(false).run()?;
/// # Ok(())
/// # }
/// ```
pub struct Dialclock {
    debug_enabled: bool,
    show_headers: bool,
}

impl Dialclock {
    pub fn new(debug_enabled: bool) -> Self {
        Self {
            debug_enabled,
            show_headers: true,
        }
    }

    /// Skip header display (the simulate command prints its own)
    pub fn without_headers(mut self) -> Self {
        self.show_headers = false;
        self
    }

    /// Show the dials until the user quits, a shutdown signal arrives or the
    /// simulated clock runs out.
    pub fn run(self) -> Result<()> {
        if self.show_headers {
            log_version!();
            if self.debug_enabled {
                log_pipe!();
                log_debug!("Debug mode enabled - showing detailed frame loop operations");
            }
        }

        // Configuration errors are reported before the terminal is taken over
        let config = Config::load().context("Configuration failed")?;
        config.log_config();
        Log::set_display_timezone(config.timezone());

        let signal_state = setup_signal_handler(self.debug_enabled)?;

        let config_path = config::get_config_path()?;
        if let Err(e) = config::start_config_watcher(
            config_path,
            signal_state.signal_sender.clone(),
            self.debug_enabled,
        ) {
            log_pipe!();
            log_warning!("Config file watching unavailable: {e}");
            log_indented!("Hot config reload disabled, use SIGUSR2 for manual reload");
        }

        // Without a terminal this guard does nothing and changes are logged instead
        let terminal = TerminalGuard::new().context("failed to initialize terminal features")?;
        let surface: Box<dyn DialSurface> = if terminal.is_active() {
            Box::new(TerminalSurface::new())
        } else {
            Box::new(PlainSurface::new())
        };

        let core = Core::new(CoreParams {
            surface,
            config,
            signal_state,
            debug_enabled: self.debug_enabled,
        });
        let result = core.execute();

        // Restore the terminal and flush held output before the closing line
        drop(terminal);
        log_end!();
        result
    }
}
