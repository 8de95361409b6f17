//! Core application logic: the dial model and the frame loop.
//!
//! - [`rotation`] turns values into continuously accumulated angles.
//! - [`dial`] reads values and labels from the clock for each dial kind.
//! - [`layout`] places labels around a ring.
//! - [`board`] runs the layout and update phases over all dials.
//!
//! The [`Core`] struct owns the board, the [`AngleLedger`] and the surface, and
//! runs one update per frame until it is told to stop.

pub mod board;
pub mod dial;
pub mod layout;
pub mod locale;
pub mod rotation;

use anyhow::Result;
use std::sync::atomic::Ordering;
use std::sync::mpsc::TryRecvError;

use crate::{
    common::{logger::Log, utils},
    config::{self, Config},
    core::{board::DialBoard, dial::ClockFields, rotation::AngleLedger},
    io::signals::{SignalMessage, SignalState},
    surface::DialSurface,
    time_source,
};

/// Calendar fields of the current instant, in the configured display timezone.
pub fn current_fields(config: &Config) -> ClockFields {
    let now = time_source::now();
    match config.timezone() {
        Some(tz) => ClockFields::from_datetime(&now.with_timezone(&tz)),
        None => ClockFields::from_datetime(&now),
    }
}

/// Parameters for creating a Core instance.
pub(crate) struct CoreParams {
    pub surface: Box<dyn DialSurface>,
    pub config: Config,
    pub signal_state: SignalState,
    pub debug_enabled: bool,
}

/// The frame loop and everything it keeps between frames.
pub(crate) struct Core {
    surface: Box<dyn DialSurface>,
    config: Config,
    signal_state: SignalState,
    debug_enabled: bool,
    board: DialBoard,
    ledger: AngleLedger,
}

impl Core {
    pub fn new(params: CoreParams) -> Self {
        let board = DialBoard::from_config(&params.config);
        Self {
            surface: params.surface,
            config: params.config,
            signal_state: params.signal_state,
            debug_enabled: params.debug_enabled,
            board,
            ledger: AngleLedger::new(),
        }
    }

    /// Lay the dials out and run frames until a shutdown is requested.
    pub fn execute(mut self) -> Result<()> {
        if let Some(custom_dir) = config::get_custom_config_dir() {
            log_block_start!("Base directory: {}", utils::private_path(&custom_dir));
        }

        log_block_start!(
            "Showing {} dials on the {} surface",
            self.board.dials().len(),
            self.surface.name()
        );
        if self.debug_enabled {
            log_pipe!();
            log_debug!("Label locale: {:?}", self.board.locale());
        }

        let fields = current_fields(&self.config);
        self.board
            .layout(&fields, &mut self.ledger, self.surface.as_mut())?;

        self.main_loop()?;

        log_block_start!("Shutting down dialclock...");
        Ok(())
    }

    fn main_loop(&mut self) -> Result<()> {
        let frame_interval = self.config.frame_interval();

        while self.signal_state.running.load(Ordering::SeqCst) && !time_source::simulation_ended()
        {
            if self.process_signals()? {
                break;
            }

            if self.surface.should_close()? {
                if self.debug_enabled {
                    log_pipe!();
                    log_debug!("Surface closed by user");
                }
                break;
            }

            let fields = current_fields(&self.config);
            self.board
                .update(&fields, &mut self.ledger, self.surface.as_mut())?;
            self.surface.present()?;

            time_source::sleep(frame_interval);
        }

        Ok(())
    }

    /// Drain pending messages. Returns true when the loop should stop.
    fn process_signals(&mut self) -> Result<bool> {
        loop {
            match self.signal_state.signal_receiver.try_recv() {
                Ok(SignalMessage::Reload) => self.handle_config_reload()?,
                Ok(SignalMessage::Shutdown) => {
                    self.signal_state.running.store(false, Ordering::SeqCst);
                    return Ok(true);
                }
                Err(TryRecvError::Empty) => return Ok(false),
                // The sender half lives in SignalState, so this only happens on teardown
                Err(TryRecvError::Disconnected) => return Ok(false),
            }
        }
    }

    /// Re-read the configuration and rebuild the dials.
    ///
    /// Dials that keep their id keep their accumulated angle. A configuration
    /// that fails to load leaves the current dials running.
    fn handle_config_reload(&mut self) -> Result<()> {
        let new_config = match Config::load() {
            Ok(config) => config,
            Err(e) => {
                log_pipe!();
                log_error!("Failed to reload configuration: {e:#}");
                log_indented!("Keeping the previous configuration");
                return Ok(());
            }
        };

        log_block_start!("Configuration reloaded");
        if self.debug_enabled {
            new_config.log_config();
        }

        Log::set_display_timezone(new_config.timezone());
        self.board = DialBoard::from_config(&new_config);
        self.ledger.retain_dials(self.board.dial_ids());
        self.config = new_config;

        self.surface.clear()?;
        let fields = current_fields(&self.config);
        self.board
            .layout(&fields, &mut self.ledger, self.surface.as_mut())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DialSpec, Marker};
    use crate::surface::MockDialSurface;
    use serial_test::serial;
    use tempfile::tempdir;

    fn config_with(kinds: &[&str]) -> Config {
        Config {
            frame_interval: Some(crate::common::constants::MINIMUM_FRAME_INTERVAL),
            dials: kinds
                .iter()
                .map(|kind| DialSpec {
                    kind: Some(Marker::from(*kind)),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }

    fn permissive_surface(surface: &mut MockDialSurface) {
        surface.expect_name().return_const("mock");
        surface.expect_set_rotation().returning(|_, _| Ok(()));
        surface.expect_set_active().returning(|_, _, _| Ok(()));
    }

    #[test]
    fn test_runs_frames_until_surface_closes() {
        let mut surface = MockDialSurface::new();
        permissive_surface(&mut surface);
        surface.expect_mount().times(2).returning(|_, _, _| Ok(()));
        surface.expect_clear().never();
        surface.expect_present().times(2).returning(|| Ok(()));

        let mut closes = 0;
        surface.expect_should_close().returning(move || {
            closes += 1;
            Ok(closes > 2)
        });

        let core = Core::new(CoreParams {
            surface: Box::new(surface),
            config: config_with(&["seconds", "minutes"]),
            signal_state: SignalState::detached(),
            debug_enabled: false,
        });
        assert!(core.execute().is_ok());
    }

    #[test]
    fn test_shutdown_message_stops_before_any_frame() {
        let mut surface = MockDialSurface::new();
        permissive_surface(&mut surface);
        surface.expect_mount().times(1).returning(|_, _, _| Ok(()));
        surface.expect_present().never();
        surface.expect_should_close().never();

        let signal_state = SignalState::detached();
        signal_state
            .signal_sender
            .send(SignalMessage::Shutdown)
            .unwrap();
        let running = signal_state.running.clone();

        let core = Core::new(CoreParams {
            surface: Box::new(surface),
            config: config_with(&["hours"]),
            signal_state,
            debug_enabled: false,
        });
        assert!(core.execute().is_ok());
        assert!(!running.load(Ordering::SeqCst));
    }

    #[test]
    #[serial]
    fn test_reload_rebuilds_dials_from_file() {
        let temp_dir = tempdir().unwrap();
        let original = std::env::var("XDG_CONFIG_HOME").ok();
        unsafe {
            std::env::set_var("XDG_CONFIG_HOME", temp_dir.path());
        }

        let mut surface = MockDialSurface::new();
        permissive_surface(&mut surface);
        // One ring from the initial config, then the seven default rings
        surface.expect_mount().times(8).returning(|_, _, _| Ok(()));
        surface.expect_clear().times(1).returning(|| Ok(()));
        surface.expect_should_close().returning(|| Ok(true));

        let signal_state = SignalState::detached();
        signal_state.signal_sender.send(SignalMessage::Reload).unwrap();

        let core = Core::new(CoreParams {
            surface: Box::new(surface),
            config: config_with(&["seconds"]),
            signal_state,
            debug_enabled: false,
        });
        let result = core.execute();

        unsafe {
            match original {
                Some(val) => std::env::set_var("XDG_CONFIG_HOME", val),
                None => std::env::remove_var("XDG_CONFIG_HOME"),
            }
        }

        assert!(result.is_ok());
    }
}
