//! Process signals.
//!
//! A background thread turns SIGINT, SIGTERM and SIGHUP into a shutdown and
//! SIGUSR2 into a configuration reload. Messages reach the frame loop through
//! the same channel the config watcher uses.

use anyhow::{Context, Result};
use signal_hook::{
    consts::signal::{SIGHUP, SIGINT, SIGTERM, SIGUSR2},
    iterator::Signals,
};
use std::{
    sync::Arc,
    sync::atomic::{AtomicBool, Ordering},
    sync::mpsc::{Receiver, Sender, channel},
    thread,
};

/// Requests delivered to the frame loop between frames.
#[derive(Debug, Clone, PartialEq)]
pub enum SignalMessage {
    /// Re-read the configuration and lay the dials out again
    Reload,
    /// Stop the frame loop
    Shutdown,
}

/// Channel and flag shared between the frame loop and its helper threads.
pub struct SignalState {
    /// Cleared when the loop should stop
    pub running: Arc<AtomicBool>,
    pub signal_receiver: Receiver<SignalMessage>,
    /// Cloned into the config watcher
    pub signal_sender: Sender<SignalMessage>,
}

impl SignalState {
    /// State with no OS signal handling attached, for commands and tests.
    pub fn detached() -> Self {
        let (signal_sender, signal_receiver) = channel();
        Self {
            running: Arc::new(AtomicBool::new(true)),
            signal_receiver,
            signal_sender,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Register the signal handlers and spawn the thread that forwards them.
pub fn setup_signal_handler(debug_enabled: bool) -> Result<SignalState> {
    let state = SignalState::detached();

    let mut signals = Signals::new([SIGINT, SIGTERM, SIGHUP, SIGUSR2])
        .context("failed to register signal handlers")?;

    let running = state.running.clone();
    let sender = state.signal_sender.clone();

    thread::spawn(move || {
        for sig in signals.forever() {
            match sig {
                SIGUSR2 => {
                    if debug_enabled {
                        log_pipe!();
                        log_debug!("Received SIGUSR2, reloading configuration");
                    }
                    if sender.send(SignalMessage::Reload).is_err() {
                        break;
                    }
                }
                _ => {
                    if debug_enabled {
                        log_pipe!();
                        log_debug!("Received signal {sig}, shutting down");
                    }
                    running.store(false, Ordering::SeqCst);
                    let _ = sender.send(SignalMessage::Shutdown);
                    break;
                }
            }
        }
    });

    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detached_state_starts_running() {
        let state = SignalState::detached();
        assert!(state.is_running());
        state.signal_sender.send(SignalMessage::Reload).unwrap();
        assert_eq!(state.signal_receiver.try_recv(), Ok(SignalMessage::Reload));
    }
}
