//! Hot reload: watch `dialclock.toml` and ask the frame loop to rebuild the dials.

use anyhow::{Context, Result};
use notify::{
    Config as NotifyConfig, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher,
};
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::thread;
use std::time::{Duration, Instant};

use crate::common::utils::private_path;
use crate::io::signals::SignalMessage;

/// Editors often write a file in several steps; collapse events closer than this.
const DEBOUNCE_MS: u64 = 500;

/// Watches the configuration file and posts [`SignalMessage::Reload`] on change.
pub struct ConfigWatcher {
    signal_sender: Sender<SignalMessage>,
    debug_enabled: bool,
    config_path: PathBuf,
}

impl ConfigWatcher {
    pub fn new(
        config_path: PathBuf,
        signal_sender: Sender<SignalMessage>,
        debug_enabled: bool,
    ) -> Self {
        Self {
            signal_sender,
            debug_enabled,
            config_path,
        }
    }

    /// Spawn the watcher thread.
    ///
    /// The parent directory is watched rather than the file itself, which
    /// survives editors that replace the file on save.
    pub fn start(self) -> Result<()> {
        let parent = self
            .config_path
            .parent()
            .map(|p| p.to_path_buf())
            .context("Configuration file has no parent directory")?;
        let file_name: OsString = self
            .config_path
            .file_name()
            .map(|n| n.to_os_string())
            .context("Configuration path has no file name")?;

        let (tx, rx) = std::sync::mpsc::channel();
        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| {
                if let Ok(event) = res
                    && matches!(
                        event.kind,
                        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
                    )
                {
                    let _ = tx.send(event);
                }
            },
            NotifyConfig::default(),
        )
        .context("Failed to create file watcher")?;

        watcher
            .watch(&parent, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch directory: {}", private_path(&parent)))?;

        if self.debug_enabled {
            log_pipe!();
            log_debug!("Watching {} for changes", private_path(&self.config_path));
        }

        let signal_sender = self.signal_sender;
        let debug_enabled = self.debug_enabled;

        thread::spawn(move || {
            // The watcher stops when dropped, so it lives in this thread
            let _watcher = watcher;
            let mut last_reload: Option<Instant> = None;

            for event in rx {
                let touches_config = event
                    .paths
                    .iter()
                    .any(|path| path.file_name() == Some(file_name.as_os_str()));
                if !touches_config {
                    continue;
                }

                if last_reload.is_some_and(|t| t.elapsed() < Duration::from_millis(DEBOUNCE_MS)) {
                    continue;
                }

                // Let the editor finish writing before the file is read
                thread::sleep(Duration::from_millis(DEBOUNCE_MS));
                last_reload = Some(Instant::now());

                if debug_enabled {
                    log_pipe!();
                    log_debug!("Configuration file changed, requesting reload");
                }

                if signal_sender.send(SignalMessage::Reload).is_err() {
                    // Main loop is gone
                    break;
                }
            }
        });

        Ok(())
    }
}

/// Start watching `config_path` for the running clock.
pub fn start_config_watcher(
    config_path: PathBuf,
    signal_sender: Sender<SignalMessage>,
    debug_enabled: bool,
) -> Result<()> {
    ConfigWatcher::new(config_path, signal_sender, debug_enabled).start()
}
