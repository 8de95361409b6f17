//! Shared helpers: terminal setup and path display.

use anyhow::{Context, Result};
use crossterm::{
    cursor, execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{IsTerminal, stdout};
use std::path::Path;

use crate::common::logger::Log;

/// RAII guard that hands the terminal to the dial surface.
///
/// While alive the alternate screen and raw mode are active, the cursor is
/// hidden and log output is buffered. Dropping the guard restores the terminal
/// and prints anything that was logged in between.
pub struct TerminalGuard {
    active: bool,
}

impl TerminalGuard {
    /// Take over the terminal. Without a TTY on stdout this is a no-op guard.
    pub fn new() -> Result<Self> {
        if !stdout().is_terminal() {
            return Ok(Self { active: false });
        }

        Log::hold();
        terminal::enable_raw_mode().context("failed to enable raw mode")?;
        execute!(stdout(), EnterAlternateScreen, cursor::Hide)
            .context("failed to enter alternate screen")?;

        Ok(Self { active: true })
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.active {
            let _ = execute!(stdout(), cursor::Show, LeaveAlternateScreen);
            let _ = terminal::disable_raw_mode();
            Log::release();
        }
    }
}

/// Replace the home directory prefix with `~` for display.
pub fn private_path(path: &Path) -> String {
    if let Some(home) = dirs::home_dir()
        && let Ok(stripped) = path.strip_prefix(&home)
    {
        return format!("~/{}", stripped.display());
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_private_path_hides_home() {
        if let Some(home) = dirs::home_dir() {
            let path = home.join(".config").join("dialclock").join("dialclock.toml");
            assert_eq!(private_path(&path), "~/.config/dialclock/dialclock.toml");
        }
    }

    #[test]
    fn test_private_path_leaves_other_paths() {
        let path = PathBuf::from("/etc/dialclock.toml");
        assert_eq!(private_path(&path), "/etc/dialclock.toml");
    }
}
