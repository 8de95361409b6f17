//! Structured logging with box-drawing output.
//!
//! Every message goes through [`write_output`], which sends it to one of three
//! places:
//!
//! - a log file, when `--log <file>` started a [`LoggerGuard`]
//! - an in-memory buffer, while the terminal surface owns the screen
//!   (see [`Log::hold`] and [`Log::release`])
//! - stdout otherwise
//!
//! ## Logging Conventions
//!
//! - **`log_block_start!`** opens a new conceptual block (`┃` spacer, then `┣ message`).
//! - **`log_decorated!`** continues a block (`┣ message`).
//! - **`log_indented!`** lists details under a block (`┃   message`).
//! - **`log_pipe!`** inserts an empty `┃` line, mostly before a semantic message.
//! - **`log_version!`** prints the `┏ dialclock vX.Y.Z ━━╸` header once at startup.
//! - **`log_end!`** prints the final `╹`.
//! - **`log_info!`, `log_warning!`, `log_error!`, `log_debug!`** carry a colored
//!   `[LEVEL]` tag.
//! - **`log_error_exit!`** closes the flow with `┗[ERROR]`.

use std::io::Write;
use std::sync::mpsc::{Sender, channel};
use std::sync::{Mutex, OnceLock};

// Timezone the dials are displayed in, used for simulation timestamps
static DISPLAY_TIMEZONE: Mutex<Option<chrono_tz::Tz>> = Mutex::new(None);

static LOG_CHANNEL: OnceLock<Option<Sender<LogMessage>>> = OnceLock::new();

// Some(buffer) while the screen belongs to the terminal surface
static HELD_OUTPUT: Mutex<Option<Vec<String>>> = Mutex::new(None);

enum LogMessage {
    Formatted(String),
    Shutdown,
}

/// Global logging controls.
pub struct Log;

impl Log {
    /// Record the configured display timezone so simulation timestamps match the dials.
    pub fn set_display_timezone(tz: Option<chrono_tz::Tz>) {
        if let Ok(mut current) = DISPLAY_TIMEZONE.lock() {
            *current = tz;
        }
    }

    fn display_timezone() -> Option<chrono_tz::Tz> {
        DISPLAY_TIMEZONE.lock().ok().and_then(|tz| *tz)
    }

    /// Start buffering output instead of printing it.
    ///
    /// Used while the alternate screen is active so log lines do not tear
    /// through the drawn dials. Has no effect when file logging is active.
    pub fn hold() {
        if let Ok(mut held) = HELD_OUTPUT.lock()
            && held.is_none()
        {
            *held = Some(Vec::new());
        }
    }

    /// Stop buffering and print everything collected since [`Log::hold`].
    pub fn release() {
        let pending = HELD_OUTPUT.lock().ok().and_then(|mut held| held.take());
        if let Some(lines) = pending {
            let mut stdout = std::io::stdout();
            for line in lines {
                let _ = stdout.write_all(line.as_bytes());
            }
            let _ = stdout.flush();
        }
    }

    /// Route all further output to `file_path`.
    pub fn start_file_logging(file_path: String) -> anyhow::Result<LoggerGuard> {
        let (tx, rx) = channel();

        LOG_CHANNEL
            .set(Some(tx.clone()))
            .map_err(|_| anyhow::anyhow!("Logger channel already initialized"))?;

        let handle = std::thread::spawn(move || {
            let mut file = std::fs::File::create(&file_path)?;

            loop {
                match rx.recv() {
                    Ok(LogMessage::Formatted(text)) => {
                        file.write_all(text.as_bytes())?;
                    }
                    Ok(LogMessage::Shutdown) | Err(_) => {
                        file.flush()?;
                        break;
                    }
                }
            }

            Ok::<(), anyhow::Error>(())
        });

        Ok(LoggerGuard {
            tx,
            handle: Some(handle),
        })
    }

    /// Timestamp prefix shown in simulation mode, empty otherwise.
    ///
    /// With a display timezone that differs from local time both clocks are
    /// shown as `[HH:MM:SSD] [HH:MM:SSL] `.
    pub fn get_timestamp_prefix() -> String {
        if !(crate::time_source::is_initialized() && crate::time_source::is_simulated()) {
            return String::new();
        }

        let local_now = crate::time_source::now();
        let local_str = local_now.format("%H:%M:%S").to_string();

        match Self::display_timezone() {
            Some(tz) => {
                let display_str = local_now.with_timezone(&tz).format("%H:%M:%S").to_string();
                if display_str != local_str {
                    format!("[{display_str}D] [{local_str}L] ")
                } else {
                    format!("[{local_str}] ")
                }
            }
            None => format!("[{local_str}] "),
        }
    }
}

/// Flushes and joins the file logging thread when dropped.
pub struct LoggerGuard {
    tx: Sender<LogMessage>,
    handle: Option<std::thread::JoinHandle<anyhow::Result<()>>>,
}

impl Drop for LoggerGuard {
    fn drop(&mut self) {
        let _ = self.tx.send(LogMessage::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            for ch in chars.by_ref() {
                if ch == 'm' {
                    break;
                }
            }
        } else {
            result.push(ch);
        }
    }

    result
}

/// Route one formatted line to its destination. Public for the macros.
pub fn write_output(text: &str) {
    if let Some(Some(tx)) = LOG_CHANNEL.get() {
        let _ = tx.send(LogMessage::Formatted(strip_ansi_codes(text)));
        return;
    }

    if let Ok(mut held) = HELD_OUTPUT.lock()
        && let Some(buffer) = held.as_mut()
    {
        buffer.push(text.to_string());
        return;
    }

    print!("{text}");
    let _ = std::io::stdout().flush();
}

/// Shared body of every logging macro: `$layout` receives the timestamp
/// prefix and the rendered message.
#[doc(hidden)]
#[macro_export]
macro_rules! __log_line {
    ($layout:expr, $($arg:tt)+) => {{
        let prefix = $crate::common::logger::Log::get_timestamp_prefix();
        let message = format!($($arg)+);
        let layout: fn(&str, &str) -> String = $layout;
        $crate::common::logger::write_output(&layout(&prefix, &message));
    }};
}

/// Log a decorated message, typically part of a block.
#[macro_export]
macro_rules! log_decorated {
    ($fmt:literal $($arg:tt)*) => {
        $crate::__log_line!(|p, m| format!("{p}┣ {m}\n"), $fmt $($arg)*)
    };
    ($expr:expr) => {
        $crate::__log_line!(|p, m| format!("{p}┣ {m}\n"), "{}", $expr)
    };
}

/// Log an indented detail line.
#[macro_export]
macro_rules! log_indented {
    ($fmt:literal $($arg:tt)*) => {
        $crate::__log_line!(|p, m| format!("{p}┃   {m}\n"), $fmt $($arg)*)
    };
    ($expr:expr) => {
        $crate::__log_line!(|p, m| format!("{p}┃   {m}\n"), "{}", $expr)
    };
}

/// Log an empty pipe line for vertical spacing.
#[macro_export]
macro_rules! log_pipe {
    () => {
        $crate::__log_line!(|p, _| format!("{p}┃\n"), "")
    };
}

/// Start a new block of related messages.
#[macro_export]
macro_rules! log_block_start {
    ($fmt:literal $($arg:tt)*) => {
        $crate::__log_line!(|p, m| format!("{p}┃\n{p}┣ {m}\n"), $fmt $($arg)*)
    };
    ($expr:expr) => {
        $crate::__log_line!(|p, m| format!("{p}┃\n{p}┣ {m}\n"), "{}", $expr)
    };
}

/// Log the application header.
#[macro_export]
macro_rules! log_version {
    () => {
        $crate::__log_line!(
            |p, m| format!("{p}┏ dialclock v{m} ━━╸\n"),
            "{}",
            env!("CARGO_PKG_VERSION")
        )
    };
}

/// Log the final termination marker.
#[macro_export]
macro_rules! log_end {
    () => {
        $crate::__log_line!(|p, _| format!("{p}╹\n"), "")
    };
}

/// Log a warning with a yellow tag.
#[macro_export]
macro_rules! log_warning {
    ($fmt:literal $($arg:tt)*) => {
        $crate::__log_line!(|p, m| format!("{p}┣[\x1b[33mWARNING\x1b[0m] {m}\n"), $fmt $($arg)*)
    };
    ($expr:expr) => {
        $crate::__log_line!(|p, m| format!("{p}┣[\x1b[33mWARNING\x1b[0m] {m}\n"), "{}", $expr)
    };
}

/// Log a warning outside of any block.
#[macro_export]
macro_rules! log_warning_standalone {
    ($fmt:literal $($arg:tt)*) => {
        $crate::__log_line!(|p, m| format!("{p}[\x1b[33mWARNING\x1b[0m] {m}\n"), $fmt $($arg)*)
    };
    ($expr:expr) => {
        $crate::__log_line!(|p, m| format!("{p}[\x1b[33mWARNING\x1b[0m] {m}\n"), "{}", $expr)
    };
}

/// Log an error with a red tag.
#[macro_export]
macro_rules! log_error {
    ($fmt:literal $($arg:tt)*) => {
        $crate::__log_line!(|p, m| format!("{p}┣[\x1b[31mERROR\x1b[0m] {m}\n"), $fmt $($arg)*)
    };
    ($expr:expr) => {
        $crate::__log_line!(|p, m| format!("{p}┣[\x1b[31mERROR\x1b[0m] {m}\n"), "{}", $expr)
    };
}

/// Log an error that terminates the flow.
#[macro_export]
macro_rules! log_error_exit {
    ($fmt:literal $($arg:tt)*) => {
        $crate::__log_line!(|p, m| format!("{p}┃\n{p}┗[\x1b[31mERROR\x1b[0m] {m}\n"), $fmt $($arg)*)
    };
    ($expr:expr) => {
        $crate::__log_line!(|p, m| format!("{p}┃\n{p}┗[\x1b[31mERROR\x1b[0m] {m}\n"), "{}", $expr)
    };
}

/// Log an informational message with a green tag.
#[macro_export]
macro_rules! log_info {
    ($fmt:literal $($arg:tt)*) => {
        $crate::__log_line!(|p, m| format!("{p}┣[\x1b[32mINFO\x1b[0m] {m}\n"), $fmt $($arg)*)
    };
    ($expr:expr) => {
        $crate::__log_line!(|p, m| format!("{p}┣[\x1b[32mINFO\x1b[0m] {m}\n"), "{}", $expr)
    };
}

/// Log a debug message with a green tag.
#[macro_export]
macro_rules! log_debug {
    ($fmt:literal $($arg:tt)*) => {
        $crate::__log_line!(|p, m| format!("{p}┣[\x1b[32mDEBUG\x1b[0m] {m}\n"), $fmt $($arg)*)
    };
    ($expr:expr) => {
        $crate::__log_line!(|p, m| format!("{p}┣[\x1b[32mDEBUG\x1b[0m] {m}\n"), "{}", $expr)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_ansi_codes_removes_color_tags() {
        let colored = "┣[\x1b[33mWARNING\x1b[0m] dial skipped\n";
        assert_eq!(strip_ansi_codes(colored), "┣[WARNING] dial skipped\n");
    }

    #[test]
    fn test_strip_ansi_codes_keeps_plain_text() {
        assert_eq!(strip_ansi_codes("┃   seconds: 07"), "┃   seconds: 07");
    }
}
