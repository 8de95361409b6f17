//! Help command implementation for dialclock.
//!
//! Shows command-specific help or general help based on the arguments provided.

use anyhow::Result;

/// Run the help command (dispatcher)
///
/// # Arguments
/// * `command` - Optional command name to get help for (None = general help)
pub fn run_help_command(command: Option<&str>) -> Result<()> {
    match command {
        None => display_general_help(),
        Some("run") => display_run_help(),
        Some("help") | Some("h") => display_help_help(),
        Some("show") | Some("s") => super::show::display_help(),
        Some("simulate") | Some("S") => super::simulate::display_help(),
        Some(unknown) => {
            log_warning_standalone!("Unknown command: {}", unknown);
            display_general_help();
        }
    }
    Ok(())
}

/// Display general help focused on commands (for the help command)
fn display_general_help() {
    log_version!();
    log_block_start!("Available Commands:");
    log_indented!("run                       Show the dials until stopped (default)");
    log_indented!("show, s                   Print every dial's current reading");
    log_indented!("simulate, S <start> <end> Run the dials on an accelerated clock");
    log_indented!("help, h [COMMAND]         Show detailed help for a command");
    log_pipe!();
    log_info!("Use 'dialclock help <command>' to see detailed help for a specific command.");
    log_indented!("Use 'dialclock --help' to see all options and general usage.");
    log_end!();
}

fn display_run_help() {
    log_version!();
    log_block_start!("run - Show the dials until stopped");
    log_block_start!("Usage: dialclock [run] [OPTIONS]");
    log_block_start!("Description:");
    log_indented!("Draws one ring per configured dial and turns each ring so the");
    log_indented!("current value sits at the marker on the right.");
    log_indented!("Without a terminal, changes of the current values are logged instead.");
    log_block_start!("Controls:");
    log_indented!("q, Esc, Ctrl+C  Quit");
    log_block_start!("Signals:");
    log_indented!("SIGUSR2         Reload the configuration");
    log_indented!("SIGINT/SIGTERM  Quit");
    log_end!();
}

/// Display help for the help command itself
fn display_help_help() {
    log_version!();
    log_block_start!("help - Display help information");
    log_block_start!("Usage: dialclock help [COMMAND]");
    log_block_start!("Arguments:");
    log_indented!("COMMAND  Optional command to get help for");
    log_indented!("         If omitted, shows general help");
    log_block_start!("Examples:");
    log_indented!("dialclock help");
    log_indented!("dialclock help simulate");
    log_end!();
}
