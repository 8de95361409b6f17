//! Entry point: parse the command line and dispatch to a command.
//!
//! - `args`: command-line parsing and help/version display
//! - `commands`: `show`, `simulate` and `help`
//! - `Dialclock`: the default run, drawing the dials until stopped

use anyhow::Result;

use dialclock::Dialclock;
use dialclock::args::{self, CliAction, ParsedArgs};
use dialclock::commands;
use dialclock::common::constants::{EXIT_FAILURE, EXIT_SUCCESS};
use dialclock::common::logger::Log;
use dialclock::config;
use dialclock::{log_error_exit, log_indented};

fn main() {
    let parsed_args = ParsedArgs::from_env();

    // Keep the guard alive until exit so the log file is flushed
    let _log_guard = match parsed_args.log_file.clone() {
        Some(path) => match Log::start_file_logging(path) {
            Ok(guard) => Some(guard),
            Err(e) => {
                log_error_exit!("Failed to open log file: {e}");
                std::process::exit(EXIT_FAILURE);
            }
        },
        None => None,
    };

    let exit_code = match dispatch(parsed_args.action) {
        Ok(code) => code,
        Err(e) => {
            log_error_exit!("{e}");
            for cause in e.chain().skip(1) {
                log_indented!("Caused by: {cause}");
            }
            EXIT_FAILURE
        }
    };

    drop(_log_guard);
    std::process::exit(exit_code);
}

fn dispatch(action: CliAction) -> Result<i32> {
    match action {
        CliAction::ShowVersion => {
            args::display_version_info();
        }
        CliAction::ShowHelp => {
            args::display_help();
        }
        CliAction::ShowHelpDueToError => {
            args::display_help();
            return Ok(EXIT_FAILURE);
        }
        CliAction::Help(command) => {
            commands::help::run_help_command(command.as_deref())?;
        }
        CliAction::Run {
            debug_enabled,
            config_dir,
        } => {
            config::set_config_dir(config_dir)?;
            Dialclock::new(debug_enabled).run()?;
        }
        CliAction::Show {
            debug_enabled,
            config_dir,
        } => {
            config::set_config_dir(config_dir)?;
            commands::show::handle_show_command(debug_enabled)?;
        }
        CliAction::Simulate {
            debug_enabled,
            start_time,
            end_time,
            multiplier,
            config_dir,
        } => {
            config::set_config_dir(config_dir)?;
            commands::simulate::handle_simulate_command(
                &start_time,
                &end_time,
                multiplier,
                debug_enabled,
            )?;
            // Header already shown by the simulate command
            Dialclock::new(debug_enabled).without_headers().run()?;
        }
    }
    Ok(EXIT_SUCCESS)
}
