//! Command-line argument parsing and processing.
//!
//! Flags may appear anywhere on the command line. The first argument that is
//! not a flag names the command; the ones after it are its arguments.

use crate::common::constants::{
    DEFAULT_SIMULATION_MULTIPLIER, MAXIMUM_SIMULATION_MULTIPLIER, MINIMUM_SIMULATION_MULTIPLIER,
};

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Show the dials until stopped
    Run {
        debug_enabled: bool,
        config_dir: Option<String>,
    },
    /// Print every dial's current reading once
    Show {
        debug_enabled: bool,
        config_dir: Option<String>,
    },
    /// Run the dials on an accelerated clock
    Simulate {
        debug_enabled: bool,
        start_time: String,
        end_time: String,
        multiplier: f64,
        config_dir: Option<String>,
    },
    /// Help for one command, or general help
    Help(Option<String>),

    /// Display help information and exit
    ShowHelp,
    /// Display version information and exit
    ShowVersion,
    /// Show help due to unknown arguments and exit
    ShowHelpDueToError,
}

/// Result of parsing command-line arguments.
#[derive(Debug)]
pub struct ParsedArgs {
    pub action: CliAction,
    /// File given with `--log`, applies to every command
    pub log_file: Option<String>,
}

/// Rough shape check for "YYYY-MM-DD HH:MM:SS"; full parsing happens in the command.
fn looks_like_datetime(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 19
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes[10] == b' '
        && bytes[13] == b':'
        && bytes[16] == b':'
}

impl ParsedArgs {
    /// Parse command-line arguments, the first item being the program name.
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut debug_enabled = false;
        let mut display_help = false;
        let mut display_version = false;
        let mut unknown_arg_found = false;
        let mut config_dir: Option<String> = None;
        let mut log_file: Option<String> = None;
        let mut positional: Vec<String> = Vec::new();

        let args_vec: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        let mut i = 0;
        while i < args_vec.len() {
            let arg = &args_vec[i];
            match arg.as_str() {
                "--help" | "-h" => display_help = true,
                "--version" | "-V" | "-v" => display_version = true,
                "--debug" | "-d" => debug_enabled = true,
                "--config" | "-c" | "--log" => {
                    let value = args_vec.get(i + 1).filter(|next| !next.starts_with('-'));
                    match value {
                        Some(value) if arg == "--log" => log_file = Some(value.clone()),
                        Some(value) => config_dir = Some(value.clone()),
                        None if arg == "--log" => {
                            log_warning!("Missing file for --log. Usage: --log <file>");
                            unknown_arg_found = true;
                        }
                        None => {
                            log_warning!(
                                "Missing directory for --config. Usage: --config <directory>"
                            );
                            unknown_arg_found = true;
                        }
                    }
                    if value.is_some() {
                        i += 1;
                    }
                }
                _ if arg.starts_with('-') && arg.len() > 1 && !is_negative_number(arg) => {
                    log_warning!("Unknown option: {arg}");
                    unknown_arg_found = true;
                }
                _ => positional.push(arg.clone()),
            }
            i += 1;
        }

        let action = if display_version {
            CliAction::ShowVersion
        } else if unknown_arg_found {
            CliAction::ShowHelpDueToError
        } else if display_help {
            match positional.first() {
                Some(command) => CliAction::Help(Some(command.clone())),
                None => CliAction::ShowHelp,
            }
        } else {
            Self::command_action(&positional, debug_enabled, config_dir)
        };

        ParsedArgs { action, log_file }
    }

    fn command_action(
        positional: &[String],
        debug_enabled: bool,
        config_dir: Option<String>,
    ) -> CliAction {
        let Some((command, rest)) = positional.split_first() else {
            return CliAction::Run {
                debug_enabled,
                config_dir,
            };
        };

        match command.as_str() {
            "run" if rest.is_empty() => CliAction::Run {
                debug_enabled,
                config_dir,
            },
            "show" | "s" if rest.is_empty() => CliAction::Show {
                debug_enabled,
                config_dir,
            },
            "help" | "h" if rest.len() <= 1 => CliAction::Help(rest.first().cloned()),
            "simulate" | "S" => Self::simulate_action(rest, debug_enabled, config_dir),
            "run" | "show" | "s" | "help" | "h" => {
                log_warning!("Too many arguments for '{command}'");
                CliAction::ShowHelpDueToError
            }
            _ => {
                log_warning!("Unknown command: {command}");
                CliAction::ShowHelpDueToError
            }
        }
    }

    fn simulate_action(
        rest: &[String],
        debug_enabled: bool,
        config_dir: Option<String>,
    ) -> CliAction {
        let (start, end, multiplier) = match rest {
            [start, end] => (start, end, None),
            [start, end, multiplier] => (start, end, Some(multiplier)),
            _ => {
                log_warning!(
                    "Usage: dialclock simulate \"YYYY-MM-DD HH:MM:SS\" \"YYYY-MM-DD HH:MM:SS\" [multiplier]"
                );
                return CliAction::ShowHelpDueToError;
            }
        };

        for value in [start, end] {
            if !looks_like_datetime(value) {
                log_error!("Invalid time format: '{value}'. Use YYYY-MM-DD HH:MM:SS");
                return CliAction::ShowHelpDueToError;
            }
        }

        let multiplier = match multiplier.map(|m| m.parse::<f64>()) {
            None => DEFAULT_SIMULATION_MULTIPLIER,
            Some(Ok(m))
                if (MINIMUM_SIMULATION_MULTIPLIER..=MAXIMUM_SIMULATION_MULTIPLIER)
                    .contains(&m) =>
            {
                m
            }
            Some(_) => {
                log_error!(
                    "Invalid multiplier. Must be between {MINIMUM_SIMULATION_MULTIPLIER} and {MAXIMUM_SIMULATION_MULTIPLIER}."
                );
                return CliAction::ShowHelpDueToError;
            }
        };

        CliAction::Simulate {
            debug_enabled,
            start_time: start.clone(),
            end_time: end.clone(),
            multiplier,
            config_dir,
        }
    }

    /// Convenience method to parse from std::env::args()
    pub fn from_env() -> ParsedArgs {
        Self::parse(std::env::args())
    }
}

fn is_negative_number(arg: &str) -> bool {
    arg.parse::<f64>().is_ok()
}

/// Displays version information using custom logging style.
pub fn display_version_info() {
    log_version!();
    log_pipe!();
    println!("┗ {}", env!("CARGO_PKG_DESCRIPTION"));
}

/// Displays custom help message using logger methods.
pub fn display_help() {
    log_version!();
    log_block_start!(env!("CARGO_PKG_DESCRIPTION"));
    log_block_start!("Usage:");
    log_indented!("dialclock [OPTIONS] [COMMAND]");
    log_block_start!("Options:");
    log_indented!("-c, --config <dir>     Use custom configuration directory");
    log_indented!("-d, --debug            Enable detailed debug output");
    log_indented!("    --log <file>       Also write output to a file");
    log_indented!("-h, --help             Print help information");
    log_indented!("-V, --version          Print version information");
    log_block_start!("Commands:");
    log_indented!("run                    Show the dials until stopped (default)");
    log_indented!("show, s                Print every dial's current reading and exit");
    log_indented!("simulate, S <start> <end> [multiplier]");
    log_indented!("                       Run the dials on an accelerated clock");
    log_indented!("help, h [command]      Show help for a command");
    log_end!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliAction {
        let mut full = vec!["dialclock"];
        full.extend_from_slice(args);
        ParsedArgs::parse(full).action
    }

    #[test]
    fn test_parse_no_args() {
        assert_eq!(
            parse(&[]),
            CliAction::Run {
                debug_enabled: false,
                config_dir: None,
            }
        );
    }

    #[test]
    fn test_parse_debug_and_config() {
        assert_eq!(
            parse(&["-d", "--config", "/tmp/dials"]),
            CliAction::Run {
                debug_enabled: true,
                config_dir: Some("/tmp/dials".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_show_with_flag_after() {
        assert_eq!(
            parse(&["show", "--debug"]),
            CliAction::Show {
                debug_enabled: true,
                config_dir: None,
            }
        );
    }

    #[test]
    fn test_parse_simulate_default_multiplier() {
        assert_eq!(
            parse(&["simulate", "2026-12-31 23:59:00", "2027-01-01 00:01:00"]),
            CliAction::Simulate {
                debug_enabled: false,
                start_time: "2026-12-31 23:59:00".to_string(),
                end_time: "2027-01-01 00:01:00".to_string(),
                multiplier: DEFAULT_SIMULATION_MULTIPLIER,
                config_dir: None,
            }
        );
    }

    #[test]
    fn test_parse_simulate_with_multiplier() {
        let action = parse(&["S", "2026-01-31 23:00:00", "2026-02-01 01:00:00", "3600"]);
        assert!(matches!(action, CliAction::Simulate { multiplier, .. } if multiplier == 3600.0));
    }

    #[test]
    fn test_parse_simulate_rejects_bad_input() {
        assert_eq!(
            parse(&["simulate", "yesterday", "2026-01-01 00:00:00"]),
            CliAction::ShowHelpDueToError
        );
        assert_eq!(
            parse(&["simulate", "2026-01-01 00:00:00", "2026-01-02 00:00:00", "0"]),
            CliAction::ShowHelpDueToError
        );
        assert_eq!(
            parse(&["simulate", "2026-01-01 00:00:00"]),
            CliAction::ShowHelpDueToError
        );
    }

    #[test]
    fn test_parse_help_forms() {
        assert_eq!(parse(&["--help"]), CliAction::ShowHelp);
        assert_eq!(parse(&["help"]), CliAction::Help(None));
        assert_eq!(
            parse(&["help", "simulate"]),
            CliAction::Help(Some("simulate".to_string()))
        );
        assert_eq!(
            parse(&["show", "-h"]),
            CliAction::Help(Some("show".to_string()))
        );
    }

    #[test]
    fn test_version_takes_precedence() {
        assert_eq!(parse(&["--version", "--help", "--debug"]), CliAction::ShowVersion);
        assert_eq!(parse(&["-v"]), CliAction::ShowVersion);
    }

    #[test]
    fn test_unknown_option_and_command() {
        assert_eq!(parse(&["--unknown"]), CliAction::ShowHelpDueToError);
        assert_eq!(parse(&["-d", "--invalid"]), CliAction::ShowHelpDueToError);
        assert_eq!(parse(&["rewind"]), CliAction::ShowHelpDueToError);
        assert_eq!(parse(&["show", "extra"]), CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_log_file_flag() {
        let parsed = ParsedArgs::parse(["dialclock", "--log", "/tmp/dialclock.log", "show"]);
        assert_eq!(parsed.log_file.as_deref(), Some("/tmp/dialclock.log"));
        assert!(matches!(parsed.action, CliAction::Show { .. }));

        let missing = ParsedArgs::parse(["dialclock", "--log"]);
        assert_eq!(missing.action, CliAction::ShowHelpDueToError);
    }
}
