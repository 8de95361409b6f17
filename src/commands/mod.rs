//! Command-line command handlers for dialclock.
//!
//! The default `run` command lives in [`crate::Dialclock`]; the one-shot and
//! preparatory commands are implemented here, one submodule each.

pub mod help;
pub mod show;
pub mod simulate;
