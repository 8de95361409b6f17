//! # Dialclock Library
//!
//! A clock drawn as concentric rotating rings, one ring per calendar field.
//! Each ring turns so that the label of the current value sits at a fixed
//! reference point, always taking the short way round.
//!
//! ## Architecture
//!
//! - **Entry Point**: [`Dialclock`] acquires resources and runs the frame loop
//! - **Core Logic**: `core` holds the rotation engine, dial kinds, label layout
//!   and the frame loop
//! - **Surfaces**: `surface` draws the rings (terminal, log output, in memory)
//! - **Configuration**: `config` for TOML-based settings with hot-reload
//! - **Commands**: `commands` for the `show`, `simulate` and `help` commands
//! - **Infrastructure**: signal handling, time source, logging and utilities

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod common;

pub mod args;
pub mod commands;
pub mod config;
pub mod core;
pub mod io;
pub mod surface;
pub mod time_source;

mod dialclock;

pub use dialclock::Dialclock;
