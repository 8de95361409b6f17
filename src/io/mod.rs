//! Interaction with the operating system outside the terminal.

pub mod signals;
