//! Infrastructure shared by every other module.

// Declared first so the logging macros are visible to the siblings below
#[macro_use]
pub mod logger;

pub mod constants;
pub mod utils;
