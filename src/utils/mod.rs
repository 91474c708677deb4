//! Logging setup and shared constants

pub mod constants;
pub mod logging;
