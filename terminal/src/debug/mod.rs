//! # Logging
//!
//! Console logging to stderr with an optional rolling log file.
//!
//! Configure with environment variables:
//! - `RUST_LOG`: filter directives (default `terminal=info,lib_market=info,lib_core=info,warn`)
//! - `SKELLY_LOG_DIR`: also write a daily-rotated `skelly.log` into this directory

pub mod config;
pub mod logger;

pub use config::LogConfig;
pub use logger::init;
