//! Logging configuration from environment variables

use std::path::PathBuf;

pub const DEFAULT_FILTER: &str = "terminal=info,lib_market=info,lib_core=info,warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Filter directives (e.g., "terminal=debug,warn")
    pub log_level: String,
    /// Directory for the rolling log file; console only when unset
    pub log_dir: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::from_vars(None, None)
    }
}

impl LogConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var("RUST_LOG").ok(),
            std::env::var("SKELLY_LOG_DIR").ok(),
        )
    }

    pub fn from_vars(rust_log: Option<String>, log_dir: Option<String>) -> Self {
        Self {
            log_level: rust_log
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_FILTER.to_string()),
            log_dir: log_dir
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        }
    }
}
