//! Logging configuration parsing from environment variables.

use std::env;

pub const DEFAULT_LOG_FILTER: &str = "info";

/// Observability environment configuration
#[derive(Debug, Clone)]
pub struct ObservabilityEnvConfig {
    /// `EnvFilter` directive string, e.g. `info,rustrade_dashboard=debug`.
    pub log_filter: String,
}

impl Default for ObservabilityEnvConfig {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ObservabilityEnvConfig {
    /// `RUST_LOG` wins over `LOG_LEVEL`.
    pub fn from_env() -> Self {
        let log_filter = env::var("RUST_LOG")
            .or_else(|_| env::var("LOG_LEVEL"))
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
        Self { log_filter }
    }
}
