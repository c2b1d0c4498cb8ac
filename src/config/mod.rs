//! Configuration module for the dashboard.
//!
//! Structured configuration loading from environment variables, organized by
//! concern: Broker, Session and Observability.

mod broker_config;
mod observability_config;
mod session_config;

pub use broker_config::{AlpacaConfig, BinanceConfig, BrokerEnvConfig};
pub use observability_config::{DEFAULT_LOG_FILTER, ObservabilityEnvConfig};
pub use session_config::{DEFAULT_USER_ID, SessionEnvConfig};

use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;
use url::Url;

/// Which gateways back the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// In-memory persistence, scripted broker and probes.
    Mock,
    /// JSON settings file, Alpaca trading API, Binance market data.
    Live,
}

impl FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mock" => Ok(Mode::Mock),
            "live" => Ok(Mode::Live),
            _ => anyhow::bail!("Invalid MODE: {}. Must be 'mock' or 'live'", s),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub mode: Mode,
    pub broker: BrokerEnvConfig,
    pub session: SessionEnvConfig,
    pub observability: ObservabilityEnvConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let mode_str = env::var("MODE").unwrap_or_else(|_| "mock".to_string());
        let mode = Mode::from_str(&mode_str)?;

        let broker = BrokerEnvConfig::from_env();
        let session = SessionEnvConfig::from_env().context("Failed to load session config")?;
        let observability = ObservabilityEnvConfig::from_env();

        let config = Self {
            mode,
            broker,
            session,
            observability,
        };
        config.validate()?;
        Ok(config)
    }

    /// Broker URLs are only dialed in live mode, so only checked there.
    pub fn validate(&self) -> Result<()> {
        if self.mode == Mode::Live {
            Url::parse(&self.broker.alpaca.base_url).with_context(|| {
                format!("Invalid ALPACA_BASE_URL: {}", self.broker.alpaca.base_url)
            })?;
            Url::parse(&self.broker.binance.base_url).with_context(|| {
                format!("Invalid BINANCE_BASE_URL: {}", self.broker.binance.base_url)
            })?;
        }
        Ok(())
    }
}
