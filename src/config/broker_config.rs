//! Broker configuration parsing from environment variables.
//!
//! - Alpaca backs the trading API (account, positions, orders)
//! - Binance backs the market data probe

use std::env;

/// Alpaca API configuration
#[derive(Debug, Clone, Default)]
pub struct AlpacaConfig {
    pub api_key: String,
    pub secret_key: String,
    pub base_url: String,
}

impl AlpacaConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: env::var("ALPACA_API_KEY").unwrap_or_default(),
            secret_key: env::var("ALPACA_SECRET_KEY").unwrap_or_default(),
            base_url: env::var("ALPACA_BASE_URL")
                .unwrap_or_else(|_| "https://paper-api.alpaca.markets".to_string()),
        }
    }

    pub fn has_credentials(&self) -> bool {
        !self.api_key.is_empty() && !self.secret_key.is_empty()
    }
}

/// Binance market data configuration. Only public endpoints are called,
/// so no keys are read.
#[derive(Debug, Clone, Default)]
pub struct BinanceConfig {
    pub base_url: String,
}

impl BinanceConfig {
    pub fn from_env() -> Self {
        Self {
            base_url: env::var("BINANCE_BASE_URL")
                .unwrap_or_else(|_| "https://api.binance.com".to_string()),
        }
    }
}

/// Aggregated broker configuration
#[derive(Debug, Clone, Default)]
pub struct BrokerEnvConfig {
    pub alpaca: AlpacaConfig,
    pub binance: BinanceConfig,
}

impl BrokerEnvConfig {
    pub fn from_env() -> Self {
        Self {
            alpaca: AlpacaConfig::from_env(),
            binance: BinanceConfig::from_env(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alpaca_config_defaults() {
        let config = AlpacaConfig::from_env();
        assert!(config.base_url.contains("alpaca.markets"));
    }

    #[test]
    fn test_binance_config_defaults() {
        let config = BinanceConfig::from_env();
        assert!(config.base_url.contains("binance.com"));
    }

    #[test]
    fn test_credentials_required_for_alpaca() {
        let mut config = AlpacaConfig::default();
        assert!(!config.has_credentials());
        config.api_key = "key".to_string();
        config.secret_key = "secret".to_string();
        assert!(config.has_credentials());
    }
}
