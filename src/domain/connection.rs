use serde::{Deserialize, Serialize};
use std::fmt;

/// Integrated providers whose connectivity can be tested from the settings
/// screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provider {
    TradingApi,
    MarketDataApi,
}

impl Provider {
    pub const ALL: [Provider; 2] = [Provider::TradingApi, Provider::MarketDataApi];
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::TradingApi => write!(f, "Trading API"),
            Provider::MarketDataApi => write!(f, "Market Data API"),
        }
    }
}

/// Raw answer of a provider probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionProbe {
    pub success: bool,
    pub message: String,
}

impl ConnectionProbe {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConnectionStatus {
    #[default]
    Idle,
    Testing,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConnectionTestResult {
    pub status: ConnectionStatus,
    pub message: Option<String>,
}

impl ConnectionTestResult {
    pub fn testing() -> Self {
        Self {
            status: ConnectionStatus::Testing,
            message: None,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: ConnectionStatus::Success,
            message: Some(message.into()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ConnectionStatus::Error,
            message: Some(message.into()),
        }
    }

    pub fn is_testing(&self) -> bool {
        self.status == ConnectionStatus::Testing
    }
}
