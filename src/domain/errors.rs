use thiserror::Error;

/// Failures raised by external collaborators (persistence service, broker
/// APIs, connection probes).
///
/// These never reach the state tree as-is: the async lifecycle turns them into
/// a plain `reason` string via [`GatewayError::reason`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    #[error("{message}")]
    Transport { message: String },

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    #[error("{message}")]
    Validation { message: String },

    #[error("User not found: {user_id}")]
    NotFound { user_id: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    /// A failure that carries no usable description.
    #[error("{}", .message.as_deref().unwrap_or_default())]
    Unknown { message: Option<String> },
}

impl GatewayError {
    pub fn transport(message: impl Into<String>) -> Self {
        GatewayError::Transport {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        GatewayError::Validation {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        GatewayError::Storage {
            message: message.into(),
        }
    }

    /// Human-readable reason for the UI, or `fallback` when the error has no
    /// message of its own.
    pub fn reason(&self, fallback: &str) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            fallback.to_string()
        } else {
            message
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GatewayError::Decode {
                message: err.to_string(),
            }
        } else if let Some(status) = err.status() {
            GatewayError::Http {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else {
            GatewayError::Transport {
                message: err.to_string(),
            }
        }
    }
}

impl From<reqwest_middleware::Error> for GatewayError {
    fn from(err: reqwest_middleware::Error) -> Self {
        match err {
            reqwest_middleware::Error::Reqwest(e) => e.into(),
            reqwest_middleware::Error::Middleware(e) => GatewayError::Transport {
                message: e.to_string(),
            },
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Decode {
            message: err.to_string(),
        }
    }
}

/// Errors raised by the per-provider connection test workflow.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConnectionTestError {
    #[error("A connection test is already running for {provider}")]
    AlreadyTesting { provider: String },
}
