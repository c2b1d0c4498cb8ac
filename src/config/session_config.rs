//! Dashboard session configuration: who is signed in, where their settings
//! live and how concurrent async results are resolved.

use crate::application::store::ResolutionPolicy;
use crate::infrastructure::settings_persistence::JsonFilePersistenceGateway;
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_USER_ID: &str = "demo-user";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Session environment configuration
#[derive(Debug, Clone)]
pub struct SessionEnvConfig {
    pub user_id: String,
    pub settings_path: PathBuf,
    pub resolution_policy: ResolutionPolicy,
    pub http_timeout: Duration,
}

impl SessionEnvConfig {
    pub fn from_env() -> Result<Self> {
        let user_id = env::var("DASHBOARD_USER_ID")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_USER_ID.to_string());

        let settings_path = match env::var("SETTINGS_PATH") {
            Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => JsonFilePersistenceGateway::default_path()
                .context("SETTINGS_PATH is unset and no default location is available")?,
        };

        let resolution_policy = match env::var("ASYNC_RESOLUTION") {
            Ok(raw) => ResolutionPolicy::from_str(&raw)?,
            Err(_) => ResolutionPolicy::default(),
        };

        let http_timeout_secs = env::var("HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_HTTP_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .context("Failed to parse HTTP_TIMEOUT_SECS")?;
        if http_timeout_secs == 0 {
            anyhow::bail!("HTTP_TIMEOUT_SECS must be greater than zero");
        }

        Ok(Self {
            user_id,
            settings_path,
            resolution_policy,
            http_timeout: Duration::from_secs(http_timeout_secs),
        })
    }
}
