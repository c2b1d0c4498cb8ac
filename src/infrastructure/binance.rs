use crate::config::BinanceConfig;
use crate::domain::connection::{ConnectionProbe, Provider};
use crate::domain::errors::GatewayError;
use crate::domain::ports::{ConnectionTester, GatewayResult};
use crate::infrastructure::core::http_client_factory::{HttpClientFactory, build_url};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::debug;

/// Clock drift above which the probe reports a failure.
const MAX_CLOCK_DRIFT_MS: i64 = 5_000;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServerTime {
    server_time: i64,
}

/// Market data probe against Binance's public REST endpoints.
#[derive(Clone)]
pub struct BinanceMarketDataProbe {
    client: ClientWithMiddleware,
    base_url: String,
}

impl BinanceMarketDataProbe {
    pub fn new(config: &BinanceConfig, timeout: Duration) -> Self {
        Self {
            client: HttpClientFactory::create_client(timeout, 1),
            base_url: config.base_url.clone(),
        }
    }

    async fn get_text(&self, path: &str) -> GatewayResult<String> {
        let url = build_url(&self.base_url, path, &[])?;
        debug!("Binance: GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(GatewayError::Http {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

fn probe_from_server_time(
    server_time_ms: i64,
    now: DateTime<Utc>,
    latency: Duration,
) -> ConnectionProbe {
    let drift = (now.timestamp_millis() - server_time_ms).abs();
    if drift > MAX_CLOCK_DRIFT_MS {
        ConnectionProbe::failed(format!(
            "Binance reachable but local clock is off by {} ms",
            drift
        ))
    } else {
        ConnectionProbe::ok(format!(
            "Connected to Binance market data ({} ms)",
            latency.as_millis()
        ))
    }
}

#[async_trait]
impl ConnectionTester for BinanceMarketDataProbe {
    fn provider(&self) -> Provider {
        Provider::MarketDataApi
    }

    async fn test_connection(&self) -> GatewayResult<ConnectionProbe> {
        let started = Instant::now();
        self.get_text("/api/v3/ping").await?;
        let latency = started.elapsed();

        let body = self.get_text("/api/v3/time").await?;
        let time: ServerTime = serde_json::from_str(&body)?;

        Ok(probe_from_server_time(time.server_time, Utc::now(), latency))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_time_decoding() {
        let time: ServerTime = serde_json::from_str(r#"{"serverTime":1499827319559}"#).unwrap();
        assert_eq!(time.server_time, 1499827319559);
    }

    #[test]
    fn test_probe_within_drift_succeeds() {
        let now = Utc::now();
        let probe = probe_from_server_time(
            now.timestamp_millis() - 800,
            now,
            Duration::from_millis(42),
        );
        assert!(probe.success);
        assert!(probe.message.contains("42 ms"));
    }

    #[test]
    fn test_probe_with_large_drift_fails() {
        let now = Utc::now();
        let probe = probe_from_server_time(
            now.timestamp_millis() + 60_000,
            now,
            Duration::from_millis(10),
        );
        assert!(!probe.success);
        assert!(probe.message.contains("60000 ms"));
    }
}
