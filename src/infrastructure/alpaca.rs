use crate::config::AlpacaConfig;
use crate::domain::connection::{ConnectionProbe, Provider};
use crate::domain::errors::GatewayError;
use crate::domain::ports::{BrokerGateway, ConnectionTester, GatewayResult};
use crate::domain::trading::portfolio::{PortfolioSnapshot, Position};
use crate::domain::trading::types::{Order, OrderSide, OrderStatus, OrderType};
use crate::infrastructure::core::http_client_factory::{HttpClientFactory, build_url};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest_middleware::ClientWithMiddleware;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct AlpacaAccount {
    #[serde(default)]
    account_number: String,
    status: String,
    cash: String,
    #[serde(default)]
    trading_blocked: bool,
}

#[derive(Debug, Deserialize)]
struct AlpacaPosition {
    symbol: String,
    qty: String,
    avg_entry_price: String,
    #[serde(default)]
    current_price: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AlpacaOrder {
    id: String,
    symbol: String,
    side: String,
    #[serde(rename = "type")]
    order_type: String,
    #[serde(default)]
    qty: Option<String>,
    #[serde(default)]
    limit_price: Option<String>,
    #[serde(default)]
    stop_price: Option<String>,
    status: String,
    submitted_at: Option<DateTime<Utc>>,
}

fn parse_decimal(field: &str, value: &str) -> GatewayResult<Decimal> {
    Decimal::from_str(value).map_err(|e| GatewayError::Decode {
        message: format!("Invalid {} '{}': {}", field, value, e),
    })
}

impl AlpacaOrder {
    fn into_order(self) -> GatewayResult<Order> {
        let side = match self.side.as_str() {
            "buy" => OrderSide::Buy,
            "sell" => OrderSide::Sell,
            other => {
                return Err(GatewayError::Decode {
                    message: format!("Unknown order side '{}'", other),
                });
            }
        };
        let order_type = match self.order_type.as_str() {
            "limit" => OrderType::Limit,
            "stop" => OrderType::Stop,
            "stop_limit" => OrderType::StopLimit,
            _ => OrderType::Market,
        };
        let status = OrderStatus::from_broker(&self.status).unwrap_or_else(|| {
            warn!("Alpaca: unmapped order status '{}', treating as New", self.status);
            OrderStatus::New
        });
        let quantity = match &self.qty {
            Some(qty) => parse_decimal("qty", qty)?,
            None => Decimal::ZERO,
        };
        let price = match self.limit_price.as_ref().or(self.stop_price.as_ref()) {
            Some(price) => Some(parse_decimal("price", price)?),
            None => None,
        };

        Ok(Order {
            id: self.id,
            symbol: self.symbol,
            side,
            order_type,
            quantity,
            price,
            status,
            submitted_at: self.submitted_at.unwrap_or_else(Utc::now),
        })
    }
}

/// Alpaca trading API client for the dashboard: account probe, positions and
/// open orders.
#[derive(Clone)]
pub struct AlpacaClient {
    client: ClientWithMiddleware,
    config: AlpacaConfig,
}

impl AlpacaClient {
    pub fn new(config: AlpacaConfig, timeout: Duration) -> Self {
        Self {
            client: HttpClientFactory::create_client(timeout, 1),
            config,
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> GatewayResult<T> {
        if self.config.api_key.is_empty() || self.config.secret_key.is_empty() {
            return Err(GatewayError::validation(
                "Alpaca API credentials are not configured",
            ));
        }

        let url = build_url(&self.config.base_url, path, params)?;
        debug!("Alpaca: GET {}", url);

        let response = self
            .client
            .get(url)
            .header("APCA-API-KEY-ID", &self.config.api_key)
            .header("APCA-API-SECRET-KEY", &self.config.secret_key)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(GatewayError::Http {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl ConnectionTester for AlpacaClient {
    fn provider(&self) -> Provider {
        Provider::TradingApi
    }

    /// Uses the account endpoint as a liveness probe.
    async fn test_connection(&self) -> GatewayResult<ConnectionProbe> {
        let account: AlpacaAccount = self.get("/v2/account", &[]).await?;

        if account.trading_blocked {
            return Ok(ConnectionProbe::failed(format!(
                "Connected, but trading is blocked on account {}",
                account.account_number
            )));
        }
        if account.status != "ACTIVE" {
            return Ok(ConnectionProbe::failed(format!(
                "Account {} status is {}",
                account.account_number, account.status
            )));
        }

        Ok(ConnectionProbe::ok(format!(
            "Connected to Alpaca, account {} is {}",
            account.account_number, account.status
        )))
    }
}

#[async_trait]
impl BrokerGateway for AlpacaClient {
    async fn get_portfolio(&self) -> GatewayResult<PortfolioSnapshot> {
        let account: AlpacaAccount = self.get("/v2/account", &[]).await?;
        let positions: Vec<AlpacaPosition> = self.get("/v2/positions", &[]).await?;

        let mut snapshot = PortfolioSnapshot {
            cash: parse_decimal("cash", &account.cash)?,
            ..Default::default()
        };
        for p in positions {
            let mut position = Position::new(
                p.symbol.clone(),
                parse_decimal("qty", &p.qty)?,
                parse_decimal("avg_entry_price", &p.avg_entry_price)?,
            );
            if let Some(price) = &p.current_price {
                position.current_price = Some(parse_decimal("current_price", price)?);
            }
            snapshot.positions.insert(p.symbol, position);
        }

        Ok(snapshot)
    }

    async fn get_open_orders(&self) -> GatewayResult<Vec<Order>> {
        let orders: Vec<AlpacaOrder> = self.get("/v2/orders", &[("status", "open")]).await?;
        orders.into_iter().map(AlpacaOrder::into_order).collect()
    }
}
