use crate::domain::connection::{ConnectionProbe, Provider};
use crate::domain::errors::GatewayError;
use crate::domain::ports::{BrokerGateway, ConnectionTester, GatewayResult, PersistenceGateway};
use crate::domain::trading::portfolio::{PortfolioSnapshot, Position};
use crate::domain::trading::types::{Order, OrderSide, OrderStatus, OrderType};
use crate::domain::user::{UserPreferences, UserRecord, UserUpdate};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::info;

/// In-memory user store used in mock mode and in tests.
#[derive(Clone, Default)]
pub struct InMemoryPersistenceGateway {
    users: Arc<RwLock<HashMap<String, UserRecord>>>,
    failures: Arc<Mutex<Vec<GatewayError>>>,
    latency: Option<Duration>,
    get_calls: Arc<AtomicUsize>,
    update_calls: Arc<AtomicUsize>,
}

impl InMemoryPersistenceGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeded with a demo user whose preferences select the light theme.
    pub fn with_demo_user(user_id: &str) -> Self {
        let mut user = UserRecord::new(user_id);
        user.name = "Demo Trader".to_string();
        user.email = "demo@rustrade.local".to_string();
        user.preferences = Some(UserPreferences::with_dark_mode(false));

        let users = HashMap::from([(user_id.to_string(), user)]);
        Self {
            users: Arc::new(RwLock::new(users)),
            ..Self::default()
        }
    }

    /// Delay applied to every call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub async fn insert_user(&self, user: UserRecord) {
        self.users.write().await.insert(user.id.clone(), user);
    }

    pub async fn user(&self, user_id: &str) -> Option<UserRecord> {
        self.users.read().await.get(user_id).cloned()
    }

    /// Queues an error returned by the next call instead of touching the store.
    pub async fn fail_next(&self, error: GatewayError) {
        self.failures.lock().await.push(error);
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    async fn before_call(&self) -> GatewayResult<()> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        let mut failures = self.failures.lock().await;
        if failures.is_empty() {
            Ok(())
        } else {
            Err(failures.remove(0))
        }
    }
}

#[async_trait]
impl PersistenceGateway for InMemoryPersistenceGateway {
    async fn get_user(&self, user_id: &str) -> GatewayResult<Option<UserRecord>> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.before_call().await?;
        Ok(self.users.read().await.get(user_id).cloned())
    }

    async fn update_user(&self, user_id: &str, update: UserUpdate) -> GatewayResult<()> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.before_call().await?;

        let mut users = self.users.write().await;
        let user = users
            .get_mut(user_id)
            .ok_or_else(|| GatewayError::NotFound {
                user_id: user_id.to_string(),
            })?;
        user.apply(&update);
        info!("InMemoryPersistenceGateway: updated user {}", user_id);
        Ok(())
    }
}

/// Broker returning a fixed paper account.
#[derive(Clone)]
pub struct MockBrokerGateway {
    portfolio: Arc<RwLock<PortfolioSnapshot>>,
    orders: Arc<RwLock<Vec<Order>>>,
}

impl MockBrokerGateway {
    pub fn new(portfolio: PortfolioSnapshot, orders: Vec<Order>) -> Self {
        Self {
            portfolio: Arc::new(RwLock::new(portfolio)),
            orders: Arc::new(RwLock::new(orders)),
        }
    }

    /// Small demo account: cash, two positions, one resting limit order.
    pub fn demo() -> Self {
        let mut portfolio = PortfolioSnapshot {
            cash: dec!(25000),
            ..Default::default()
        };
        let mut aapl = Position::new("AAPL", dec!(10), dec!(182.50));
        aapl.current_price = Some(dec!(189.10));
        let mut btc = Position::new("BTC/USD", dec!(0.25), dec!(61000));
        btc.current_price = Some(dec!(64250));
        portfolio.positions.insert(aapl.symbol.clone(), aapl);
        portfolio.positions.insert(btc.symbol.clone(), btc);

        let order = Order {
            id: "demo-order-1".to_string(),
            symbol: "MSFT".to_string(),
            side: OrderSide::Buy,
            order_type: OrderType::Limit,
            quantity: dec!(5),
            price: Some(dec!(405.00)),
            status: OrderStatus::Accepted,
            submitted_at: Utc::now(),
        };

        Self::new(portfolio, vec![order])
    }

    pub async fn set_orders(&self, orders: Vec<Order>) {
        *self.orders.write().await = orders;
    }
}

impl Default for MockBrokerGateway {
    fn default() -> Self {
        Self::new(PortfolioSnapshot::default(), Vec::new())
    }
}

#[async_trait]
impl BrokerGateway for MockBrokerGateway {
    async fn get_portfolio(&self) -> GatewayResult<PortfolioSnapshot> {
        Ok(self.portfolio.read().await.clone())
    }

    async fn get_open_orders(&self) -> GatewayResult<Vec<Order>> {
        Ok(self
            .orders
            .read()
            .await
            .iter()
            .filter(|o| o.status.is_open())
            .cloned()
            .collect())
    }
}

/// Connection tester answering with a scripted outcome.
pub struct MockConnectionTester {
    provider: Provider,
    outcome: GatewayResult<ConnectionProbe>,
    latency: Option<Duration>,
}

impl MockConnectionTester {
    pub fn succeeding(provider: Provider) -> Self {
        Self {
            provider,
            outcome: Ok(ConnectionProbe::ok(format!("{} reachable (mock)", provider))),
            latency: None,
        }
    }

    pub fn failing(provider: Provider, error: GatewayError) -> Self {
        Self {
            provider,
            outcome: Err(error),
            latency: None,
        }
    }

    pub fn with_outcome(provider: Provider, outcome: GatewayResult<ConnectionProbe>) -> Self {
        Self {
            provider,
            outcome,
            latency: None,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }
}

#[async_trait]
impl ConnectionTester for MockConnectionTester {
    fn provider(&self) -> Provider {
        self.provider
    }

    async fn test_connection(&self) -> GatewayResult<ConnectionProbe> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.outcome.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_update_missing_user_is_not_found() {
        let gateway = InMemoryPersistenceGateway::new();
        let err = gateway
            .update_user("ghost", UserUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_fail_next_is_consumed_once() {
        let gateway = InMemoryPersistenceGateway::with_demo_user("u1");
        gateway.fail_next(GatewayError::transport("network down")).await;

        assert!(gateway.get_user("u1").await.is_err());
        let user = gateway.get_user("u1").await.unwrap();
        assert_eq!(
            user.and_then(|u| u.preferences).and_then(|p| p.dark_mode),
            Some(false)
        );
        assert_eq!(gateway.get_calls(), 2);
    }

    #[tokio::test]
    async fn test_demo_broker_only_lists_open_orders() {
        let broker = MockBrokerGateway::demo();
        let mut filled = Order::market("f1", "AAPL", OrderSide::Buy, dec!(1));
        filled.status = OrderStatus::Filled;
        let open = Order::market("o1", "AAPL", OrderSide::Buy, dec!(1));
        broker.set_orders(vec![filled, open]).await;

        let orders = broker.get_open_orders().await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].id, "o1");
    }
}
