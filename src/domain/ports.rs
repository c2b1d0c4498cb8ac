use crate::domain::connection::{ConnectionProbe, Provider};
use crate::domain::errors::GatewayError;
use crate::domain::trading::portfolio::PortfolioSnapshot;
use crate::domain::trading::types::Order;
use crate::domain::user::{UserRecord, UserUpdate};
use async_trait::async_trait;

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Remote user store holding profiles and their preferences blob.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// `Ok(None)` when the user does not exist.
    async fn get_user(&self, user_id: &str) -> GatewayResult<Option<UserRecord>>;

    /// Writes only the fields present in `update`.
    async fn update_user(&self, user_id: &str, update: UserUpdate) -> GatewayResult<()>;
}

/// Liveness probe for one integrated provider.
#[async_trait]
pub trait ConnectionTester: Send + Sync {
    fn provider(&self) -> Provider;

    async fn test_connection(&self) -> GatewayResult<ConnectionProbe>;
}

/// Read side of the brokerage account shown on the dashboard.
#[async_trait]
pub trait BrokerGateway: Send + Sync {
    async fn get_portfolio(&self) -> GatewayResult<PortfolioSnapshot>;
    async fn get_open_orders(&self) -> GatewayResult<Vec<Order>>;
}
