use async_trait::async_trait;
use rust_decimal_macros::dec;
use rustrade_dashboard::application::client::DashboardClient;
use rustrade_dashboard::application::store::{ResolutionPolicy, Store};
use rustrade_dashboard::config::{
    BrokerEnvConfig, Config, DEFAULT_USER_ID, Mode, ObservabilityEnvConfig, SessionEnvConfig,
};
use rustrade_dashboard::domain::connection::{ConnectionStatus, Provider};
use rustrade_dashboard::domain::errors::GatewayError;
use rustrade_dashboard::domain::ports::{BrokerGateway, GatewayResult};
use rustrade_dashboard::domain::trading::portfolio::PortfolioSnapshot;
use rustrade_dashboard::domain::trading::types::{Order, OrderSide};
use rustrade_dashboard::infrastructure::ServiceFactory;
use rustrade_dashboard::infrastructure::mock::{InMemoryPersistenceGateway, MockBrokerGateway};
use rustrade_dashboard::interfaces::view_models::NavigationViewModel;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

struct DownBroker;

#[async_trait]
impl BrokerGateway for DownBroker {
    async fn get_portfolio(&self) -> GatewayResult<PortfolioSnapshot> {
        Err(GatewayError::Http {
            status: 401,
            body: "unauthorized".to_string(),
        })
    }

    async fn get_open_orders(&self) -> GatewayResult<Vec<Order>> {
        Err(GatewayError::Unknown { message: None })
    }
}

fn mock_config() -> Config {
    Config {
        mode: Mode::Mock,
        broker: BrokerEnvConfig::default(),
        session: SessionEnvConfig {
            user_id: DEFAULT_USER_ID.to_string(),
            settings_path: PathBuf::from("unused.json"),
            resolution_policy: ResolutionPolicy::LatestIssuedWins,
            http_timeout: Duration::from_secs(1),
        },
        observability: ObservabilityEnvConfig::default(),
    }
}

#[tokio::test]
async fn test_mock_session_bootstrap() {
    let config = mock_config();
    let services = ServiceFactory::create_services(&config).await.unwrap();
    let client = services.into_client(Store::with_policy(config.session.resolution_policy));
    let user_id = config.session.user_id.as_str();

    client.fetch_current_user(user_id).await.unwrap();
    client.load_user_preferences(user_id).await.unwrap();
    for provider in Provider::ALL {
        let result = client.test_connection(provider).unwrap().await;
        assert_eq!(result.status, ConnectionStatus::Success);
    }
    let (portfolio, orders) = tokio::join!(client.refresh_portfolio(), client.refresh_orders());
    portfolio.unwrap();
    orders.unwrap();

    let state = client.state();
    assert!(state.auth.is_authenticated());
    assert_eq!(state.auth.user_id(), Some(DEFAULT_USER_ID));
    assert!(!state.theme.dark_mode);
    assert_eq!(state.portfolio.position_count(), 2);
    assert!(state.portfolio.last_synced.is_some());

    let navigation = NavigationViewModel::get_metrics(&state);
    assert_eq!(navigation.orders_badge, 1);
    assert_eq!(navigation.unread_badge, Some(2));
    assert_eq!(navigation.signed_in_as.as_deref(), Some("Demo Trader"));
}

#[tokio::test]
async fn test_unknown_user_is_signed_out() {
    let client = DashboardClient::new(
        Store::new(),
        Arc::new(InMemoryPersistenceGateway::new()),
        Arc::new(MockBrokerGateway::default()),
    );

    let fetched = client.fetch_current_user("ghost").await.unwrap();

    assert!(fetched.is_none());
    let state = client.state();
    assert!(!state.auth.is_authenticated());
    assert_eq!(state.auth.status.error.as_deref(), Some("User not found"));
}

#[tokio::test]
async fn test_broker_failures_land_in_their_slices() {
    let client = DashboardClient::new(
        Store::new(),
        Arc::new(InMemoryPersistenceGateway::new()),
        Arc::new(DownBroker),
    );

    let portfolio = client.refresh_portfolio().await.unwrap_err();
    let orders = client.refresh_orders().await.unwrap_err();

    assert_eq!(portfolio, "HTTP 401: unauthorized");
    assert_eq!(orders, "Failed to refresh orders");

    let state = client.state();
    assert!(!state.portfolio.status.is_loading);
    assert_eq!(
        state.portfolio.status.error.as_deref(),
        Some("HTTP 401: unauthorized")
    );
    assert_eq!(
        state.orders.status.error.as_deref(),
        Some("Failed to refresh orders")
    );
    assert!(state.portfolio.last_synced.is_none());
    // Other slices untouched.
    assert!(state.theme.dark_mode);
    assert_eq!(state.theme.error(), None);
}

#[tokio::test]
async fn test_refresh_replaces_open_orders() {
    let broker = Arc::new(MockBrokerGateway::default());
    let client = DashboardClient::new(
        Store::new(),
        Arc::new(InMemoryPersistenceGateway::new()),
        broker.clone(),
    );
    broker
        .set_orders(vec![Order::market("o1", "AAPL", OrderSide::Buy, dec!(1))])
        .await;

    let orders = client.refresh_orders().await.unwrap();

    assert_eq!(orders.len(), 1);
    assert_eq!(client.state().orders_badge_count(), 1);
    assert_eq!(client.state().orders.find("o1").unwrap().symbol, "AAPL");
}
