use crate::application::client::DashboardClient;
use crate::application::store::Store;
use crate::config::{Config, Mode};
use crate::domain::connection::Provider;
use crate::domain::ports::{BrokerGateway, ConnectionTester, PersistenceGateway};
use crate::domain::user::UserRecord;
use crate::infrastructure::alpaca::AlpacaClient;
use crate::infrastructure::binance::BinanceMarketDataProbe;
use crate::infrastructure::mock::{
    InMemoryPersistenceGateway, MockBrokerGateway, MockConnectionTester,
};
use crate::infrastructure::settings_persistence::JsonFilePersistenceGateway;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

/// Gateways selected for the configured mode.
pub struct Services {
    pub persistence: Arc<dyn PersistenceGateway>,
    pub broker: Arc<dyn BrokerGateway>,
    pub testers: Vec<Arc<dyn ConnectionTester>>,
}

impl Services {
    pub fn into_client(self, store: Store) -> DashboardClient {
        self.testers.into_iter().fold(
            DashboardClient::new(store, self.persistence, self.broker),
            DashboardClient::with_tester,
        )
    }
}

pub struct ServiceFactory;

impl ServiceFactory {
    pub async fn create_services(config: &Config) -> Result<Services> {
        match config.mode {
            Mode::Mock => {
                info!("ServiceFactory: using mock gateways");
                Ok(Services {
                    persistence: Arc::new(InMemoryPersistenceGateway::with_demo_user(
                        &config.session.user_id,
                    )),
                    broker: Arc::new(MockBrokerGateway::demo()),
                    testers: Provider::ALL
                        .iter()
                        .map(|p| {
                            Arc::new(MockConnectionTester::succeeding(*p))
                                as Arc<dyn ConnectionTester>
                        })
                        .collect(),
                })
            }
            Mode::Live => {
                let persistence = JsonFilePersistenceGateway::new(&config.session.settings_path);
                persistence
                    .ensure_user(UserRecord::new(config.session.user_id.clone()))
                    .await
                    .with_context(|| {
                        format!(
                            "Failed to prepare settings file {:?}",
                            config.session.settings_path
                        )
                    })?;
                info!(
                    "ServiceFactory: live gateways, settings at {:?}",
                    persistence.path()
                );

                let timeout = config.session.http_timeout;
                let alpaca = Arc::new(AlpacaClient::new(config.broker.alpaca.clone(), timeout));
                let binance = Arc::new(BinanceMarketDataProbe::new(
                    &config.broker.binance,
                    timeout,
                ));

                let mut testers: Vec<Arc<dyn ConnectionTester>> = vec![binance];
                if config.broker.alpaca.has_credentials() {
                    testers.push(alpaca.clone());
                } else {
                    warn!("ServiceFactory: ALPACA_API_KEY/ALPACA_SECRET_KEY not set");
                }

                Ok(Services {
                    persistence: Arc::new(persistence),
                    broker: alpaca,
                    testers,
                })
            }
        }
    }
}
