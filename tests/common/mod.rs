#![allow(dead_code)]

use async_trait::async_trait;
use rustrade_dashboard::application::client::DashboardClient;
use rustrade_dashboard::application::store::Store;
use rustrade_dashboard::domain::ports::{GatewayResult, PersistenceGateway};
use rustrade_dashboard::domain::user::{UserPreferences, UserRecord, UserUpdate};
use rustrade_dashboard::infrastructure::mock::MockBrokerGateway;
use std::sync::Arc;
use tokio::sync::{Mutex, oneshot};

/// Persistence gateway whose `get_user` blocks until the test releases it,
/// so the order in which overlapping calls resolve is under test control.
pub struct GatedPersistence {
    gate: Mutex<Option<oneshot::Receiver<()>>>,
    response: GatewayResult<Option<UserRecord>>,
}

impl GatedPersistence {
    pub fn new(response: GatewayResult<Option<UserRecord>>) -> (Arc<Self>, oneshot::Sender<()>) {
        let (tx, rx) = oneshot::channel();
        let gateway = Arc::new(Self {
            gate: Mutex::new(Some(rx)),
            response,
        });
        (gateway, tx)
    }
}

#[async_trait]
impl PersistenceGateway for GatedPersistence {
    async fn get_user(&self, _user_id: &str) -> GatewayResult<Option<UserRecord>> {
        let gate = self.gate.lock().await.take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        self.response.clone()
    }

    async fn update_user(&self, _user_id: &str, _update: UserUpdate) -> GatewayResult<()> {
        Ok(())
    }
}

pub fn user_with_dark_mode(id: &str, dark_mode: Option<bool>) -> UserRecord {
    let mut user = UserRecord::new(id);
    user.name = "Test Trader".to_string();
    user.preferences = Some(UserPreferences {
        dark_mode,
        ..Default::default()
    });
    user
}

pub fn client_with(store: Store, persistence: Arc<dyn PersistenceGateway>) -> DashboardClient {
    DashboardClient::new(store, persistence, Arc::new(MockBrokerGateway::default()))
}
