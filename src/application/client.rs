use crate::application::connection_tests::ConnectionTests;
use crate::application::slices::auth::{AuthAction, FetchCurrentUser};
use crate::application::slices::notifications::NotificationsAction;
use crate::application::slices::orders::RefreshOrders;
use crate::application::slices::portfolio::{PortfolioSync, RefreshPortfolio};
use crate::application::slices::theme::{LoadUserPreferences, SaveUserPreferences, ThemeAction};
use crate::application::store::{Snapshot, Store};
use crate::domain::connection::{
    ConnectionProbe, ConnectionStatus, ConnectionTestResult, Provider,
};
use crate::domain::errors::{ConnectionTestError, GatewayError};
use crate::domain::notifications::{Notification, Severity};
use crate::domain::ports::{BrokerGateway, ConnectionTester, GatewayResult, PersistenceGateway};
use crate::domain::trading::types::Order;
use crate::domain::user::{UserPreferences, UserRecord, UserUpdate};
use chrono::Utc;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

/// Entry point used by the screens: synchronous mutations go straight to the
/// store, async operations dispatch `Pending` immediately and return a future
/// that settles the operation.
///
/// The returned futures are `'static` and can be spawned or awaited in place.
pub struct DashboardClient {
    store: Store,
    persistence: Arc<dyn PersistenceGateway>,
    broker: Arc<dyn BrokerGateway>,
    testers: HashMap<Provider, Arc<dyn ConnectionTester>>,
    connection_tests: ConnectionTests,
}

impl DashboardClient {
    pub fn new(
        store: Store,
        persistence: Arc<dyn PersistenceGateway>,
        broker: Arc<dyn BrokerGateway>,
    ) -> Self {
        Self {
            store,
            persistence,
            broker,
            testers: HashMap::new(),
            connection_tests: ConnectionTests::new(),
        }
    }

    pub fn with_tester(mut self, tester: Arc<dyn ConnectionTester>) -> Self {
        self.testers.insert(tester.provider(), tester);
        self
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn state(&self) -> Snapshot {
        self.store.state()
    }

    pub fn connection_tests(&self) -> &ConnectionTests {
        &self.connection_tests
    }

    // --- Theme ---

    pub fn toggle_dark_mode(&self) {
        self.store.dispatch(ThemeAction::ToggleDarkMode);
    }

    pub fn set_dark_mode(&self, dark_mode: bool) {
        self.store.dispatch(ThemeAction::SetDarkMode(dark_mode));
    }

    pub fn clear_theme_error(&self) {
        self.store.dispatch(ThemeAction::ClearError);
    }

    pub fn load_user_preferences(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<UserPreferences, String>> + Send + 'static {
        let in_flight = self.store.begin::<LoadUserPreferences>();
        in_flight.settle(fetch_preferences(
            Arc::clone(&self.persistence),
            user_id.to_string(),
        ))
    }

    pub fn save_user_preferences(
        &self,
        user_id: &str,
        preferences: UserPreferences,
    ) -> impl Future<Output = Result<UserPreferences, String>> + Send + 'static {
        let in_flight = self.store.begin::<SaveUserPreferences>();
        in_flight.settle(store_preferences(
            Arc::clone(&self.persistence),
            user_id.to_string(),
            preferences,
        ))
    }

    /// Saves the current `dark_mode` on top of whatever else is stored, so
    /// keys this client does not know about survive.
    pub fn persist_theme(
        &self,
        user_id: &str,
        stored: &UserPreferences,
    ) -> impl Future<Output = Result<UserPreferences, String>> + Send + 'static {
        let mut preferences = stored.clone();
        preferences.merge(&UserPreferences::with_dark_mode(
            self.store.state().theme.dark_mode,
        ));
        self.save_user_preferences(user_id, preferences)
    }

    // --- Auth ---

    pub fn sign_out(&self) {
        self.store.dispatch(AuthAction::SignOut);
    }

    pub fn fetch_current_user(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Option<UserRecord>, String>> + Send + 'static {
        let in_flight = self.store.begin::<FetchCurrentUser>();
        let persistence = Arc::clone(&self.persistence);
        let user_id = user_id.to_string();

        in_flight.settle(async move { persistence.get_user(&user_id).await })
    }

    // --- Portfolio & orders ---

    pub fn refresh_portfolio(
        &self,
    ) -> impl Future<Output = Result<PortfolioSync, String>> + Send + 'static {
        let in_flight = self.store.begin::<RefreshPortfolio>();
        let broker = Arc::clone(&self.broker);

        in_flight.settle(async move {
            broker.get_portfolio().await.map(|snapshot| PortfolioSync {
                snapshot,
                fetched_at: Utc::now(),
            })
        })
    }

    pub fn refresh_orders(
        &self,
    ) -> impl Future<Output = Result<Vec<Order>, String>> + Send + 'static {
        let in_flight = self.store.begin::<RefreshOrders>();
        let broker = Arc::clone(&self.broker);

        in_flight.settle(async move { broker.get_open_orders().await })
    }

    // --- Notifications ---

    pub fn notify(&self, severity: Severity, title: impl Into<String>, body: impl Into<String>) {
        self.store.dispatch(NotificationsAction::Push(Notification::new(
            severity, title, body,
        )));
    }

    pub fn mark_all_notifications_read(&self) {
        self.store.dispatch(NotificationsAction::MarkAllRead);
    }

    // --- Connection tests ---

    /// Starts the connection test for `provider`; the outcome is also pushed
    /// as a notification. Refused while a test for the same provider runs.
    pub fn test_connection(
        &self,
        provider: Provider,
    ) -> Result<impl Future<Output = ConnectionTestResult> + Send + 'static, ConnectionTestError>
    {
        let tester = self
            .testers
            .get(&provider)
            .cloned()
            .unwrap_or_else(|| Arc::new(Unconfigured(provider)) as Arc<dyn ConnectionTester>);
        let running = self.connection_tests.start(tester)?;
        let store = self.store.clone();

        Ok(async move {
            let result = running.await;
            let severity = match result.status {
                ConnectionStatus::Success => Severity::Success,
                _ => Severity::Error,
            };
            store.dispatch(NotificationsAction::Push(Notification::new(
                severity,
                format!("{} connection test", provider),
                result.message.clone().unwrap_or_default(),
            )));
            result
        })
    }
}

async fn fetch_preferences(
    persistence: Arc<dyn PersistenceGateway>,
    user_id: String,
) -> GatewayResult<UserPreferences> {
    let user = persistence.get_user(&user_id).await?;
    Ok(user.map(|u| u.preferences_or_default()).unwrap_or_default())
}

async fn store_preferences(
    persistence: Arc<dyn PersistenceGateway>,
    user_id: String,
    preferences: UserPreferences,
) -> GatewayResult<UserPreferences> {
    persistence
        .update_user(&user_id, UserUpdate::preferences(preferences.clone()))
        .await?;
    Ok(preferences)
}

/// Stand-in tester for providers without credentials.
struct Unconfigured(Provider);

#[async_trait::async_trait]
impl ConnectionTester for Unconfigured {
    fn provider(&self) -> Provider {
        self.0
    }

    async fn test_connection(&self) -> GatewayResult<ConnectionProbe> {
        Err(GatewayError::validation(format!(
            "No credentials configured for {}",
            self.0
        )))
    }
}
