use rustrade_dashboard::application::store::Store;
use rustrade_dashboard::config::{Config, DEFAULT_LOG_FILTER};
use rustrade_dashboard::domain::connection::Provider;
use rustrade_dashboard::infrastructure::ServiceFactory;
use rustrade_dashboard::interfaces::view_models::{NavigationViewModel, SettingsViewModel};

use futures_util::future::join_all;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 0. Load Env (before reading any config)
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    // 1. Logging
    let filter = EnvFilter::try_new(&config.observability.log_filter).unwrap_or_else(|e| {
        eprintln!(
            "Invalid log filter '{}': {}",
            config.observability.log_filter, e
        );
        EnvFilter::new(DEFAULT_LOG_FILTER)
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    info!(
        "Starting dashboard session for '{}' ({:?} mode, {:?})",
        config.session.user_id, config.mode, config.session.resolution_policy
    );

    // 2. Store + gateways
    let store = Store::with_policy(config.session.resolution_policy);
    let _logger = store.subscribe(|state| {
        debug!(
            "State changed: dark_mode={} theme_loading={} orders={} unread={}",
            state.theme.dark_mode,
            state.theme.is_loading(),
            state.orders_badge_count(),
            state.unread_notification_count()
        );
    });

    let services = ServiceFactory::create_services(&config).await?;
    let client = services.into_client(store);
    let user_id = config.session.user_id.as_str();

    // 3. Session bootstrap
    if let Err(reason) = client.fetch_current_user(user_id).await {
        warn!("Could not sign in '{}': {}", user_id, reason);
    }
    match client.load_user_preferences(user_id).await {
        Ok(preferences) => info!("Preferences loaded: dark_mode={:?}", preferences.dark_mode),
        Err(reason) => warn!("Preferences not loaded: {}", reason),
    }

    // 4. Connection tests, both providers concurrently
    let mut tests = Vec::new();
    for provider in Provider::ALL {
        match client.test_connection(provider) {
            Ok(test) => tests.push(test),
            Err(e) => warn!("{}", e),
        }
    }
    for result in join_all(tests).await {
        debug!("Connection test settled: {:?}", result);
    }

    // 5. Broker data
    let (portfolio, orders) = tokio::join!(client.refresh_portfolio(), client.refresh_orders());
    match portfolio {
        Ok(sync) => info!(
            "Portfolio: {} positions, equity {}",
            sync.snapshot.positions.len(),
            sync.snapshot.total_equity()
        ),
        Err(reason) => warn!("Portfolio refresh failed: {}", reason),
    }
    if let Err(reason) = orders {
        warn!("Orders refresh failed: {}", reason);
    }

    // 6. Report what the screens would render
    let state = client.state();
    let navigation = NavigationViewModel::get_metrics(&state);
    let settings = SettingsViewModel::get_metrics(&state, &client.connection_tests().results());
    info!("Navigation: {:?}", navigation);
    info!(
        "Settings: dark_mode={} loading={} alert={:?}",
        settings.dark_mode, settings.is_loading, settings.alert
    );
    for chip in &settings.connections {
        info!("  {}: {}", chip.provider, chip.label);
    }

    Ok(())
}
