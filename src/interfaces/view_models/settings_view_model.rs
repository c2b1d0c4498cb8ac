use crate::application::connection_tests::ConnectionResults;
use crate::application::store::ApplicationState;
use crate::domain::connection::{ConnectionStatus, Provider};

/// One connection row on the settings screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionChip {
    pub provider: Provider,
    pub status: ConnectionStatus,
    pub label: String,
    /// The "Test" button is disabled while a test is running.
    pub can_test: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsMetrics {
    pub dark_mode: bool,
    pub is_loading: bool,
    /// Inline alert above the preferences form.
    pub alert: Option<String>,
    pub connections: Vec<ConnectionChip>,
}

pub struct SettingsViewModel;

impl SettingsViewModel {
    pub fn get_metrics(state: &ApplicationState, results: &ConnectionResults) -> SettingsMetrics {
        SettingsMetrics {
            dark_mode: state.theme.dark_mode,
            is_loading: state.theme.is_loading(),
            alert: state.theme.error().map(str::to_string),
            connections: Provider::ALL
                .iter()
                .map(|provider| Self::get_chip(*provider, results))
                .collect(),
        }
    }

    pub fn get_chip(provider: Provider, results: &ConnectionResults) -> ConnectionChip {
        let result = results.get(&provider).cloned().unwrap_or_default();
        let label = match result.status {
            ConnectionStatus::Idle => "Not tested".to_string(),
            ConnectionStatus::Testing => "Testing...".to_string(),
            ConnectionStatus::Success => result.message.unwrap_or_else(|| "Connected".to_string()),
            ConnectionStatus::Error => result
                .message
                .unwrap_or_else(|| "Connection failed".to_string()),
        };

        ConnectionChip {
            provider,
            status: result.status,
            label,
            can_test: result.status != ConnectionStatus::Testing,
        }
    }
}
