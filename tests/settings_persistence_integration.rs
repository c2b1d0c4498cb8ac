mod common;

use common::client_with;
use rustrade_dashboard::application::store::Store;
use rustrade_dashboard::domain::ports::PersistenceGateway;
use rustrade_dashboard::domain::user::{UserPreferences, UserRecord, UserUpdate};
use rustrade_dashboard::infrastructure::settings_persistence::{
    JsonFilePersistenceGateway, PersistedUsers,
};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

fn temp_settings_path() -> PathBuf {
    std::env::temp_dir()
        .join(format!("rustrade-dashboard-it-{}", uuid::Uuid::new_v4()))
        .join("users.json")
}

#[test]
fn test_default_path_under_home() {
    let path = JsonFilePersistenceGateway::default_path();
    if std::env::var("HOME").is_ok() {
        let path = path.unwrap();
        assert!(path.ends_with(".rustrade/users.json"));
    } else {
        assert!(path.is_err());
    }
}

#[test]
fn test_serialization_roundtrip() {
    let raw = json!({
        "users": {
            "u1": {
                "id": "u1",
                "name": "Ada",
                "email": "ada@example.com",
                "preferences": { "darkMode": false, "language": "fr" }
            }
        }
    });

    let users: PersistedUsers = serde_json::from_value(raw.clone()).expect("Failed to deserialize");
    let user = &users.users["u1"];
    assert_eq!(user.name, "Ada");
    assert_eq!(user.preferences_or_default().dark_mode, Some(false));

    let back = serde_json::to_value(&users).expect("Failed to serialize");
    assert_eq!(back, raw);
}

#[tokio::test]
async fn test_theme_survives_restart() {
    let path = temp_settings_path();

    {
        let gateway = JsonFilePersistenceGateway::new(&path);
        let mut user = UserRecord::new("u1");
        user.preferences = Some(
            serde_json::from_value(json!({ "darkMode": true, "language": "fr" })).unwrap(),
        );
        gateway.ensure_user(user).await.unwrap();

        let client = client_with(Store::new(), Arc::new(gateway));
        let stored = client.load_user_preferences("u1").await.unwrap();
        client.toggle_dark_mode();
        client.persist_theme("u1", &stored).await.unwrap();
    }

    let client = client_with(
        Store::new(),
        Arc::new(JsonFilePersistenceGateway::new(&path)),
    );
    assert!(client.state().theme.dark_mode);
    let reloaded = client.load_user_preferences("u1").await.unwrap();

    assert!(!client.state().theme.dark_mode);
    assert_eq!(reloaded.extra.get("language"), Some(&json!("fr")));
}

#[tokio::test]
async fn test_ensure_user_does_not_clobber_existing_record() {
    let gateway = JsonFilePersistenceGateway::new(temp_settings_path());
    gateway.ensure_user(UserRecord::new("u1")).await.unwrap();
    gateway
        .update_user(
            "u1",
            UserUpdate {
                name: Some("Ada".to_string()),
                preferences: Some(UserPreferences::with_dark_mode(false)),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    gateway.ensure_user(UserRecord::new("u1")).await.unwrap();

    let user = gateway.get_user("u1").await.unwrap().unwrap();
    assert_eq!(user.name, "Ada");
    assert_eq!(user.preferences_or_default().dark_mode, Some(false));
}
