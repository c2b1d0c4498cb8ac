use crate::domain::errors::GatewayError;
use crate::domain::ports::{GatewayResult, PersistenceGateway};
use crate::domain::user::{UserRecord, UserUpdate};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersistedUsers {
    #[serde(default)]
    pub users: BTreeMap<String, UserRecord>,
}

/// Persistence gateway backed by a JSON file, for running the dashboard
/// without a remote user service.
pub struct JsonFilePersistenceGateway {
    file_path: PathBuf,
    // Serializes read-modify-write cycles.
    lock: Mutex<()>,
}

impl JsonFilePersistenceGateway {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            lock: Mutex::new(()),
        }
    }

    /// `~/.rustrade/users.json`
    pub fn default_path() -> Result<PathBuf> {
        let home = std::env::var("HOME").context("Could not find HOME directory")?;
        Ok(PathBuf::from(home).join(".rustrade").join("users.json"))
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    pub async fn load(&self) -> Result<PersistedUsers> {
        if !fs::try_exists(&self.file_path).await.unwrap_or(false) {
            return Ok(PersistedUsers::default());
        }

        let content = fs::read_to_string(&self.file_path)
            .await
            .context("Failed to read users file")?;
        let users: PersistedUsers =
            serde_json::from_str(&content).context("Failed to parse users JSON")?;

        debug!("Loaded {} users from {:?}", users.users.len(), self.file_path);
        Ok(users)
    }

    pub async fn save(&self, users: &PersistedUsers) -> Result<()> {
        if let Some(dir) = self.file_path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir)
                .await
                .context("Failed to create config directory")?;
        }

        let content =
            serde_json::to_string_pretty(users).context("Failed to serialize users")?;

        // Atomic write: write to temp file then rename
        let temp_path = self.file_path.with_extension("tmp");
        fs::write(&temp_path, content)
            .await
            .context("Failed to write temp users file")?;
        fs::rename(&temp_path, &self.file_path)
            .await
            .context("Failed to rename users file")?;

        info!("Saved users to {:?}", self.file_path);
        Ok(())
    }

    /// Creates the user if missing; existing records are left alone.
    pub async fn ensure_user(&self, user: UserRecord) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut users = self.load().await?;
        if users.users.contains_key(&user.id) {
            return Ok(());
        }
        users.users.insert(user.id.clone(), user);
        self.save(&users).await
    }
}

fn storage_error(err: anyhow::Error) -> GatewayError {
    GatewayError::storage(format!("{:#}", err))
}

#[async_trait]
impl PersistenceGateway for JsonFilePersistenceGateway {
    async fn get_user(&self, user_id: &str) -> GatewayResult<Option<UserRecord>> {
        let _guard = self.lock.lock().await;
        let users = self.load().await.map_err(storage_error)?;
        Ok(users.users.get(user_id).cloned())
    }

    async fn update_user(&self, user_id: &str, update: UserUpdate) -> GatewayResult<()> {
        let _guard = self.lock.lock().await;
        let mut users = self.load().await.map_err(storage_error)?;

        let user = users
            .users
            .get_mut(user_id)
            .ok_or_else(|| GatewayError::NotFound {
                user_id: user_id.to_string(),
            })?;
        user.apply(&update);

        self.save(&users).await.map_err(storage_error)
    }
}
