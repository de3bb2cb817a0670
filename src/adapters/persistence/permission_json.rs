//! JSON file storage for the notification permission choice.
//!
//! Mirrors the browser permission model: once granted or denied, the answer
//! sticks across restarts until the user changes it.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::domain::{DomainError, NotifyPermission};

#[derive(Debug, Default, Serialize, Deserialize)]
struct PermissionData {
    notifications: NotifyPermission,
}

/// JSON file-based permission storage.
pub struct PermissionStore {
    path: std::path::PathBuf,
    cache: tokio::sync::RwLock<PermissionData>,
}

impl PermissionStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            cache: tokio::sync::RwLock::new(PermissionData::default()),
        }
    }

    /// Load state from disk. A missing or corrupt file resets to `Default`.
    pub async fn load(&self) -> Result<(), DomainError> {
        let data = match fs::read_to_string(&self.path).await {
            Ok(s) => serde_json::from_str(&s).unwrap_or_default(),
            Err(_) => PermissionData::default(),
        };
        *self.cache.write().await = data;
        Ok(())
    }

    pub async fn permission(&self) -> NotifyPermission {
        self.cache.read().await.notifications
    }

    pub async fn set_permission(&self, permission: NotifyPermission) -> Result<(), DomainError> {
        self.cache.write().await.notifications = permission;
        self.save().await
    }

    /// Atomic save using write-replace: temp file, sync, rename. A crash
    /// mid-write leaves the previous file intact.
    async fn save(&self) -> Result<(), DomainError> {
        let data = self.cache.read().await;
        let json =
            serde_json::to_string_pretty(&*data).map_err(|e| DomainError::State(e.to_string()))?;

        let temp_path = self.path.with_extension("json.tmp");
        let mut f = fs::File::create(&temp_path)
            .await
            .map_err(|e| DomainError::State(format!("create temp file: {}", e)))?;
        f.write_all(json.as_bytes())
            .await
            .map_err(|e| DomainError::State(format!("write temp file: {}", e)))?;
        f.sync_all()
            .await
            .map_err(|e| DomainError::State(format!("sync temp file: {}", e)))?;
        drop(f);

        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| DomainError::State(format!("atomic rename failed: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn permission_round_trips_through_disk() {
        let dir = std::env::temp_dir().join("medtrack-test-permission");
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("state.json");
        tokio::fs::remove_file(&path).await.ok();

        let store = PermissionStore::new(&path);
        store.load().await.unwrap();
        assert_eq!(store.permission().await, NotifyPermission::Default);

        store
            .set_permission(NotifyPermission::Granted)
            .await
            .unwrap();

        let reopened = PermissionStore::new(&path);
        reopened.load().await.unwrap();
        assert_eq!(reopened.permission().await, NotifyPermission::Granted);
        tokio::fs::remove_file(&path).await.ok();
    }
}
