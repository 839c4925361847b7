//! Token persistence on disk.
//!
//! Stores the session tokens in the platform-specific config directory:
//! - Linux: ~/.config/assured/tokens.json
//! - macOS: ~/Library/Application Support/assured/tokens.json
//! - Windows: %APPDATA%/assured/tokens.json

use std::path::{Path, PathBuf};

use assured_application::ports::{StoredTokens, TokenStore, TokenStoreError};
use assured_domain::{AccessToken, RefreshToken, TokenPair};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::Mutex;

use crate::serialization::{from_json_bytes, to_json_stable_bytes};

const APP_DIR: &str = "assured";
const TOKEN_FILE: &str = "tokens.json";

/// On-disk layout; keys match the browser storage keys.
#[derive(Debug, Default, Serialize, Deserialize)]
struct TokenFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    access_token: Option<AccessToken>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<RefreshToken>,
}

impl From<TokenFile> for StoredTokens {
    fn from(file: TokenFile) -> Self {
        Self {
            access: file.access_token,
            refresh: file.refresh_token,
        }
    }
}

/// Token store backed by a JSON file.
///
/// Every operation reads or rewrites the whole file under a lock, so a
/// reader never observes half of a write made through the same store.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileTokenStore {
    /// Creates a store at an explicit path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Creates a store in the platform config directory.
    ///
    /// # Errors
    ///
    /// Returns [`TokenStoreError::NoConfigDir`] if the platform has none.
    pub fn default_location() -> Result<Self, TokenStoreError> {
        dirs::config_dir()
            .map(|dir| Self::new(dir.join(APP_DIR).join(TOKEN_FILE)))
            .ok_or(TokenStoreError::NoConfigDir)
    }

    /// Path of the token file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<TokenFile, TokenStoreError> {
        if !fs::try_exists(&self.path).await? {
            return Ok(TokenFile::default());
        }
        let content = fs::read(&self.path).await?;
        from_json_bytes(&content).map_err(|e| TokenStoreError::Serialization(e.to_string()))
    }

    async fn write(&self, file: &TokenFile) -> Result<(), TokenStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let content =
            to_json_stable_bytes(file).map_err(|e| TokenStoreError::Serialization(e.to_string()))?;

        // Write to a sibling then rename so the file is never truncated.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<StoredTokens, TokenStoreError> {
        let _guard = self.lock.lock().await;
        Ok(self.read().await?.into())
    }

    async fn save(&self, pair: &TokenPair) -> Result<(), TokenStoreError> {
        let _guard = self.lock.lock().await;
        let mut file = self.read().await?;
        file.access_token = Some(pair.access.clone());
        if let Some(refresh) = &pair.refresh {
            file.refresh_token = Some(refresh.clone());
        }
        self.write(&file).await?;
        tracing::debug!(path = %self.path.display(), "tokens saved");
        Ok(())
    }

    async fn clear(&self) -> Result<(), TokenStoreError> {
        let _guard = self.lock.lock().await;
        match fs::remove_file(&self.path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        tracing::debug!(path = %self.path.display(), "tokens cleared");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn pair(access: &str, refresh: Option<&str>) -> TokenPair {
        TokenPair {
            access: AccessToken::new(access).unwrap(),
            refresh: refresh.map(|r| RefreshToken::new(r).unwrap()),
        }
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::new(dir.path().join("tokens.json"));

        assert_eq!(store.load().await.unwrap(), StoredTokens::default());
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_file_layout() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("tokens.json");
        let store = FileTokenStore::new(&path);

        store.save(&pair("A1", Some("R1"))).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "{\n  \"access_token\": \"A1\",\n  \"refresh_token\": \"R1\"\n}\n"
        );
    }

    #[tokio::test]
    async fn test_save_without_refresh_keeps_existing() {
        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::new(dir.path().join("tokens.json"));

        store.save(&pair("A1", Some("R1"))).await.unwrap();
        store.save(&pair("A2", None)).await.unwrap();

        let tokens = store.load().await.unwrap();
        assert_eq!(tokens.access.unwrap().as_str(), "A2");
        assert_eq!(tokens.refresh.unwrap().as_str(), "R1");
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tokens.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = FileTokenStore::new(&path).load().await.unwrap_err();
        assert!(matches!(err, TokenStoreError::Serialization(_)));
    }
}
