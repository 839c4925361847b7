//! In-memory token storage.

use std::sync::Arc;

use async_trait::async_trait;
use assured_domain::TokenPair;
use tokio::sync::RwLock;

use crate::ports::{StoredTokens, TokenStore, TokenStoreError};

/// Thread-safe in-memory token store.
///
/// Tokens live for the lifetime of the process. Clones share the same
/// storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    tokens: Arc<RwLock<StoredTokens>>,
}

impl MemoryTokenStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with a session.
    #[must_use]
    pub fn with_tokens(pair: TokenPair) -> Self {
        Self {
            tokens: Arc::new(RwLock::new(StoredTokens {
                access: Some(pair.access),
                refresh: pair.refresh,
            })),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<StoredTokens, TokenStoreError> {
        Ok(self.tokens.read().await.clone())
    }

    async fn save(&self, pair: &TokenPair) -> Result<(), TokenStoreError> {
        let mut tokens = self.tokens.write().await;
        tokens.access = Some(pair.access.clone());
        if let Some(refresh) = &pair.refresh {
            tokens.refresh = Some(refresh.clone());
        }
        Ok(())
    }

    async fn clear(&self) -> Result<(), TokenStoreError> {
        *self.tokens.write().await = StoredTokens::default();
        Ok(())
    }
}
