//! Token store port
//!
//! Defines the interface for the durable access/refresh token pair.

use async_trait::async_trait;
use assured_domain::{AccessToken, RefreshToken, TokenPair};

/// Errors that can occur while reading or writing tokens.
#[derive(Debug, thiserror::Error)]
pub enum TokenStoreError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Could not determine where to keep the tokens.
    #[error("Could not determine config directory")]
    NoConfigDir,
}

/// Both stored tokens, as read at one instant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredTokens {
    /// Access token, if any.
    pub access: Option<AccessToken>,
    /// Refresh token, if any.
    pub refresh: Option<RefreshToken>,
}

/// Store for the session tokens.
///
/// Writes must be visible to every read that starts after the write
/// returns.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Reads both tokens.
    async fn load(&self) -> Result<StoredTokens, TokenStoreError>;

    /// Replaces the access token and, when present in `pair`, the refresh token.
    async fn save(&self, pair: &TokenPair) -> Result<(), TokenStoreError>;

    /// Removes both tokens.
    async fn clear(&self) -> Result<(), TokenStoreError>;

    /// Reads the access token.
    async fn access_token(&self) -> Result<Option<AccessToken>, TokenStoreError> {
        Ok(self.load().await?.access)
    }

    /// Reads the refresh token.
    async fn refresh_token(&self) -> Result<Option<RefreshToken>, TokenStoreError> {
        Ok(self.load().await?.refresh)
    }
}
