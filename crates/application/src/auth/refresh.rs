//! Coalesced access-token renewal.
//!
//! Every request records the session generation before it is dispatched.
//! When a 401 comes back the request enters [`RefreshCoordinator::renew`],
//! which runs at most one refresh at a time. A request that finds the
//! generation moved on while it waited reuses whatever the previous holder
//! left in the store instead of refreshing again.

use std::sync::atomic::{AtomicU64, Ordering};

use assured_domain::request::RequestBody;
use assured_domain::{
    AccessToken, ApiRequest, RefreshToken, SessionEndReason, SessionEvent, TokenPair,
};
use serde::Deserialize;
use tokio::sync::{Mutex, MutexGuard};

use super::SessionEvents;
use crate::ports::{HttpTransport, TokenStore, TokenStoreError};

/// Path of the token refresh endpoint, relative to the base URL.
pub const REFRESH_PATH: &str = "/accounts/token/refresh/";

/// Outcome of a renewal attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Renewal {
    /// A usable access token is stored; retry with it.
    Renewed(AccessToken),
    /// This call tore the session down.
    Ended(SessionEndReason),
    /// A concurrent request already tore the session down.
    AlreadyEnded,
}

/// Body returned by the refresh endpoint.
#[derive(Debug, Deserialize)]
struct RefreshResponse {
    #[serde(default)]
    access: Option<String>,
    #[serde(default)]
    refresh: Option<String>,
}

impl RefreshResponse {
    fn into_pair(self) -> Option<TokenPair> {
        let access = AccessToken::new(self.access?).ok()?;
        let refresh = self.refresh.and_then(|r| RefreshToken::new(r).ok());
        Some(TokenPair { access, refresh })
    }
}

/// Serializes refreshes and tracks the session generation.
#[derive(Debug, Default)]
pub struct RefreshCoordinator {
    lock: Mutex<()>,
    generation: AtomicU64,
}

impl RefreshCoordinator {
    /// Creates a coordinator at generation zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current session generation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Takes the session lock.
    ///
    /// Held by login and logout while they rewrite the store so that a
    /// refresh cannot interleave with them.
    pub async fn lock(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().await
    }

    /// Marks the stored credentials as changed.
    ///
    /// Call while holding [`Self::lock`].
    pub fn advance(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Renews the session after a 401.
    ///
    /// `observed` is the generation read before the failed request was
    /// dispatched.
    ///
    /// # Errors
    ///
    /// Returns [`TokenStoreError`] when the store cannot be read or written.
    /// On a failed teardown the [`SessionEvent::LoginRequired`] event has
    /// already been emitted.
    pub async fn renew(
        &self,
        observed: u64,
        transport: &dyn HttpTransport,
        store: &dyn TokenStore,
        events: &SessionEvents,
    ) -> Result<Renewal, TokenStoreError> {
        let _guard = self.lock.lock().await;

        if self.generation() != observed {
            tracing::debug!(observed, current = self.generation(), "session already renewed");
            return Ok(match store.access_token().await? {
                Some(access) => Renewal::Renewed(access),
                None => Renewal::AlreadyEnded,
            });
        }

        let outcome = match store.refresh_token().await? {
            Some(refresh) => Self::exchange(transport, &refresh).await,
            None => Err(SessionEndReason::MissingRefreshToken),
        };

        match outcome {
            Ok(pair) => {
                store.save(&pair).await?;
                self.advance();
                let preview = assured_domain::auth::token_preview(pair.access.as_str());
                tracing::info!(token = %preview, rotated = pair.refresh.is_some(), "access token refreshed");
                events.emit(SessionEvent::TokenRefreshed {
                    token_preview: preview,
                });
                Ok(Renewal::Renewed(pair.access))
            }
            Err(reason) => {
                let cleared = store.clear().await;
                self.advance();
                tracing::warn!(?reason, "session ended, login required");
                events.emit(SessionEvent::LoginRequired { reason });
                cleared?;
                Ok(Renewal::Ended(reason))
            }
        }
    }

    /// Calls the refresh endpoint without an `Authorization` header.
    async fn exchange(
        transport: &dyn HttpTransport,
        refresh: &RefreshToken,
    ) -> Result<TokenPair, SessionEndReason> {
        let request = ApiRequest::post(REFRESH_PATH).with_body(RequestBody::Json(
            serde_json::json!({ "refresh": refresh.as_str() }),
        ));

        let response = match transport.send(&request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "refresh endpoint unreachable");
                return Err(SessionEndReason::RefreshUnreachable);
            }
        };

        if !response.is_success() {
            tracing::warn!(status = response.status, "refresh token rejected");
            return Err(SessionEndReason::RefreshRejected);
        }

        response
            .json::<RefreshResponse>()
            .ok()
            .and_then(RefreshResponse::into_pair)
            .ok_or(SessionEndReason::MalformedRefreshResponse)
    }
}
