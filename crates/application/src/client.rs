//! Authenticated API client
//!
//! Attaches the stored bearer token to every request and recovers from a
//! 401 by refreshing the access token and replaying the request once.

use std::sync::Arc;

use assured_domain::request::AUTHORIZATION;
use assured_domain::{
    ApiRequest, ApiResponse, PendingRequest, QueryParams, RequestBody, RequestPhase,
    SessionEvent, TokenPair, TokenStatus,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::broadcast;
use tracing::Instrument;
use uuid::Uuid;

use crate::auth::{RefreshCoordinator, Renewal, SessionEvents};
use crate::error::{ClientError, ClientResult};
use crate::ports::{HttpTransport, TokenStore};

/// HTTP client for the marketplace API.
///
/// The client is `Send + Sync`; share it through an `Arc`. Concurrent 401s
/// share a single refresh call.
pub struct AuthenticatedClient {
    transport: Arc<dyn HttpTransport>,
    store: Arc<dyn TokenStore>,
    events: SessionEvents,
    refresh: RefreshCoordinator,
}

impl std::fmt::Debug for AuthenticatedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatedClient")
            .field("generation", &self.refresh.generation())
            .finish_non_exhaustive()
    }
}

impl AuthenticatedClient {
    /// Creates a client over the given transport and token store.
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>, store: Arc<dyn TokenStore>) -> Self {
        Self {
            transport,
            store,
            events: SessionEvents::new(),
            refresh: RefreshCoordinator::new(),
        }
    }

    /// Subscribes to session events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Event channel shared with the services.
    #[must_use]
    pub const fn events(&self) -> &SessionEvents {
        &self.events
    }

    /// Sends a request with the stored credentials.
    ///
    /// A 401 triggers at most one token refresh and one replay. If the
    /// session cannot be renewed the tokens are purged, a
    /// [`SessionEvent::LoginRequired`] is emitted and the original 401 is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for non-2xx responses, transport failures,
    /// token store failures and invalid requests.
    pub async fn request(&self, request: ApiRequest) -> ClientResult<ApiResponse> {
        request.validate()?;

        let span = tracing::debug_span!(
            "api_request",
            request_id = %Uuid::now_v7(),
            method = %request.method,
            path = %request.path,
        );
        self.execute(PendingRequest::new(request))
            .instrument(span)
            .await
    }

    async fn execute(&self, mut pending: PendingRequest) -> ClientResult<ApiResponse> {
        let mut phase = RequestPhase::Sent;

        loop {
            let (generation, response) = self.dispatch(&pending.request).await?;

            if !pending.can_retry() {
                enter(&mut phase, RequestPhase::after_retry(response.status))?;
                return finish(response);
            }

            enter(&mut phase, RequestPhase::after_first_response(response.status))?;
            if phase != RequestPhase::FailedAuthFirstAttempt {
                return finish(response);
            }

            enter(&mut phase, RequestPhase::Refreshing)?;
            let renewal = self
                .refresh
                .renew(generation, &*self.transport, &*self.store, &self.events)
                .await?;

            match renewal {
                Renewal::Renewed(_) => pending = pending.into_retry(),
                Renewal::Ended(_) | Renewal::AlreadyEnded => {
                    enter(&mut phase, RequestPhase::RefreshFailedTerminal)?;
                    return Err(ClientError::Auth {
                        response,
                        session_ended: true,
                    });
                }
            }
        }
    }

    /// Puts one attempt on the wire with the token stored right now.
    ///
    /// Returns the session generation observed before the token was read.
    async fn dispatch(&self, request: &ApiRequest) -> ClientResult<(u64, ApiResponse)> {
        let generation = self.refresh.generation();
        let mut outgoing = request.clone();

        let token = self.store.access_token().await?;
        match &token {
            Some(token) => outgoing.headers.set(AUTHORIZATION, token.bearer_header()),
            None => outgoing.headers.remove(AUTHORIZATION),
        }

        tracing::debug!(generation, authenticated = token.is_some(), "dispatching");
        let response = self.transport.send(&outgoing).await?;
        tracing::debug!(
            status = response.status,
            elapsed_ms = u64::try_from(response.duration.as_millis()).unwrap_or(u64::MAX),
            "response received"
        );

        Ok((generation, response))
    }

    /// Sends a request without credentials and without the refresh flow.
    ///
    /// Used for the token endpoints themselves.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for non-2xx responses and transport failures.
    pub async fn request_anonymous(&self, mut request: ApiRequest) -> ClientResult<ApiResponse> {
        request.validate()?;
        request.headers.remove(AUTHORIZATION);

        let span = tracing::debug_span!(
            "api_request",
            request_id = %Uuid::now_v7(),
            method = %request.method,
            path = %request.path,
        );
        async {
            let response = self.transport.send(&request).await?;
            tracing::debug!(status = response.status, "anonymous response received");
            finish(response)
        }
        .instrument(span)
        .await
    }

    /// GET `path`.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn get(&self, path: &str) -> ClientResult<ApiResponse> {
        self.request(ApiRequest::get(path)).await
    }

    /// GET `path` with query parameters.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn get_with_query(&self, path: &str, query: QueryParams) -> ClientResult<ApiResponse> {
        self.request(ApiRequest::get(path).with_query(query)).await
    }

    /// POST a body to `path`.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn post(&self, path: &str, body: impl Into<RequestBody>) -> ClientResult<ApiResponse> {
        self.request(ApiRequest::post(path).with_body(body)).await
    }

    /// PUT a body to `path`.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn put(&self, path: &str, body: impl Into<RequestBody>) -> ClientResult<ApiResponse> {
        self.request(ApiRequest::put(path).with_body(body)).await
    }

    /// PATCH a body to `path`.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn patch(&self, path: &str, body: impl Into<RequestBody>) -> ClientResult<ApiResponse> {
        self.request(ApiRequest::patch(path).with_body(body)).await
    }

    /// DELETE `path`.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn delete(&self, path: &str) -> ClientResult<ApiResponse> {
        self.request(ApiRequest::delete(path)).await
    }

    /// Sends a request and decodes the JSON response.
    ///
    /// # Errors
    ///
    /// See [`Self::request`]; also [`ClientError::Decode`] when the body
    /// does not match `T`.
    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> ClientResult<T> {
        decode(&self.request(request).await?)
    }

    /// GET `path` and decode the JSON response.
    ///
    /// # Errors
    ///
    /// See [`Self::send_json`].
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send_json(ApiRequest::get(path)).await
    }

    /// POST `body` as JSON to `path` and decode the JSON response.
    ///
    /// # Errors
    ///
    /// See [`Self::send_json`].
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(ApiRequest::post(path).with_json(body)?).await
    }

    /// PATCH `body` as JSON to `path` and decode the JSON response.
    ///
    /// # Errors
    ///
    /// See [`Self::send_json`].
    pub async fn patch_json<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(ApiRequest::patch(path).with_json(body)?).await
    }

    /// PUT `body` as JSON to `path` and decode the JSON response.
    ///
    /// # Errors
    ///
    /// See [`Self::send_json`].
    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(ApiRequest::put(path).with_json(body)?).await
    }

    /// Stores a freshly issued token pair.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Storage`] when the store cannot be written.
    pub async fn store_tokens(&self, pair: &TokenPair) -> ClientResult<()> {
        let _guard = self.refresh.lock().await;
        self.store.clear().await?;
        self.store.save(pair).await?;
        self.refresh.advance();
        Ok(())
    }

    /// Removes both tokens.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Storage`] when the store cannot be written.
    pub async fn clear_session(&self) -> ClientResult<()> {
        let _guard = self.refresh.lock().await;
        self.store.clear().await?;
        self.refresh.advance();
        Ok(())
    }

    /// Returns true if an access token is stored.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Storage`] when the store cannot be read.
    pub async fn has_session(&self) -> ClientResult<bool> {
        Ok(self.store.access_token().await?.is_some())
    }

    /// Evaluates the stored session against the current time.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Storage`] when the store cannot be read.
    pub async fn session_status(&self) -> ClientResult<TokenStatus> {
        let tokens = self.store.load().await?;
        Ok(TokenStatus::evaluate(
            tokens.access.as_ref(),
            tokens.refresh.as_ref(),
            chrono::Utc::now(),
        ))
    }
}

fn enter(phase: &mut RequestPhase, next: RequestPhase) -> ClientResult<()> {
    *phase = phase.transition(next)?;
    tracing::debug!(phase = ?next, "request phase");
    Ok(())
}

fn finish(response: ApiResponse) -> ClientResult<ApiResponse> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(ClientError::from_response(response))
    }
}

pub(crate) fn decode<T: DeserializeOwned>(response: &ApiResponse) -> ClientResult<T> {
    response
        .json()
        .map_err(|e| ClientError::Decode(e.to_string()))
}
