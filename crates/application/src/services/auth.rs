//! Account and session endpoints.

use assured_domain::validation::{validate_credentials, validate_registration};
use assured_domain::{
    ApiRequest, Credentials, MultipartForm, RefreshToken, RegisterRequest, SessionEvent,
    TokenPair, User,
};
use serde::Deserialize;
use serde_json::Value;

use crate::auth::REFRESH_PATH;
use crate::client::{AuthenticatedClient, decode};
use crate::error::{ClientResult, ErrorKind};

const TOKEN_PATH: &str = "/accounts/token/";
const REGISTER_PATH: &str = "/accounts/register/";
const ME_PATH: &str = "/accounts/me/";
const KYC_UPLOAD_PATH: &str = "/accounts/kyc/upload/";
const KYC_STATUS_PATH: &str = "/accounts/kyc/status/";

/// Result of a registration.
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    /// Response body as returned by the server.
    pub body: Value,
    /// Whether the response carried tokens that were stored.
    pub logged_in: bool,
}

#[derive(Debug, Deserialize)]
struct RefreshBody {
    access: assured_domain::AccessToken,
    #[serde(default)]
    refresh: Option<RefreshToken>,
}

/// Account, token and KYC endpoints.
#[derive(Debug, Clone, Copy)]
pub struct AuthService<'a> {
    client: &'a AuthenticatedClient,
}

impl<'a> AuthService<'a> {
    /// Creates the service.
    #[must_use]
    pub const fn new(client: &'a AuthenticatedClient) -> Self {
        Self { client }
    }

    /// Exchanges credentials for a token pair and stores it.
    ///
    /// Input is validated before anything is sent. Any previous session is
    /// replaced.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad input, or the server's error.
    pub async fn login(&self, credentials: &Credentials) -> ClientResult<TokenPair> {
        validate_credentials(credentials)?;

        let request = ApiRequest::post(TOKEN_PATH).with_json(credentials)?;
        let pair: TokenPair = decode(&self.client.request_anonymous(request).await?)?;
        self.client.store_tokens(&pair).await?;

        tracing::info!(username = %credentials.username, "logged in");
        self.client.events().emit(SessionEvent::LoggedIn {
            username: Some(credentials.username.clone()),
        });
        Ok(pair)
    }

    /// Creates an account.
    ///
    /// When the server answers with tokens (either at the top level or
    /// under `tokens`) they are stored and the user is logged in.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad input, or the server's error.
    pub async fn register(&self, payload: &RegisterRequest) -> ClientResult<Registration> {
        validate_registration(payload)?;

        let request = ApiRequest::post(REGISTER_PATH).with_json(payload)?;
        let body: Value = decode(&self.client.request_anonymous(request).await?)?;

        let tokens = body
            .get("tokens")
            .unwrap_or(&body)
            .clone();
        let logged_in = match serde_json::from_value::<TokenPair>(tokens) {
            Ok(pair) => {
                self.client.store_tokens(&pair).await?;
                tracing::info!(username = %payload.username, "registered and logged in");
                self.client.events().emit(SessionEvent::LoggedIn {
                    username: Some(payload.username.clone()),
                });
                true
            }
            Err(_) => {
                tracing::info!(username = %payload.username, "registered");
                false
            }
        };

        Ok(Registration { body, logged_in })
    }

    /// Fetches the logged-in user.
    ///
    /// # Errors
    ///
    /// Returns the server's error; 401 goes through the refresh flow.
    pub async fn me(&self) -> ClientResult<User> {
        self.client.get_json(ME_PATH).await
    }

    /// Forgets the stored session. Nothing is sent to the server.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the tokens cannot be removed.
    pub async fn logout(&self) -> ClientResult<()> {
        self.client.clear_session().await?;
        tracing::info!("logged out");
        self.client.events().emit(SessionEvent::LoggedOut);
        Ok(())
    }

    /// Loads the user for a stored session.
    ///
    /// Returns `None` when there is no session or the server no longer
    /// accepts it, in which case the tokens are removed. Transport and
    /// server failures are returned without touching the session.
    ///
    /// # Errors
    ///
    /// Returns transport, server and storage errors.
    pub async fn restore_session(&self) -> ClientResult<Option<User>> {
        if !self.client.has_session().await? {
            return Ok(None);
        }

        match self.me().await {
            Ok(user) => Ok(Some(user)),
            Err(e) if matches!(e.kind(), ErrorKind::Auth | ErrorKind::Client) => {
                tracing::info!(error = %e, "stored session rejected");
                self.client.clear_session().await?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Exchanges a refresh token for a new access token and stores it.
    ///
    /// The given refresh token is kept unless the server rotates it.
    ///
    /// # Errors
    ///
    /// Returns the server's error; the stored session is left unchanged.
    pub async fn refresh(&self, refresh: &RefreshToken) -> ClientResult<TokenPair> {
        let request = ApiRequest::post(REFRESH_PATH)
            .with_json(&serde_json::json!({ "refresh": refresh.as_str() }))?;
        let body: RefreshBody = decode(&self.client.request_anonymous(request).await?)?;

        let pair = TokenPair {
            access: body.access,
            refresh: body.refresh.or_else(|| Some(refresh.clone())),
        };
        self.client.store_tokens(&pair).await?;
        self.client.events().emit(SessionEvent::TokenRefreshed {
            token_preview: assured_domain::auth::token_preview(pair.access.as_str()),
        });
        Ok(pair)
    }

    /// Uploads KYC documents as multipart form data.
    ///
    /// # Errors
    ///
    /// Returns the server's error.
    pub async fn upload_kyc(&self, form: MultipartForm) -> ClientResult<Value> {
        self.client
            .send_json(ApiRequest::post(KYC_UPLOAD_PATH).with_body(form))
            .await
    }

    /// Fetches the KYC verification status.
    ///
    /// # Errors
    ///
    /// Returns the server's error.
    pub async fn kyc_status(&self) -> ClientResult<Value> {
        self.client.get_json(KYC_STATUS_PATH).await
    }
}
