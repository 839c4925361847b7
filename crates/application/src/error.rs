//! Client error types

use assured_domain::response::GENERIC_ERROR_MESSAGE;
use assured_domain::{ApiErrorBody, ApiResponse, DomainError, IllegalTransition};
use thiserror::Error;

use crate::ports::{TokenStoreError, TransportError};

/// Coarse error category callers match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No response was received.
    Transport,
    /// The server rejected the credentials.
    Auth,
    /// 4xx other than 401.
    Client,
    /// 5xx or an unexpected status.
    Server,
    /// Failure inside the client (storage, decoding, input).
    Internal,
}

/// Errors returned by the authenticated client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No response was received.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The request was rejected with 401.
    ///
    /// `session_ended` is true when the client gave up on the session and
    /// purged the stored tokens.
    #[error("authentication failed (401)")]
    Auth {
        /// The 401 response, unmodified.
        response: ApiResponse,
        /// Whether the session was torn down.
        session_ended: bool,
    },

    /// The server returned a 4xx other than 401.
    #[error("request rejected ({})", .response.status)]
    Client {
        /// The response, unmodified.
        response: ApiResponse,
    },

    /// The server returned a 5xx or another non-success status.
    #[error("server error ({})", .response.status)]
    Server {
        /// The response, unmodified.
        response: ApiResponse,
    },

    /// The token store failed.
    #[error("token store error: {0}")]
    Storage(#[from] TokenStoreError),

    /// The request was rejected locally before being sent.
    #[error("invalid input: {0}")]
    Validation(#[from] DomainError),

    /// A successful response could not be decoded.
    #[error("could not decode response: {0}")]
    Decode(String),

    /// The request lifecycle took an edge it does not have.
    #[error(transparent)]
    State(#[from] IllegalTransition),
}

impl ClientError {
    /// Classifies a non-success response.
    #[must_use]
    pub fn from_response(response: ApiResponse) -> Self {
        match response.status {
            401 => Self::Auth {
                response,
                session_ended: false,
            },
            400..=499 => Self::Client { response },
            _ => Self::Server { response },
        }
    }

    /// Returns the error category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(_) => ErrorKind::Transport,
            Self::Auth { .. } => ErrorKind::Auth,
            Self::Client { .. } => ErrorKind::Client,
            Self::Server { .. } => ErrorKind::Server,
            Self::Storage(_) | Self::Validation(_) | Self::Decode(_) | Self::State(_) => {
                ErrorKind::Internal
            }
        }
    }

    /// Returns the response, if one was received.
    #[must_use]
    pub const fn response(&self) -> Option<&ApiResponse> {
        match self {
            Self::Auth { response, .. } | Self::Client { response } | Self::Server { response } => {
                Some(response)
            }
            _ => None,
        }
    }

    /// Returns the HTTP status, if a response was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.response().map(|r| r.status)
    }

    /// Returns the raw response body, if a response was received.
    #[must_use]
    pub fn body(&self) -> Option<&[u8]> {
        self.response().map(|r| r.body.as_slice())
    }

    /// Parses the structured error payload.
    #[must_use]
    pub fn error_body(&self) -> Option<ApiErrorBody> {
        self.body().and_then(ApiErrorBody::parse)
    }

    /// Returns true if the client ended the session.
    #[must_use]
    pub const fn session_ended(&self) -> bool {
        matches!(
            self,
            Self::Auth {
                session_ended: true,
                ..
            }
        )
    }

    /// Message to show the user.
    ///
    /// Uses the server-provided message when there is one.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(DomainError::Validation { message, .. }) => (*message).to_string(),
            Self::Transport(TransportError::Timeout { .. }) => {
                "The server took too long to respond.".to_string()
            }
            Self::Transport(_) => "Could not reach the server.".to_string(),
            Self::Auth {
                session_ended: true,
                ..
            } => "Your session has expired, please log in again.".to_string(),
            _ => self
                .error_body()
                .and_then(|body| body.message())
                .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string()),
        }
    }
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
