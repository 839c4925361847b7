//! Session lifecycle events.

use serde::{Deserialize, Serialize};

/// Events emitted when the stored session changes.
///
/// `LoginRequired` replaces the browser redirect to the login page: the
/// front end reacts to it by sending the user back to authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Tokens were stored after login or registration.
    LoggedIn {
        /// Username that authenticated, when known.
        username: Option<String>,
    },
    /// The access token was replaced by the refresh flow.
    TokenRefreshed {
        /// Preview of the new access token.
        token_preview: String,
    },
    /// The user logged out locally.
    LoggedOut,
    /// The session could not be recovered and the tokens were purged.
    LoginRequired {
        /// Why the session ended.
        reason: SessionEndReason,
    },
}

/// Why a session was terminated by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEndReason {
    /// No refresh token was stored when the access token was rejected.
    MissingRefreshToken,
    /// The refresh endpoint rejected the refresh token.
    RefreshRejected,
    /// The refresh endpoint could not be reached.
    RefreshUnreachable,
    /// The refresh response carried no usable access token.
    MalformedRefreshResponse,
}

impl SessionEndReason {
    /// Message shown to the user when redirected to login.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::MissingRefreshToken => "You are not logged in",
            Self::RefreshRejected | Self::MalformedRefreshResponse => {
                "Your session has expired, please log in again"
            }
            Self::RefreshUnreachable => "Could not renew your session, please log in again",
        }
    }
}

impl SessionEvent {
    /// Returns true if the front end should navigate to login.
    #[must_use]
    pub const fn requires_login(&self) -> bool {
        matches!(self, Self::LoginRequired { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_login() {
        assert!(
            SessionEvent::LoginRequired {
                reason: SessionEndReason::RefreshRejected
            }
            .requires_login()
        );
        assert!(!SessionEvent::LoggedOut.requires_login());
    }

    #[test]
    fn test_event_serialization() {
        let json = serde_json::to_string(&SessionEvent::LoginRequired {
            reason: SessionEndReason::MissingRefreshToken,
        })
        .unwrap_or_default();
        assert_eq!(
            json,
            r#"{"event":"login_required","reason":"missing_refresh_token"}"#
        );
    }
}
