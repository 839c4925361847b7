//! Token and credential types

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Storage key for the access token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// Storage key for the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Returns a preview of a secret (first 8 chars + ...).
#[must_use]
pub fn token_preview(token: &str) -> String {
    if token.chars().count() > 12 {
        format!("{}...", token.chars().take(8).collect::<String>())
    } else {
        "***".to_string()
    }
}

/// Short-lived bearer credential attached to every authenticated call.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccessToken(String);

impl AccessToken {
    /// Wraps a raw token string.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty or contains whitespace.
    pub fn new(token: impl Into<String>) -> DomainResult<Self> {
        let token = token.into();
        validate_token(&token)?;
        Ok(Self(token))
    }

    /// Returns the raw token string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the `Authorization` header value.
    #[must_use]
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.0)
    }

    /// Reads the `exp` claim when the token is a JWT.
    ///
    /// The signature is not verified; the value is only used to
    /// report session status.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        #[derive(Deserialize)]
        struct Claims {
            exp: i64,
        }

        let payload = self.0.split('.').nth(1)?;
        let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
        let claims: Claims = serde_json::from_slice(&bytes).ok()?;
        DateTime::from_timestamp(claims.exp, 0)
    }
}

impl TryFrom<String> for AccessToken {
    type Error = DomainError;

    fn try_from(token: String) -> DomainResult<Self> {
        Self::new(token)
    }
}

impl From<AccessToken> for String {
    fn from(token: AccessToken) -> Self {
        token.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AccessToken")
            .field(&token_preview(&self.0))
            .finish()
    }
}

/// Longer-lived credential used only to mint new access tokens.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RefreshToken(String);

impl RefreshToken {
    /// Wraps a raw token string.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty or contains whitespace.
    pub fn new(token: impl Into<String>) -> DomainResult<Self> {
        let token = token.into();
        validate_token(&token)?;
        Ok(Self(token))
    }

    /// Returns the raw token string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RefreshToken {
    type Error = DomainError;

    fn try_from(token: String) -> DomainResult<Self> {
        Self::new(token)
    }
}

impl From<RefreshToken> for String {
    fn from(token: RefreshToken) -> Self {
        token.0
    }
}

impl fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RefreshToken")
            .field(&token_preview(&self.0))
            .finish()
    }
}

fn validate_token(token: &str) -> DomainResult<()> {
    if token.is_empty() {
        return Err(DomainError::InvalidToken("token is empty".to_string()));
    }
    if token.chars().any(char::is_whitespace) {
        return Err(DomainError::InvalidToken(
            "token contains whitespace".to_string(),
        ));
    }
    Ok(())
}

/// Tokens issued by login, registration or a rotating refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// The access token.
    pub access: AccessToken,
    /// The refresh token, when the server issued one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh: Option<RefreshToken>,
}

impl TokenPair {
    /// Creates a pair from both tokens.
    #[must_use]
    pub const fn new(access: AccessToken, refresh: RefreshToken) -> Self {
        Self {
            access,
            refresh: Some(refresh),
        }
    }
}

/// Username and password sent to the token endpoint.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Account username.
    pub username: String,
    /// Account password.
    pub password: String,
}

impl Credentials {
    /// Creates credentials.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Status of the stored session for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenStatus {
    /// No access token is stored.
    NotAuthenticated,
    /// The access token is not known to be expired.
    Valid {
        /// Seconds until expiry, or None if the token carries no expiry.
        seconds_remaining: Option<i64>,
    },
    /// The access token has expired.
    Expired {
        /// Whether a refresh token is available.
        can_refresh: bool,
    },
}

impl TokenStatus {
    /// Evaluates the stored tokens at the given instant.
    #[must_use]
    pub fn evaluate(
        access: Option<&AccessToken>,
        refresh: Option<&RefreshToken>,
        now: DateTime<Utc>,
    ) -> Self {
        let Some(access) = access else {
            return Self::NotAuthenticated;
        };
        match access.expires_at() {
            Some(exp) if exp <= now => Self::Expired {
                can_refresh: refresh.is_some(),
            },
            Some(exp) => Self::Valid {
                seconds_remaining: Some((exp - now).num_seconds()),
            },
            None => Self::Valid {
                seconds_remaining: None,
            },
        }
    }

    /// Returns true if the access token can be used as-is.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }

    /// Get a user-friendly display message.
    #[must_use]
    pub fn display_message(&self) -> String {
        match self {
            Self::NotAuthenticated => "Not authenticated".to_string(),
            Self::Valid {
                seconds_remaining: Some(secs),
            } => {
                if *secs > 3600 {
                    format!("Valid for {} hours", secs / 3600)
                } else if *secs > 60 {
                    format!("Valid for {} minutes", secs / 60)
                } else {
                    format!("Valid for {secs} seconds")
                }
            }
            Self::Valid {
                seconds_remaining: None,
            } => "Valid (no expiry)".to_string(),
            Self::Expired { can_refresh: true } => {
                "Expired (will refresh on next request)".to_string()
            }
            Self::Expired { can_refresh: false } => "Expired".to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn jwt_with_exp(exp: i64) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{exp},"user_id":7}}"#));
        format!("{header}.{payload}.signature")
    }

    #[test]
    fn test_rejects_empty_and_whitespace_tokens() {
        assert!(AccessToken::new("").is_err());
        assert!(AccessToken::new("abc def").is_err());
        assert!(RefreshToken::new("\t").is_err());
        assert!(AccessToken::new("abc.def.ghi").is_ok());
    }

    #[test]
    fn test_bearer_header() {
        let token = AccessToken::new("new").unwrap();
        assert_eq!(token.bearer_header(), "Bearer new");
    }

    #[test]
    fn test_debug_does_not_leak_token() {
        let token = AccessToken::new("supersecretaccesstoken").unwrap();
        let debug = format!("{token:?}");
        assert!(!debug.contains("supersecretaccesstoken"));
        assert!(debug.contains("supersec..."));

        let creds = Credentials::new("farmer1", "hunter2!");
        assert!(!format!("{creds:?}").contains("hunter2"));
    }

    #[test]
    fn test_expires_at_reads_jwt_claim() {
        let token = AccessToken::new(jwt_with_exp(1_700_000_000)).unwrap();
        assert_eq!(token.expires_at().map(|t| t.timestamp()), Some(1_700_000_000));

        let opaque = AccessToken::new("opaque-token").unwrap();
        assert_eq!(opaque.expires_at(), None);
    }

    #[test]
    fn test_token_status() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let refresh = RefreshToken::new("r").unwrap();

        assert_eq!(
            TokenStatus::evaluate(None, Some(&refresh), now),
            TokenStatus::NotAuthenticated
        );

        let expired = AccessToken::new(jwt_with_exp(1_699_999_000)).unwrap();
        assert_eq!(
            TokenStatus::evaluate(Some(&expired), Some(&refresh), now),
            TokenStatus::Expired { can_refresh: true }
        );

        let fresh = AccessToken::new(jwt_with_exp(1_700_007_200)).unwrap();
        let status = TokenStatus::evaluate(Some(&fresh), None, now);
        assert!(status.is_valid());
        assert_eq!(status.display_message(), "Valid for 2 hours");
    }

    #[test]
    fn test_token_pair_wire_format() {
        let pair: TokenPair = serde_json::from_str(r#"{"access":"a1","refresh":"r1"}"#).unwrap();
        assert_eq!(pair.access.as_str(), "a1");
        assert_eq!(pair.refresh.as_ref().map(RefreshToken::as_str), Some("r1"));

        let access_only: TokenPair = serde_json::from_str(r#"{"access":"a2"}"#).unwrap();
        assert!(access_only.refresh.is_none());

        assert!(serde_json::from_str::<TokenPair>(r#"{"access":""}"#).is_err());
    }
}
