//! Client configuration.
//!
//! Sources, lowest to highest precedence:
//! - built-in defaults
//! - `assured.toml` in the working directory (optional)
//! - `ASSURED_*` environment variables (e.g. `ASSURED_BASE_URL`)

use std::path::PathBuf;

use serde::Deserialize;
use url::Url;

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://assured-farming-backend.onrender.com/api/v1";

/// Per-request timeout.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

const CONFIG_FILE: &str = "assured";
const ENV_PREFIX: &str = "ASSURED";

/// Errors raised while loading the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A source could not be read or deserialized.
    #[error("Failed to load config: {0}")]
    Load(#[from] ::config::ConfigError),

    /// The base URL is not an absolute http(s) URL.
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl {
        /// The rejected value.
        url: String,
        /// Why it was rejected.
        reason: String,
    },
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    base_url: String,
    timeout_ms: u64,
    user_agent: String,
    #[serde(default)]
    token_file: Option<PathBuf>,
}

/// Settings for the transport and the token store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API root every request path is appended to.
    pub base_url: Url,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// `User-Agent` header value.
    pub user_agent: String,
    /// Token file override; `None` uses the platform config directory.
    pub token_file: Option<PathBuf>,
}

impl ClientConfig {
    /// Loads the configuration from defaults, `assured.toml` and the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a source is malformed or the base URL is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(::config::File::with_name(CONFIG_FILE).required(false))
    }

    /// Loads the configuration with an explicit file source.
    ///
    /// # Errors
    ///
    /// Returns an error if a source is malformed or the base URL is invalid.
    pub fn load_from<S>(file: S) -> Result<Self, ConfigError>
    where
        S: ::config::Source + Send + Sync + 'static,
    {
        let raw: RawConfig = ::config::Config::builder()
            .set_default("base_url", DEFAULT_BASE_URL)?
            .set_default("timeout_ms", DEFAULT_TIMEOUT_MS)?
            .set_default("user_agent", default_user_agent())?
            .add_source(file)
            .add_source(::config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        let config = Self {
            base_url: parse_base_url(&raw.base_url)?,
            timeout_ms: raw.timeout_ms,
            user_agent: raw.user_agent,
            token_file: raw.token_file,
        };
        tracing::debug!(base_url = %config.base_url, timeout_ms = config.timeout_ms, "configuration loaded");
        Ok(config)
    }

    /// Replaces the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if `url` is not an absolute
    /// http(s) URL.
    pub fn with_base_url(mut self, url: &str) -> Result<Self, ConfigError> {
        self.base_url = parse_base_url(url)?;
        Ok(self)
    }

    /// Replaces the timeout.
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL)
                .unwrap_or_else(|_| unreachable!("default base URL is valid")),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: default_user_agent(),
            token_file: None,
        }
    }
}

fn default_user_agent() -> String {
    format!("assured/{}", env!("CARGO_PKG_VERSION"))
}

fn parse_base_url(value: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidBaseUrl {
        url: value.to_string(),
        reason,
    };
    let url = Url::parse(value).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn from_toml(content: &str) -> Result<ClientConfig, ConfigError> {
        ClientConfig::load_from(::config::File::from_str(content, ::config::FileFormat::Toml))
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url.as_str(), DEFAULT_BASE_URL);
        assert_eq!(config.timeout_ms, 10_000);
        assert!(config.user_agent.starts_with("assured/"));
    }

    #[test]
    fn test_file_overrides_defaults() {
        let config = from_toml(
            r#"
            base_url = "http://localhost:8000/api/v1"
            timeout_ms = 2500
            token_file = "/tmp/tokens.json"
            "#,
        )
        .unwrap();

        assert_eq!(config.base_url.as_str(), "http://localhost:8000/api/v1");
        assert_eq!(config.timeout_ms, 2500);
        assert_eq!(config.token_file, Some(PathBuf::from("/tmp/tokens.json")));
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let err = from_toml(r#"base_url = "ftp://files.example.com""#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));

        let err = ClientConfig::default().with_base_url("not a url").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));
    }
}
