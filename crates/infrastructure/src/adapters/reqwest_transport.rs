//! HTTP transport implementation using reqwest.
//!
//! This adapter implements the `HttpTransport` port. Request paths are
//! resolved against the configured base URL; every HTTP status is returned
//! as a response and only failures without a response are errors.

use std::time::{Duration, Instant};

use assured_application::ports::{HttpTransport, TransportError};
use assured_domain::request::{CONTENT_TYPE, FormValue, Headers, MultipartForm};
use assured_domain::{ApiRequest, ApiResponse, HttpMethod, RequestBody};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, Url};

use crate::config::ClientConfig;

const MAX_REDIRECTS: usize = 10;

/// HTTP transport backed by `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: Url,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Creates a transport from the client configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;

        Ok(Self::with_client(
            client,
            config.base_url.clone(),
            Duration::from_millis(config.timeout_ms),
        ))
    }

    /// Creates a transport around an existing reqwest client.
    #[must_use]
    pub const fn with_client(client: Client, base_url: Url, timeout: Duration) -> Self {
        Self {
            client,
            base_url,
            timeout,
        }
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// Appends the request path and query to the base URL.
    ///
    /// The base URL keeps its own path, so `/api/v1` + `/accounts/me/`
    /// yields `/api/v1/accounts/me/`.
    fn resolve(&self, request: &ApiRequest) -> Result<Url, TransportError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = request.path.trim_start_matches('/');
        let joined = format!("{base}/{path}");

        let mut url =
            Url::parse(&joined).map_err(|e| TransportError::InvalidUrl(format!("{e}: {joined}")))?;

        if !request.query.is_empty() {
            let encoded = serde_urlencoded::to_string(request.query.pairs())
                .map_err(|e| TransportError::InvalidUrl(e.to_string()))?;
            url.set_query(Some(&encoded));
        }

        Ok(url)
    }

    /// Attaches headers and body.
    ///
    /// A caller-supplied `Content-Type` wins for JSON bodies. Multipart
    /// bodies always use reqwest's header so the boundary is present.
    fn build(
        mut builder: reqwest::RequestBuilder,
        headers: &Headers,
        body: &RequestBody,
    ) -> Result<reqwest::RequestBuilder, TransportError> {
        let multipart = matches!(body, RequestBody::Multipart(_));
        for header in headers.iter() {
            if multipart && header.name.eq_ignore_ascii_case(CONTENT_TYPE) {
                continue;
            }
            builder = builder.header(&header.name, &header.value);
        }

        match body {
            RequestBody::Empty => Ok(builder),
            RequestBody::Json(value) => {
                if !headers.contains(CONTENT_TYPE) {
                    builder = builder.header(CONTENT_TYPE, mime::APPLICATION_JSON.as_ref());
                }
                let bytes =
                    serde_json::to_vec(value).map_err(|e| TransportError::InvalidBody(e.to_string()))?;
                Ok(builder.body(bytes))
            }
            RequestBody::Multipart(form) => Ok(builder.multipart(Self::build_form(form)?)),
        }
    }

    /// Builds a reqwest multipart form.
    fn build_form(form: &MultipartForm) -> Result<Form, TransportError> {
        let mut built = Form::new();
        for part in form.parts() {
            built = match &part.value {
                FormValue::Text(value) => built.text(part.name.clone(), value.clone()),
                FormValue::File {
                    file_name,
                    content_type,
                    content,
                } => {
                    let file = Part::bytes(content.clone())
                        .file_name(file_name.clone())
                        .mime_str(content_type)
                        .map_err(|e| {
                            TransportError::InvalidBody(format!("Invalid MIME type: {e}"))
                        })?;
                    built.part(part.name.clone(), file)
                }
            };
        }
        Ok(built)
    }

    /// Maps reqwest errors to `TransportError`.
    fn map_error(error: &reqwest::Error, timeout_ms: u64) -> TransportError {
        if error.is_timeout() {
            return TransportError::Timeout { timeout_ms };
        }

        let host = || {
            error
                .url()
                .and_then(Url::host_str)
                .unwrap_or("unknown")
                .to_string()
        };

        if error.is_connect() {
            let message = error.to_string();
            let lower = message.to_lowercase();
            if lower.contains("dns") || lower.contains("resolve") {
                return TransportError::DnsError {
                    host: host(),
                    message,
                };
            }
            if lower.contains("refused") {
                return TransportError::ConnectionRefused {
                    host: host(),
                    port: error
                        .url()
                        .and_then(Url::port_or_known_default)
                        .unwrap_or(80),
                };
            }
            return TransportError::ConnectionFailed(message);
        }

        if error.is_redirect() {
            return TransportError::Other(format!("too many redirects (max {MAX_REDIRECTS})"));
        }

        TransportError::Other(error.to_string())
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = self.resolve(request)?;
        let timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);

        let builder = self
            .client
            .request(Self::to_reqwest_method(request.method), url)
            .timeout(self.timeout);
        let builder = Self::build(builder, &request.headers, &request.body)?;

        let start = Instant::now();
        let response = builder
            .send()
            .await
            .map_err(|e| Self::map_error(&e, timeout_ms))?;

        let status = response.status().as_u16();
        let headers: Headers = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("<binary>").to_string()))
            .collect();

        let body = response
            .bytes()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout { timeout_ms }
                } else {
                    TransportError::ResponseRead(e.to_string())
                }
            })?
            .to_vec();

        Ok(ApiResponse {
            status,
            headers,
            body,
            duration: start.elapsed(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use assured_domain::QueryParams;
    use pretty_assertions::assert_eq;

    fn transport(base: &str) -> ReqwestTransport {
        ReqwestTransport::with_client(
            Client::new(),
            Url::parse(base).unwrap(),
            Duration::from_secs(1),
        )
    }

    #[test]
    fn test_to_reqwest_method() {
        assert_eq!(
            ReqwestTransport::to_reqwest_method(HttpMethod::Get),
            Method::GET
        );
        assert_eq!(
            ReqwestTransport::to_reqwest_method(HttpMethod::Patch),
            Method::PATCH
        );
        assert_eq!(
            ReqwestTransport::to_reqwest_method(HttpMethod::Delete),
            Method::DELETE
        );
    }

    #[test]
    fn test_resolve_keeps_base_path() {
        let bare = transport("https://api.example.com/api/v1");
        let url = bare.resolve(&ApiRequest::get("/accounts/me/")).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/api/v1/accounts/me/");

        let slashed = transport("https://api.example.com/api/v1/");
        let url = slashed
            .resolve(&ApiRequest::get("accounts/me/"))
            .unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/api/v1/accounts/me/");
    }

    #[test]
    fn test_resolve_encodes_query() {
        let transport = transport("https://api.example.com/api/v1");
        let request = ApiRequest::get("/marketplace/listings/")
            .with_query(QueryParams::new().with("search", "red onion").with("page", 2));

        let url = transport.resolve(&request).unwrap();

        assert_eq!(
            url.as_str(),
            "https://api.example.com/api/v1/marketplace/listings/?search=red+onion&page=2"
        );
    }

    #[test]
    fn test_invalid_mime_rejected() {
        let form = MultipartForm::new().file("document", "id.pdf", "not a mime", vec![1]);
        assert!(matches!(
            ReqwestTransport::build_form(&form),
            Err(TransportError::InvalidBody(_))
        ));
    }
}
