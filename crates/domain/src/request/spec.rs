//! Request specification type

use serde::Serialize;

use super::{Headers, HttpMethod, QueryParams, RequestBody};
use crate::error::{DomainError, DomainResult};

/// A request against the marketplace API.
///
/// The path is relative to the configured base URL, e.g.
/// `/contracts/contracts/1/`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ApiRequest {
    /// HTTP method
    pub method: HttpMethod,
    /// Path relative to the base URL
    pub path: String,
    /// Query parameters
    pub query: QueryParams,
    /// Extra headers; `Authorization` is managed by the client
    pub headers: Headers,
    /// Request body
    pub body: RequestBody,
}

impl ApiRequest {
    /// Creates a request with no body.
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            ..Self::default()
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// Creates a POST request.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    /// Creates a PUT request.
    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    /// Creates a PATCH request.
    #[must_use]
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, path)
    }

    /// Creates a DELETE request.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Sets the query parameters.
    #[must_use]
    pub fn with_query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    /// Sets a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.set(name, value);
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<RequestBody>) -> Self {
        self.body = body.into();
        self
    }

    /// Serializes a value as the JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be represented as JSON.
    pub fn with_json<T: Serialize + ?Sized>(mut self, value: &T) -> DomainResult<Self> {
        self.body = RequestBody::json(value)?;
        Ok(self)
    }

    /// Checks that the path can be joined onto a base URL.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty path or an absolute URL.
    pub fn validate(&self) -> DomainResult<()> {
        if self.path.trim().is_empty() {
            return Err(DomainError::InvalidPath("path is empty".to_string()));
        }
        if self.path.contains("://") {
            return Err(DomainError::InvalidPath(format!(
                "expected a path relative to the base URL, got {}",
                self.path
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::request::QueryParams;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builders() {
        let request = ApiRequest::get("/marketplace/listings/")
            .with_query(QueryParams::new().with("crop", 3))
            .with_header("Accept-Language", "en");

        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.query.get("crop"), Some("3"));
        assert_eq!(request.headers.get("accept-language"), Some("en"));
        assert!(request.body.is_empty());
    }

    #[test]
    fn test_with_json() {
        let request = ApiRequest::post("/accounts/token/")
            .with_json(&serde_json::json!({"username": "asha"}))
            .unwrap();
        assert!(matches!(request.body, RequestBody::Json(_)));
    }

    #[test]
    fn test_validate_path() {
        assert!(ApiRequest::get("/accounts/me/").validate().is_ok());
        assert!(ApiRequest::get("").validate().is_err());
        assert!(ApiRequest::get("https://evil.example/x").validate().is_err());
    }
}
