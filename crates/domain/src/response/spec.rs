//! Response specification type

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::request::Headers;

/// HTTP response as received from the API.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: Headers,
    /// Raw response body
    pub body: Vec<u8>,
    /// Time from dispatch to the last body byte
    pub duration: Duration,
}

impl ApiResponse {
    /// Creates a response with an empty body.
    #[must_use]
    pub const fn new(status: u16) -> Self {
        Self {
            status,
            headers: Headers::new(),
            body: Vec::new(),
            duration: Duration::ZERO,
        }
    }

    /// Sets the body to a JSON document.
    #[must_use]
    pub fn with_json(mut self, value: &serde_json::Value) -> Self {
        self.body = value.to_string().into_bytes();
        self.headers.set("Content-Type", "application/json");
        self
    }

    /// Returns true if the status code indicates success (2xx).
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Returns true if the server rejected the credentials (401).
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// Returns true if the status code indicates a client error (4xx).
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.status >= 400 && self.status < 500
    }

    /// Returns true if the status code indicates a server error (5xx).
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status >= 500 && self.status < 600
    }

    /// Decodes the body as JSON.
    ///
    /// An empty body decodes as JSON `null`, so `()` and `Option<T>`
    /// targets work for `204 No Content`.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        if self.body.is_empty() {
            serde_json::from_value(serde_json::Value::Null)
        } else {
            serde_json::from_slice(&self.body)
        }
    }

    /// Returns the body as text, replacing invalid UTF-8.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_status_checks() {
        let ok = ApiResponse::new(200);
        assert!(ok.is_success());
        assert!(!ok.is_client_error());

        let unauthorized = ApiResponse::new(401);
        assert!(unauthorized.is_unauthorized());
        assert!(unauthorized.is_client_error());

        assert!(ApiResponse::new(503).is_server_error());
    }

    #[test]
    fn test_json_decoding() {
        let response = ApiResponse::new(200).with_json(&json!({"id": 1, "status": "draft"}));
        let value: serde_json::Value = response.json().unwrap();
        assert_eq!(value["status"], "draft");
        assert_eq!(response.headers.get("content-type"), Some("application/json"));
    }

    #[test]
    fn test_empty_body_decodes_as_unit() {
        let response = ApiResponse::new(204);
        response.json::<()>().unwrap();
        assert!(response.json::<Option<u32>>().unwrap().is_none());
    }
}
