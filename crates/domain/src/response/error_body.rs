//! Structured error payloads returned by the API.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Message shown when the server gave nothing usable.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// Error payload of a failed API call.
///
/// The backend answers either `{"detail": "..."}` or a map of field
/// names to message lists (`{"username": ["already taken"]}`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApiErrorBody {
    /// Top-level `detail` message.
    pub detail: Option<String>,
    /// Per-field messages, including `non_field_errors`.
    pub fields: BTreeMap<String, Vec<String>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FieldMessages {
    Many(Vec<String>),
    One(String),
}

impl ApiErrorBody {
    /// Parses an error payload; returns None for non-JSON bodies.
    #[must_use]
    pub fn parse(body: &[u8]) -> Option<Self> {
        let serde_json::Value::Object(map) = serde_json::from_slice::<serde_json::Value>(body).ok()?
        else {
            return None;
        };

        let mut parsed = Self::default();
        for (key, value) in map {
            if key == "detail" {
                if let serde_json::Value::String(detail) = value {
                    parsed.detail = Some(detail);
                }
                continue;
            }
            match serde_json::from_value::<FieldMessages>(value) {
                Ok(FieldMessages::Many(messages)) if !messages.is_empty() => {
                    parsed.fields.insert(key, messages);
                }
                Ok(FieldMessages::One(message)) => {
                    parsed.fields.insert(key, vec![message]);
                }
                _ => {}
            }
        }
        Some(parsed)
    }

    /// Returns the most relevant message, if any.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        if let Some(detail) = &self.detail {
            return Some(detail.clone());
        }
        if let Some(first) = self
            .fields
            .get("non_field_errors")
            .and_then(|messages| messages.first())
        {
            return Some(first.clone());
        }
        self.fields
            .iter()
            .find_map(|(field, messages)| messages.first().map(|m| format!("{field}: {m}")))
    }

    /// Returns the message or the generic fallback.
    #[must_use]
    pub fn message_or_generic(&self) -> String {
        self.message()
            .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_detail_message() {
        let body = ApiErrorBody::parse(br#"{"detail":"Given token not valid for any token type","code":"token_not_valid"}"#).unwrap();
        assert_eq!(
            body.message().as_deref(),
            Some("Given token not valid for any token type")
        );
    }

    #[test]
    fn test_field_messages() {
        let body = ApiErrorBody::parse(
            br#"{"username":["A user with that username already exists."],"phone":"Invalid"}"#,
        )
        .unwrap();
        assert_eq!(body.fields.len(), 2);
        assert_eq!(body.fields["phone"], vec!["Invalid".to_string()]);
        assert_eq!(
            body.message().as_deref(),
            Some("phone: Invalid")
        );
    }

    #[test]
    fn test_non_field_errors_win_over_fields() {
        let body = ApiErrorBody::parse(
            br#"{"amount":["Too low"],"non_field_errors":["Listing is closed"]}"#,
        )
        .unwrap();
        assert_eq!(body.message().as_deref(), Some("Listing is closed"));
    }

    #[test]
    fn test_non_json_and_empty() {
        assert!(ApiErrorBody::parse(b"<html>502</html>").is_none());
        let empty = ApiErrorBody::parse(b"{}").unwrap();
        assert_eq!(empty.message_or_generic(), GENERIC_ERROR_MESSAGE);
    }
}
