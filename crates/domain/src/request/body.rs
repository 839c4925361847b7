//! HTTP Request body types

use std::fmt;

use serde::Serialize;

use crate::error::{DomainError, DomainResult};

/// Content type for JSON bodies.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Content type for multipart bodies (boundary appended by the transport).
pub const MULTIPART_CONTENT_TYPE: &str = "multipart/form-data";

/// HTTP request body.
///
/// Bodies are kept as a description rather than a stream so a request
/// can be dispatched a second time after a token refresh.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestBody {
    /// No body
    #[default]
    Empty,
    /// JSON document
    Json(serde_json::Value),
    /// Multipart form with text fields and file parts
    Multipart(MultipartForm),
}

impl RequestBody {
    /// Serializes a value into a JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be represented as JSON.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> DomainResult<Self> {
        serde_json::to_value(value)
            .map(Self::Json)
            .map_err(|e| DomainError::InvalidBody(e.to_string()))
    }

    /// Returns whether the body is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns the default content type for this body.
    #[must_use]
    pub const fn content_type(&self) -> Option<&'static str> {
        match self {
            Self::Empty => None,
            Self::Json(_) => Some(JSON_CONTENT_TYPE),
            Self::Multipart(_) => Some(MULTIPART_CONTENT_TYPE),
        }
    }
}

impl From<MultipartForm> for RequestBody {
    fn from(form: MultipartForm) -> Self {
        Self::Multipart(form)
    }
}

/// Value of a single multipart field.
#[derive(Clone, PartialEq, Eq)]
pub enum FormValue {
    /// Plain text field.
    Text(String),
    /// File held in memory.
    File {
        /// File name reported to the server.
        file_name: String,
        /// MIME type of the content.
        content_type: String,
        /// Raw file content.
        content: Vec<u8>,
    },
}

impl fmt::Debug for FormValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(value) => f.debug_tuple("Text").field(value).finish(),
            Self::File {
                file_name,
                content_type,
                content,
            } => f
                .debug_struct("File")
                .field("file_name", file_name)
                .field("content_type", content_type)
                .field("bytes", &content.len())
                .finish(),
        }
    }
}

/// A named multipart field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPart {
    /// Field name.
    pub name: String,
    /// Field value.
    pub value: FormValue,
}

/// Multipart form used for KYC documents and listing images.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    parts: Vec<FormPart>,
}

impl MultipartForm {
    /// Creates an empty form.
    #[must_use]
    pub const fn new() -> Self {
        Self { parts: Vec::new() }
    }

    /// Adds a text field.
    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(FormPart {
            name: name.into(),
            value: FormValue::Text(value.into()),
        });
        self
    }

    /// Adds a file field.
    #[must_use]
    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        content: Vec<u8>,
    ) -> Self {
        self.parts.push(FormPart {
            name: name.into(),
            value: FormValue::File {
                file_name: file_name.into(),
                content_type: content_type.into(),
                content,
            },
        });
        self
    }

    /// Adds every top-level field of a JSON object as a text field.
    ///
    /// Nested values are sent as their JSON text; nulls are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the value does not serialize to a JSON object.
    pub fn fields<T: Serialize + ?Sized>(mut self, value: &T) -> DomainResult<Self> {
        let serde_json::Value::Object(map) =
            serde_json::to_value(value).map_err(|e| DomainError::InvalidBody(e.to_string()))?
        else {
            return Err(DomainError::InvalidBody(
                "multipart fields must be an object".to_string(),
            ));
        };
        for (name, value) in map {
            let text = match value {
                serde_json::Value::Null => continue,
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            self = self.text(name, text);
        }
        Ok(self)
    }

    /// Returns the form parts in insertion order.
    #[must_use]
    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    /// Returns true if the form has no parts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}
