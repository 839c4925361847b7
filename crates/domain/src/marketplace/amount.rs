//! Decimal amounts as sent by the backend.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A decimal quantity or price.
///
/// The API encodes decimals as strings (`"42.50"`) but older endpoints
/// send plain numbers; both are accepted and the text is preserved so no
/// precision is lost.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Amount(String);

impl Amount {
    /// Returns the amount as written by the server.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses the amount as a float for display arithmetic.
    #[must_use]
    pub fn to_f64(&self) -> Option<f64> {
        self.0.parse().ok()
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Self(value.to_string())
    }
}

impl From<u32> for Amount {
    fn from(value: u32) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(text) => Self(text),
            Raw::Number(number) => Self(number.to_string()),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_accepts_string_and_number() {
        let from_text: Amount = serde_json::from_str(r#""42.50""#).unwrap();
        let from_number: Amount = serde_json::from_str("17").unwrap();

        assert_eq!(from_text.as_str(), "42.50");
        assert_eq!(from_number.to_f64(), Some(17.0));
        assert_eq!(serde_json::to_string(&from_text).unwrap(), r#""42.50""#);
    }
}
