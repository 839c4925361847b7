//! List responses.

use serde::{Deserialize, Serialize};

/// A list endpoint response.
///
/// Paginated endpoints wrap results in `{count, next, previous, results}`;
/// unpaginated ones return a bare array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Page<T> {
    /// Paginated envelope.
    Paginated {
        /// Total number of items across pages.
        count: u64,
        /// URL of the next page.
        #[serde(default)]
        next: Option<String>,
        /// URL of the previous page.
        #[serde(default)]
        previous: Option<String>,
        /// Items on this page.
        results: Vec<T>,
    },
    /// Bare array.
    List(Vec<T>),
}

impl<T> Page<T> {
    /// Items on this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        match self {
            Self::Paginated { results, .. } => results,
            Self::List(items) => items,
        }
    }

    /// Consumes the page, returning its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Paginated { results, .. } => results,
            Self::List(items) => items,
        }
    }

    /// Total item count when the server reports one.
    #[must_use]
    pub fn total(&self) -> usize {
        match self {
            Self::Paginated { count, .. } => usize::try_from(*count).unwrap_or(usize::MAX),
            Self::List(items) => items.len(),
        }
    }

    /// Returns true if the server has another page.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        matches!(self, Self::Paginated { next: Some(_), .. })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_paginated_and_bare() {
        let paginated: Page<u32> = serde_json::from_str(
            r#"{"count":41,"next":"https://api/x?page=2","previous":null,"results":[1,2]}"#,
        )
        .unwrap();
        assert_eq!(paginated.items(), &[1, 2]);
        assert_eq!(paginated.total(), 41);
        assert!(paginated.has_next());

        let bare: Page<u32> = serde_json::from_str("[7,8,9]").unwrap();
        assert_eq!(bare.total(), 3);
        assert!(!bare.has_next());
        assert_eq!(bare.into_items(), vec![7, 8, 9]);
    }
}
