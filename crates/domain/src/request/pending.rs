//! Requests awaiting a possible retry.

use super::ApiRequest;

/// A request together with its retry marker.
///
/// A request that failed with 401 is replayed at most once after a
/// token refresh; `retried` records that the replay has been spent.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRequest {
    /// The request as the caller issued it.
    pub request: ApiRequest,
    /// Whether the one allowed retry has been used.
    pub retried: bool,
}

impl PendingRequest {
    /// Wraps a fresh request.
    #[must_use]
    pub const fn new(request: ApiRequest) -> Self {
        Self {
            request,
            retried: false,
        }
    }

    /// Returns true if the request may still be retried.
    #[must_use]
    pub const fn can_retry(&self) -> bool {
        !self.retried
    }

    /// Consumes the retry allowance.
    #[must_use]
    pub fn into_retry(self) -> Self {
        Self {
            request: self.request,
            retried: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_is_spent_once() {
        let pending = PendingRequest::new(ApiRequest::get("/accounts/me/"));
        assert!(pending.can_retry());

        let retry = pending.into_retry();
        assert!(!retry.can_retry());
        assert_eq!(retry.request.path, "/accounts/me/");
    }
}
