//! Per-request authentication state machine.
//!
//! Every call made through the authenticated client walks this machine:
//!
//! ```text
//! Sent ─┬─> Success
//!       ├─> FailedNonAuth
//!       └─> FailedAuthFirstAttempt ─> Refreshing ─┬─> RetriedSuccess
//!                                                 ├─> RetriedFailed
//!                                                 └─> RefreshFailedTerminal
//! ```

use serde::{Deserialize, Serialize};

/// Phase of a single logical request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RequestPhase {
    /// Dispatched with the current access token.
    #[default]
    Sent,
    /// First attempt returned 2xx.
    Success,
    /// First attempt failed with anything but 401.
    FailedNonAuth,
    /// First attempt returned 401 and is eligible for one retry.
    FailedAuthFirstAttempt,
    /// Waiting for a new access token.
    Refreshing,
    /// Retry returned 2xx.
    RetriedSuccess,
    /// Retry failed (any status, including a second 401).
    RetriedFailed,
    /// The session could not be renewed; tokens were purged.
    RefreshFailedTerminal,
}

/// Error returned for an edge the machine does not allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("illegal request phase transition {from:?} -> {to:?}")]
pub struct IllegalTransition {
    /// Phase the request was in.
    pub from: RequestPhase,
    /// Phase that was requested.
    pub to: RequestPhase,
}

impl RequestPhase {
    /// Returns true if no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Success
                | Self::FailedNonAuth
                | Self::RetriedSuccess
                | Self::RetriedFailed
                | Self::RefreshFailedTerminal
        )
    }

    /// Returns true if `next` is a legal successor of this phase.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (
                Self::Sent,
                Self::Success | Self::FailedNonAuth | Self::FailedAuthFirstAttempt
            ) | (Self::FailedAuthFirstAttempt, Self::Refreshing)
                | (
                    Self::Refreshing,
                    Self::RetriedSuccess | Self::RetriedFailed | Self::RefreshFailedTerminal
                )
        )
    }

    /// Moves to `next` if the edge exists.
    ///
    /// # Errors
    ///
    /// Returns [`IllegalTransition`] when the edge is not part of the machine.
    pub const fn transition(self, next: Self) -> Result<Self, IllegalTransition> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(IllegalTransition {
                from: self,
                to: next,
            })
        }
    }

    /// Phase reached after the first response with the given status.
    #[must_use]
    pub const fn after_first_response(status: u16) -> Self {
        match status {
            200..=299 => Self::Success,
            401 => Self::FailedAuthFirstAttempt,
            _ => Self::FailedNonAuth,
        }
    }

    /// Phase reached after the retried response with the given status.
    #[must_use]
    pub const fn after_retry(status: u16) -> Self {
        if status >= 200 && status < 300 {
            Self::RetriedSuccess
        } else {
            Self::RetriedFailed
        }
    }
}
