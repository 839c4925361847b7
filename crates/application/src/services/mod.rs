//! Typed endpoint services
//!
//! Each service borrows an [`AuthenticatedClient`] and maps one API area
//! onto methods. Payloads the client does not interpret are passed
//! through as [`serde_json::Value`].

mod analytics;
mod auth;
mod contracts;
mod listings;
mod notifications;
mod payments;
mod reviews;

pub use analytics::AnalyticsService;
pub use auth::{AuthService, Registration};
pub use contracts::ContractsService;
pub use listings::ListingsService;
pub use notifications::NotificationsService;
pub use payments::PaymentsService;
pub use reviews::ReviewsService;

use crate::client::AuthenticatedClient;

impl AuthenticatedClient {
    /// Account, token and KYC endpoints.
    #[must_use]
    pub const fn auth(&self) -> AuthService<'_> {
        AuthService::new(self)
    }

    /// Marketplace listing endpoints.
    #[must_use]
    pub const fn listings(&self) -> ListingsService<'_> {
        ListingsService::new(self)
    }

    /// Contract negotiation, escrow and shipment endpoints.
    #[must_use]
    pub const fn contracts(&self) -> ContractsService<'_> {
        ContractsService::new(self)
    }

    /// Payment endpoints.
    #[must_use]
    pub const fn payments(&self) -> PaymentsService<'_> {
        PaymentsService::new(self)
    }

    /// Analytics endpoints.
    #[must_use]
    pub const fn analytics(&self) -> AnalyticsService<'_> {
        AnalyticsService::new(self)
    }

    /// Notification endpoints.
    #[must_use]
    pub const fn notifications(&self) -> NotificationsService<'_> {
        NotificationsService::new(self)
    }

    /// Review endpoints.
    #[must_use]
    pub const fn reviews(&self) -> ReviewsService<'_> {
        ReviewsService::new(self)
    }
}
