//! Assured Application - Authenticated client and endpoint services
//!
//! This crate defines the application layer with:
//! - Port traits for the HTTP transport and the token store
//! - The authenticated client with coalesced token refresh
//! - Typed services for each API area
//! - Application-level error handling

pub mod auth;
pub mod client;
pub mod error;
pub mod ports;
pub mod services;

#[cfg(test)]
mod testing;

pub use auth::{MemoryTokenStore, REFRESH_PATH, RefreshCoordinator, Renewal, SessionEvents};
pub use client::AuthenticatedClient;
pub use error::{ClientError, ClientResult, ErrorKind};
pub use ports::{HttpTransport, StoredTokens, TokenStore, TokenStoreError, TransportError};
pub use services::{
    AnalyticsService, AuthService, ContractsService, ListingsService, NotificationsService,
    PaymentsService, Registration, ReviewsService,
};
