//! Assured Domain - Core types for the marketplace API client
//!
//! This crate defines the domain model shared by the client layers.
//! All types here are pure Rust with no I/O dependencies.

pub mod auth;
pub mod error;
pub mod marketplace;
pub mod request;
pub mod response;
pub mod state;
pub mod validation;

pub use auth::{
    AccessToken, Credentials, RefreshToken, SessionEndReason, SessionEvent, TokenPair,
    TokenStatus,
};
pub use error::{DomainError, DomainResult};
pub use marketplace::{Contract, Listing, Page, RegisterRequest, Role, User};
pub use request::{ApiRequest, HttpMethod, MultipartForm, PendingRequest, QueryParams, RequestBody};
pub use response::{ApiErrorBody, ApiResponse};
pub use state::{IllegalTransition, RequestPhase};
