//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the client core and external systems.
//! Each port is a trait implemented by adapters in the infrastructure layer.

mod http_transport;
mod token_store;

pub use http_transport::{HttpTransport, TransportError};
pub use token_store::{StoredTokens, TokenStore, TokenStoreError};
