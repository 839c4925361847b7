//! Session handling for the authenticated client.
//!
//! This module provides:
//! - In-memory token storage
//! - Session event broadcasting (login, refresh, forced logout)
//! - Coalesced token refresh

mod memory_store;
mod refresh;
mod session;

pub use memory_store::MemoryTokenStore;
pub use refresh::{REFRESH_PATH, RefreshCoordinator, Renewal};
pub use session::SessionEvents;
