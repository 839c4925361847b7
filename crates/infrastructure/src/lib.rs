//! Assured Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus configuration loading.

pub mod adapters;
pub mod config;
pub mod persistence;
pub mod serialization;
pub mod upload;

pub use adapters::ReqwestTransport;
pub use self::config::{ClientConfig, ConfigError, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS};
pub use persistence::FileTokenStore;
pub use serialization::{SerializationError, from_json_bytes, to_json_stable_bytes};
pub use upload::{UploadError, attach_file};
