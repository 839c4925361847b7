//! HTTP Response domain types

mod error_body;
mod spec;

pub use error_body::{ApiErrorBody, GENERIC_ERROR_MESSAGE};
pub use spec::ApiResponse;
