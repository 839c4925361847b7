//! HTTP Request domain types

mod body;
mod header;
mod method;
mod pending;
mod query;
mod spec;

pub use body::{
    FormPart, FormValue, JSON_CONTENT_TYPE, MULTIPART_CONTENT_TYPE, MultipartForm, RequestBody,
};
pub use header::{AUTHORIZATION, CONTENT_TYPE, Header, Headers};
pub use method::HttpMethod;
pub use pending::PendingRequest;
pub use query::QueryParams;
pub use spec::ApiRequest;
