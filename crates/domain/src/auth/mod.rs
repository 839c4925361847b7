//! Authentication domain types

mod session;
mod types;

pub use session::{SessionEndReason, SessionEvent};
pub use types::{
    ACCESS_TOKEN_KEY, AccessToken, Credentials, REFRESH_TOKEN_KEY, RefreshToken, TokenPair,
    TokenStatus, token_preview,
};
