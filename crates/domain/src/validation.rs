//! Form input rules checked before a request leaves the client.
//!
//! Each function reports the first failing field.

use std::sync::LazyLock;

use regex::Regex;

use crate::auth::Credentials;
use crate::error::{DomainError, DomainResult};
use crate::marketplace::{OfferRequest, RegisterRequest, Role};

static USERNAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9_]+$").unwrap_or_else(|_| unreachable!("static pattern"))
});

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap_or_else(|_| unreachable!("static pattern"))
});

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[6-9][0-9]{9}$").unwrap_or_else(|_| unreachable!("static pattern"))
});

const PASSWORD_SPECIALS: &[char] = &['@', '$', '!', '%', '*', '?', '&'];

fn require(condition: bool, field: &'static str, message: &'static str) -> DomainResult<()> {
    if condition {
        Ok(())
    } else {
        Err(DomainError::validation(field, message))
    }
}

/// Checks login input.
///
/// # Errors
///
/// Returns [`DomainError::Validation`] for the first failing field.
pub fn validate_credentials(credentials: &Credentials) -> DomainResult<()> {
    let username = &credentials.username;
    require(!username.is_empty(), "username", "Username is required")?;
    require(
        username.chars().count() >= 3,
        "username",
        "Username must be at least 3 characters",
    )?;
    require(
        !credentials.password.is_empty(),
        "password",
        "Password is required",
    )?;
    require(
        credentials.password.chars().count() >= 6,
        "password",
        "Password must be at least 6 characters",
    )
}

/// Checks registration input.
///
/// # Errors
///
/// Returns [`DomainError::Validation`] for the first failing field.
pub fn validate_registration(request: &RegisterRequest) -> DomainResult<()> {
    require(
        request.username.chars().count() >= 3,
        "username",
        "Username must be at least 3 characters",
    )?;
    require(
        USERNAME_RE.is_match(&request.username),
        "username",
        "Username can only contain letters, numbers, and underscores",
    )?;
    require(
        EMAIL_RE.is_match(&request.email),
        "email",
        "Invalid email address",
    )?;
    require(
        PHONE_RE.is_match(&request.phone),
        "phone",
        "Invalid Indian phone number",
    )?;
    validate_password(&request.password)?;
    require(
        request.password == request.password_confirm,
        "password_confirm",
        "Passwords must match",
    )?;
    require(
        matches!(request.role, Role::Farmer | Role::Buyer),
        "role",
        "Please select a valid role",
    )
}

fn validate_password(password: &str) -> DomainResult<()> {
    require(
        password.chars().count() >= 8,
        "password",
        "Password must be at least 8 characters",
    )?;
    require(
        password.chars().any(|c| c.is_ascii_uppercase()),
        "password",
        "Password must contain an uppercase letter",
    )?;
    require(
        password.chars().any(|c| c.is_ascii_digit()),
        "password",
        "Password must contain a number",
    )?;
    require(
        password.contains(PASSWORD_SPECIALS),
        "password",
        "Password must contain a special character (@$!%*?&)",
    )
}

/// Checks an offer before it is sent.
///
/// # Errors
///
/// Returns [`DomainError::Validation`] for the first failing field.
pub fn validate_offer(offer: &OfferRequest) -> DomainResult<()> {
    require(
        offer.quantity.to_f64().is_some_and(|q| q > 0.0),
        "quantity",
        "Quantity must be greater than 0",
    )?;
    require(
        offer.price_per_unit.to_f64().is_some_and(|p| p > 0.0),
        "price_per_unit",
        "Price must be greater than 0",
    )?;
    require(
        offer.delivery_location.trim().chars().count() >= 5,
        "delivery_location",
        "Delivery location is required",
    )?;
    require(
        offer
            .notes
            .as_deref()
            .is_none_or(|notes| notes.chars().count() <= 500),
        "notes",
        "Notes must not exceed 500 characters",
    )
}
