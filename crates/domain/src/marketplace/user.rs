//! Account types.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Marketplace role of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Sells produce through listings.
    Farmer,
    /// Makes offers on listings.
    Buyer,
    /// Platform administrator.
    Admin,
}

impl Role {
    /// Parses the wire name of a role.
    #[must_use]
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "farmer" => Some(Self::Farmer),
            "buyer" => Some(Self::Buyer),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Returns the wire name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Farmer => "farmer",
            Self::Buyer => "buyer",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated user, as returned by `/accounts/me/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Account id.
    pub id: u64,
    /// Login name.
    pub username: String,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Raw role name; see [`User::role`].
    #[serde(default, rename = "role")]
    pub role_name: Option<String>,
    /// Whether KYC has been approved.
    #[serde(default)]
    pub is_verified: bool,
    /// Farmer profile, when the account is a farmer.
    #[serde(default)]
    pub farmer_profile: Option<serde_json::Value>,
    /// Buyer profile, when the account is a buyer.
    #[serde(default)]
    pub buyer_profile: Option<serde_json::Value>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl User {
    /// Returns the role, or None when absent or unknown.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.role_name.as_deref().and_then(Role::from_wire)
    }

    /// Returns true for farmer accounts.
    #[must_use]
    pub fn is_farmer(&self) -> bool {
        self.role() == Some(Role::Farmer)
    }

    /// Returns true for buyer accounts.
    #[must_use]
    pub fn is_buyer(&self) -> bool {
        self.role() == Some(Role::Buyer)
    }

    /// Returns true for administrators.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role() == Some(Role::Admin)
    }
}

/// Payload for `/accounts/register/`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Desired login name.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Ten digit mobile number.
    pub phone: String,
    /// Password.
    pub password: String,
    /// Password repeated.
    pub password_confirm: String,
    /// Requested role; only farmer and buyer may self-register.
    pub role: Role,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_user_roles() {
        let user: User = serde_json::from_str(
            r#"{"id":3,"username":"asha","role":"farmer","is_verified":true,"farmer_profile":{"village":"Nashik"},"date_joined":"2024-01-01"}"#,
        )
        .unwrap();

        assert_eq!(user.role(), Some(Role::Farmer));
        assert!(user.is_farmer());
        assert!(!user.is_buyer());
        assert!(user.extra.contains_key("date_joined"));
    }

    #[test]
    fn test_unknown_role_is_none() {
        let user: User =
            serde_json::from_str(r#"{"id":4,"username":"ops","role":"auditor"}"#).unwrap();
        assert_eq!(user.role(), None);
        assert!(!user.is_admin());
        assert!(!user.is_verified);
    }
}
