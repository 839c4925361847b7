//! Contracts between farmers and buyers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Amount;

/// Lifecycle status of a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractStatus {
    /// Offer made, awaiting response.
    Pending,
    /// A counter price is on the table.
    Negotiating,
    /// Terms accepted; ready for signatures.
    Accepted,
    /// Signed by both parties.
    Signed,
    /// Delivered and settled.
    Completed,
    /// Offer rejected by the farmer.
    Rejected,
    /// Withdrawn by either party.
    Cancelled,
    /// A status this client does not know.
    Other,
}

impl ContractStatus {
    /// Parses the wire name of a status.
    #[must_use]
    pub fn from_wire(value: &str) -> Self {
        match value {
            "pending" | "draft" | "proposed" => Self::Pending,
            "negotiating" | "countered" => Self::Negotiating,
            "accepted" => Self::Accepted,
            "signed" | "active" => Self::Signed,
            "completed" => Self::Completed,
            "rejected" => Self::Rejected,
            "cancelled" | "canceled" => Self::Cancelled,
            _ => Self::Other,
        }
    }

    /// Returns true if no further action is possible.
    #[must_use]
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Completed | Self::Rejected | Self::Cancelled)
    }
}

/// A price proposed during negotiation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceProposal {
    /// Proposed price per unit.
    #[serde(default)]
    pub price_per_unit: Option<Amount>,
    /// Who proposed it (id or nested user).
    #[serde(default)]
    pub proposed_by: Option<serde_json::Value>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// A contract as returned by `/contracts/contracts/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    /// Contract id.
    pub id: u64,
    /// Raw status; see [`Contract::status`].
    #[serde(default, rename = "status")]
    pub status_name: Option<String>,
    /// Listing id or nested listing.
    #[serde(default)]
    pub listing: Option<serde_json::Value>,
    /// Buyer id or nested buyer.
    #[serde(default)]
    pub buyer: Option<serde_json::Value>,
    /// Farmer id or nested farmer.
    #[serde(default)]
    pub farmer: Option<serde_json::Value>,
    /// Quantity agreed on.
    #[serde(default)]
    pub agreed_quantity: Option<Amount>,
    /// Agreed price per unit.
    #[serde(default)]
    pub price_per_unit: Option<Amount>,
    /// Negotiation history.
    #[serde(default)]
    pub proposals: Vec<PriceProposal>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Contract {
    /// Returns the parsed status.
    #[must_use]
    pub fn status(&self) -> ContractStatus {
        self.status_name
            .as_deref()
            .map_or(ContractStatus::Other, ContractStatus::from_wire)
    }

    /// Signing is only offered once terms are accepted.
    #[must_use]
    pub fn can_sign(&self) -> bool {
        self.status() == ContractStatus::Accepted
    }

    /// A proposal can only be accepted if one exists.
    #[must_use]
    pub fn can_accept_proposal(&self) -> bool {
        !self.proposals.is_empty() && !self.status().is_closed()
    }
}

/// Offer made by a buyer on a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferRequest {
    /// Listing the offer is for.
    pub listing: u64,
    /// Requested quantity.
    pub quantity: Amount,
    /// Offered price per unit.
    pub price_per_unit: Amount,
    /// Where the produce should be delivered.
    pub delivery_location: String,
    /// Optional note to the farmer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_contract_status_gates() {
        let contract: Contract = serde_json::from_str(
            r#"{"id":1,"status":"accepted","listing":4,"agreed_quantity":"500","price_per_unit":21,"proposals":[{"price_per_unit":"21.00","proposed_by":8}]}"#,
        )
        .unwrap();

        assert_eq!(contract.status(), ContractStatus::Accepted);
        assert!(contract.can_sign());
        assert!(contract.can_accept_proposal());
    }

    #[test]
    fn test_closed_contract() {
        let contract: Contract =
            serde_json::from_str(r#"{"id":2,"status":"cancelled"}"#).unwrap();
        assert!(contract.status().is_closed());
        assert!(!contract.can_sign());
        assert!(!contract.can_accept_proposal());
    }

    #[test]
    fn test_unknown_status() {
        assert_eq!(ContractStatus::from_wire("escrow_hold"), ContractStatus::Other);
    }
}
