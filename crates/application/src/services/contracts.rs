//! Contract negotiation, escrow and shipment endpoints.

use assured_domain::validation::validate_offer;
use assured_domain::{ApiRequest, Contract, Page, QueryParams};
use assured_domain::marketplace::OfferRequest;
use serde::Serialize;
use serde_json::Value;

use crate::client::AuthenticatedClient;
use crate::error::ClientResult;

const CONTRACTS_PATH: &str = "/contracts/contracts/";
const ESCROWS_PATH: &str = "/contracts/escrows/";
const SHIPMENTS_PATH: &str = "/contracts/shipments/";

fn action_path(id: u64, action: &str) -> String {
    format!("{CONTRACTS_PATH}{id}/{action}/")
}

/// Contract negotiation, escrow and shipment endpoints.
#[derive(Debug, Clone, Copy)]
pub struct ContractsService<'a> {
    client: &'a AuthenticatedClient,
}

impl<'a> ContractsService<'a> {
    /// Creates the service.
    #[must_use]
    pub const fn new(client: &'a AuthenticatedClient) -> Self {
        Self { client }
    }

    /// Lists the caller's contracts.
    ///
    /// # Errors
    ///
    /// Returns the server's error.
    pub async fn list(&self, query: QueryParams) -> ClientResult<Page<Contract>> {
        self.client
            .send_json(ApiRequest::get(CONTRACTS_PATH).with_query(query))
            .await
    }

    /// Fetches one contract.
    ///
    /// # Errors
    ///
    /// Returns the server's error.
    pub async fn get(&self, id: u64) -> ClientResult<Contract> {
        self.client.get_json(&format!("{CONTRACTS_PATH}{id}/")).await
    }

    /// Makes an offer on a listing, creating a contract.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad input, or the server's error.
    pub async fn make_offer(&self, offer: &OfferRequest) -> ClientResult<Contract> {
        validate_offer(offer)?;
        self.client.post_json(CONTRACTS_PATH, offer).await
    }

    /// Creates a contract from an arbitrary payload.
    ///
    /// # Errors
    ///
    /// Returns the server's error.
    pub async fn create<B: Serialize + ?Sized>(&self, payload: &B) -> ClientResult<Contract> {
        self.client.post_json(CONTRACTS_PATH, payload).await
    }

    /// Proposes a new price.
    ///
    /// # Errors
    ///
    /// Returns the server's error.
    pub async fn propose_price<B: Serialize + ?Sized>(&self, id: u64, payload: &B) -> ClientResult<Value> {
        self.action(id, "propose_price", payload).await
    }

    /// Accepts the latest price proposal.
    ///
    /// # Errors
    ///
    /// Returns the server's error.
    pub async fn accept_proposal(&self, id: u64) -> ClientResult<Value> {
        self.action(id, "accept_proposal", &serde_json::json!({})).await
    }

    /// Accepts an offer.
    ///
    /// # Errors
    ///
    /// Returns the server's error.
    pub async fn accept<B: Serialize + ?Sized>(&self, id: u64, payload: &B) -> ClientResult<Value> {
        self.action(id, "accept", payload).await
    }

    /// Rejects an offer.
    ///
    /// # Errors
    ///
    /// Returns the server's error.
    pub async fn reject(&self, id: u64) -> ClientResult<Value> {
        self.bare_action(id, "reject").await
    }

    /// Answers an offer with a counter offer.
    ///
    /// # Errors
    ///
    /// Returns the server's error.
    pub async fn counter_offer<B: Serialize + ?Sized>(&self, id: u64, payload: &B) -> ClientResult<Value> {
        self.action(id, "counter_offer", payload).await
    }

    /// Signs an accepted contract.
    ///
    /// # Errors
    ///
    /// Returns the server's error.
    pub async fn sign(&self, id: u64) -> ClientResult<Value> {
        self.action(id, "sign", &serde_json::json!({})).await
    }

    /// Fetches the negotiation history.
    ///
    /// # Errors
    ///
    /// Returns the server's error.
    pub async fn history(&self, id: u64) -> ClientResult<Value> {
        self.client.get_json(&action_path(id, "history")).await
    }

    /// Marks a contract completed.
    ///
    /// # Errors
    ///
    /// Returns the server's error.
    pub async fn complete(&self, id: u64) -> ClientResult<Value> {
        self.bare_action(id, "complete").await
    }

    /// Cancels a contract.
    ///
    /// # Errors
    ///
    /// Returns the server's error.
    pub async fn cancel(&self, id: u64) -> ClientResult<Value> {
        self.bare_action(id, "cancel").await
    }

    /// Lists escrows.
    ///
    /// # Errors
    ///
    /// Returns the server's error.
    pub async fn escrows(&self, query: QueryParams) -> ClientResult<Value> {
        self.client
            .send_json(ApiRequest::get(ESCROWS_PATH).with_query(query))
            .await
    }

    /// Lists shipments.
    ///
    /// # Errors
    ///
    /// Returns the server's error.
    pub async fn shipments(&self, query: QueryParams) -> ClientResult<Value> {
        self.client
            .send_json(ApiRequest::get(SHIPMENTS_PATH).with_query(query))
            .await
    }

    /// Confirms delivery of a shipment.
    ///
    /// # Errors
    ///
    /// Returns the server's error.
    pub async fn confirm_delivery(&self, shipment_id: u64) -> ClientResult<Value> {
        self.client
            .send_json(ApiRequest::post(format!(
                "{SHIPMENTS_PATH}{shipment_id}/confirm_delivery/"
            )))
            .await
    }

    async fn action<B: Serialize + ?Sized>(&self, id: u64, action: &str, payload: &B) -> ClientResult<Value> {
        self.client.post_json(&action_path(id, action), payload).await
    }

    async fn bare_action(&self, id: u64, action: &str) -> ClientResult<Value> {
        self.client
            .send_json(ApiRequest::post(action_path(id, action)))
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::auth::MemoryTokenStore;
    use crate::testing::ScriptedTransport;
    use assured_domain::marketplace::{Amount, ContractStatus};
    use assured_domain::{ApiResponse, RequestBody};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;

    fn setup(transport: ScriptedTransport) -> (Arc<ScriptedTransport>, AuthenticatedClient) {
        let transport = Arc::new(transport);
        let client = AuthenticatedClient::new(transport.clone(), Arc::new(MemoryTokenStore::new()));
        (transport, client)
    }

    #[tokio::test]
    async fn test_make_offer() {
        let transport = ScriptedTransport::new();
        transport.on(
            CONTRACTS_PATH,
            ApiResponse::new(201).with_json(&json!({"id": 11, "status": "pending"})),
        );
        let (transport, client) = setup(transport);

        let offer = OfferRequest {
            listing: 3,
            quantity: Amount::from(50_u32),
            price_per_unit: Amount::from(40.5),
            delivery_location: "Nashik".to_string(),
            notes: None,
        };
        let contract = client.contracts().make_offer(&offer).await.unwrap();

        assert_eq!(contract.id, 11);
        assert_eq!(contract.status(), ContractStatus::from_wire("pending"));
        assert!(matches!(
            transport.requests_to(CONTRACTS_PATH)[0].body,
            RequestBody::Json(_)
        ));
    }

    #[tokio::test]
    async fn test_action_paths() {
        let transport = ScriptedTransport::new();
        for path in [
            "/contracts/contracts/5/accept_proposal/",
            "/contracts/contracts/5/reject/",
            "/contracts/shipments/9/confirm_delivery/",
        ] {
            transport.on(path, ApiResponse::new(200).with_json(&json!({"ok": true})));
        }
        let (transport, client) = setup(transport);
        let contracts = client.contracts();

        contracts.accept_proposal(5).await.unwrap();
        contracts.reject(5).await.unwrap();
        contracts.confirm_delivery(9).await.unwrap();

        let paths: Vec<_> = transport.requests().into_iter().map(|r| r.path).collect();
        assert_eq!(
            paths,
            vec![
                "/contracts/contracts/5/accept_proposal/",
                "/contracts/contracts/5/reject/",
                "/contracts/shipments/9/confirm_delivery/",
            ]
        );
    }
}
