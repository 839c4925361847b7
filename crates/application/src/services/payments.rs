//! Payment endpoints.

use assured_domain::{ApiRequest, QueryParams};
use serde::Serialize;
use serde_json::Value;

use crate::client::AuthenticatedClient;
use crate::error::ClientResult;

/// Payment endpoints.
#[derive(Debug, Clone, Copy)]
pub struct PaymentsService<'a> {
    client: &'a AuthenticatedClient,
}

impl<'a> PaymentsService<'a> {
    /// Creates the service.
    #[must_use]
    pub const fn new(client: &'a AuthenticatedClient) -> Self {
        Self { client }
    }

    /// Lists the available payment methods.
    ///
    /// # Errors
    ///
    /// Returns the server's error.
    pub async fn methods(&self) -> ClientResult<Value> {
        self.client.get_json("/payments/methods/").await
    }

    /// Starts a payment.
    ///
    /// # Errors
    ///
    /// Returns the server's error.
    pub async fn create<B: Serialize + ?Sized>(&self, payload: &B) -> ClientResult<Value> {
        self.client.post_json("/payments/payments/", payload).await
    }

    /// Fetches the status of a payment.
    ///
    /// # Errors
    ///
    /// Returns the server's error.
    pub async fn status(&self, payment_id: u64) -> ClientResult<Value> {
        self.client
            .get_json(&format!("/payments/payments/{payment_id}/"))
            .await
    }

    /// Lists escrow transactions.
    ///
    /// # Errors
    ///
    /// Returns the server's error.
    pub async fn escrow_transactions(&self, query: QueryParams) -> ClientResult<Value> {
        self.client
            .send_json(ApiRequest::get("/payments/escrow/").with_query(query))
            .await
    }
}
