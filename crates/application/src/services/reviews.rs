//! Review endpoints.

use assured_domain::{ApiRequest, QueryParams};
use serde::Serialize;
use serde_json::Value;

use crate::client::AuthenticatedClient;
use crate::error::ClientResult;

/// Review endpoints.
#[derive(Debug, Clone, Copy)]
pub struct ReviewsService<'a> {
    client: &'a AuthenticatedClient,
}

impl<'a> ReviewsService<'a> {
    /// Creates the service.
    #[must_use]
    pub const fn new(client: &'a AuthenticatedClient) -> Self {
        Self { client }
    }

    /// Reviews left on a listing.
    ///
    /// # Errors
    ///
    /// Returns the server's error.
    pub async fn for_listing(&self, listing_id: u64, query: QueryParams) -> ClientResult<Value> {
        self.client
            .send_json(
                ApiRequest::get(format!("/marketplace/listings/{listing_id}/reviews/"))
                    .with_query(query),
            )
            .await
    }

    /// Posts a review.
    ///
    /// # Errors
    ///
    /// Returns the server's error.
    pub async fn create<B: Serialize + ?Sized>(&self, payload: &B) -> ClientResult<Value> {
        self.client.post_json("/reviews/", payload).await
    }

    /// Reviews received by a seller.
    ///
    /// # Errors
    ///
    /// Returns the server's error.
    pub async fn for_seller(&self, seller_id: u64, query: QueryParams) -> ClientResult<Value> {
        self.client
            .send_json(ApiRequest::get(format!("/reviews/seller/{seller_id}/")).with_query(query))
            .await
    }
}
