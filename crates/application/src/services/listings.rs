//! Marketplace listing endpoints.

use assured_domain::{ApiRequest, Listing, MultipartForm, Page, QueryParams, RequestBody};
use serde_json::Value;

use crate::client::AuthenticatedClient;
use crate::error::ClientResult;

const LISTINGS_PATH: &str = "/marketplace/listings/";
const CROPS_PATH: &str = "/marketplace/crops/";
const CATEGORIES_PATH: &str = "/marketplace/categories/";

fn listing_path(id: u64) -> String {
    format!("{LISTINGS_PATH}{id}/")
}

/// Marketplace listing endpoints.
#[derive(Debug, Clone, Copy)]
pub struct ListingsService<'a> {
    client: &'a AuthenticatedClient,
}

impl<'a> ListingsService<'a> {
    /// Creates the service.
    #[must_use]
    pub const fn new(client: &'a AuthenticatedClient) -> Self {
        Self { client }
    }

    /// Lists listings, filtered by `query` (e.g. `crop`, `search`, `page`).
    ///
    /// # Errors
    ///
    /// Returns the server's error.
    pub async fn list(&self, query: QueryParams) -> ClientResult<Page<Listing>> {
        self.client
            .send_json(ApiRequest::get(LISTINGS_PATH).with_query(query))
            .await
    }

    /// Fetches one listing.
    ///
    /// # Errors
    ///
    /// Returns the server's error.
    pub async fn get(&self, id: u64) -> ClientResult<Listing> {
        self.client.get_json(&listing_path(id)).await
    }

    /// Creates a listing from a JSON or multipart body.
    ///
    /// # Errors
    ///
    /// Returns the server's error.
    pub async fn create(&self, body: impl Into<RequestBody>) -> ClientResult<Listing> {
        self.client
            .send_json(ApiRequest::post(LISTINGS_PATH).with_body(body))
            .await
    }

    /// Replaces a listing.
    ///
    /// # Errors
    ///
    /// Returns the server's error.
    pub async fn update(&self, id: u64, body: impl Into<RequestBody>) -> ClientResult<Listing> {
        self.client
            .send_json(ApiRequest::put(listing_path(id)).with_body(body))
            .await
    }

    /// Partially updates a listing.
    ///
    /// # Errors
    ///
    /// Returns the server's error.
    pub async fn patch(&self, id: u64, body: impl Into<RequestBody>) -> ClientResult<Listing> {
        self.client
            .send_json(ApiRequest::patch(listing_path(id)).with_body(body))
            .await
    }

    /// Deletes a listing.
    ///
    /// # Errors
    ///
    /// Returns the server's error.
    pub async fn delete(&self, id: u64) -> ClientResult<()> {
        self.client.delete(&listing_path(id)).await?;
        Ok(())
    }

    /// Lists a listing's images.
    ///
    /// # Errors
    ///
    /// Returns the server's error.
    pub async fn images(&self, id: u64) -> ClientResult<Value> {
        self.client
            .get_json(&format!("{LISTINGS_PATH}{id}/images/"))
            .await
    }

    /// Uploads an image for a listing.
    ///
    /// # Errors
    ///
    /// Returns the server's error.
    pub async fn upload_image(&self, id: u64, form: MultipartForm) -> ClientResult<Value> {
        self.client
            .send_json(ApiRequest::post(format!("{LISTINGS_PATH}{id}/images/")).with_body(form))
            .await
    }

    /// Lists the crops a listing can be created for.
    ///
    /// # Errors
    ///
    /// Returns the server's error.
    pub async fn crops(&self) -> ClientResult<Value> {
        self.client.get_json(CROPS_PATH).await
    }

    /// Lists crop categories.
    ///
    /// # Errors
    ///
    /// Returns the server's error.
    pub async fn categories(&self) -> ClientResult<Value> {
        self.client.get_json(CATEGORIES_PATH).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::auth::MemoryTokenStore;
    use crate::testing::ScriptedTransport;
    use assured_domain::{ApiResponse, HttpMethod};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;

    fn setup(transport: ScriptedTransport) -> (Arc<ScriptedTransport>, AuthenticatedClient) {
        let transport = Arc::new(transport);
        let client = AuthenticatedClient::new(transport.clone(), Arc::new(MemoryTokenStore::new()));
        (transport, client)
    }

    #[tokio::test]
    async fn test_list_paginated_with_query() {
        let transport = ScriptedTransport::new();
        transport.on(
            LISTINGS_PATH,
            ApiResponse::new(200).with_json(&json!({
                "count": 1,
                "next": null,
                "previous": null,
                "results": [{"id": 3, "title": "Basmati rice", "price_floor": "42.50"}]
            })),
        );
        let (transport, client) = setup(transport);

        let page = client
            .listings()
            .list(QueryParams::new().with("crop", "rice").with("page", 2))
            .await
            .unwrap();

        assert_eq!(page.total(), 1);
        assert_eq!(page.items()[0].id, 3);
        let sent = &transport.requests_to(LISTINGS_PATH)[0];
        assert_eq!(sent.query.get("crop"), Some("rice"));
        assert_eq!(sent.query.get("page"), Some("2"));
    }

    #[tokio::test]
    async fn test_paths_and_methods() {
        let transport = ScriptedTransport::new();
        transport.on("/marketplace/listings/3/", ApiResponse::new(200).with_json(&json!({"id": 3})));
        transport.on("/marketplace/listings/3/", ApiResponse::new(204));
        let (transport, client) = setup(transport);
        let listings = client.listings();

        listings.update(3, RequestBody::json(&json!({"title": "x"})).unwrap()).await.unwrap();
        listings.delete(3).await.unwrap();

        let methods: Vec<_> = transport
            .requests_to("/marketplace/listings/3/")
            .iter()
            .map(|r| r.method)
            .collect();
        assert_eq!(methods, vec![HttpMethod::Put, HttpMethod::Delete]);
    }
}
