//! Analytics endpoints.

use assured_domain::{ApiRequest, QueryParams};
use serde_json::Value;

use crate::client::AuthenticatedClient;
use crate::error::ClientResult;

/// Analytics endpoints.
#[derive(Debug, Clone, Copy)]
pub struct AnalyticsService<'a> {
    client: &'a AuthenticatedClient,
}

impl<'a> AnalyticsService<'a> {
    /// Creates the service.
    #[must_use]
    pub const fn new(client: &'a AuthenticatedClient) -> Self {
        Self { client }
    }

    /// Dashboard summary for the logged-in user.
    ///
    /// # Errors
    ///
    /// Returns the server's error.
    pub async fn dashboard(&self) -> ClientResult<Value> {
        self.client.get_json("/analytics/dashboard/").await
    }

    /// Revenue over time.
    ///
    /// # Errors
    ///
    /// Returns the server's error.
    pub async fn revenue(&self, query: QueryParams) -> ClientResult<Value> {
        self.query("/analytics/revenue/", query).await
    }

    /// Sales over time.
    ///
    /// # Errors
    ///
    /// Returns the server's error.
    pub async fn sales(&self, query: QueryParams) -> ClientResult<Value> {
        self.query("/analytics/sales/", query).await
    }

    /// Contract counts by status.
    ///
    /// # Errors
    ///
    /// Returns the server's error.
    pub async fn contracts(&self, query: QueryParams) -> ClientResult<Value> {
        self.query("/analytics/contracts/", query).await
    }

    /// Best selling crops.
    ///
    /// # Errors
    ///
    /// Returns the server's error.
    pub async fn top_crops(&self) -> ClientResult<Value> {
        self.client.get_json("/analytics/top-crops/").await
    }

    /// Performance metrics.
    ///
    /// # Errors
    ///
    /// Returns the server's error.
    pub async fn performance(&self) -> ClientResult<Value> {
        self.client.get_json("/analytics/performance/").await
    }

    async fn query(&self, path: &str, query: QueryParams) -> ClientResult<Value> {
        self.client
            .send_json(ApiRequest::get(path).with_query(query))
            .await
    }
}
