//! Notification endpoints.

use assured_domain::{ApiRequest, QueryParams};
use serde_json::{Value, json};

use crate::client::AuthenticatedClient;
use crate::error::ClientResult;

/// Notification endpoints.
#[derive(Debug, Clone, Copy)]
pub struct NotificationsService<'a> {
    client: &'a AuthenticatedClient,
}

impl<'a> NotificationsService<'a> {
    /// Creates the service.
    #[must_use]
    pub const fn new(client: &'a AuthenticatedClient) -> Self {
        Self { client }
    }

    /// Lists notifications.
    ///
    /// # Errors
    ///
    /// Returns the server's error.
    pub async fn list(&self, query: QueryParams) -> ClientResult<Value> {
        self.client
            .send_json(ApiRequest::get("/notifications/").with_query(query))
            .await
    }

    /// Marks one notification as read.
    ///
    /// # Errors
    ///
    /// Returns the server's error.
    pub async fn mark_read(&self, id: u64) -> ClientResult<Value> {
        self.client
            .patch_json(&format!("/notifications/{id}/"), &json!({ "read": true }))
            .await
    }

    /// Marks every notification as read.
    ///
    /// # Errors
    ///
    /// Returns the server's error.
    pub async fn mark_all_read(&self) -> ClientResult<Value> {
        self.client
            .send_json(ApiRequest::post("/notifications/mark-all-read/"))
            .await
    }

    /// Deletes a notification.
    ///
    /// # Errors
    ///
    /// Returns the server's error.
    pub async fn delete(&self, id: u64) -> ClientResult<()> {
        self.client.delete(&format!("/notifications/{id}/")).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::auth::MemoryTokenStore;
    use crate::testing::ScriptedTransport;
    use assured_domain::{ApiResponse, HttpMethod, RequestBody};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_mark_read_patches_read_flag() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.on("/notifications/8/", ApiResponse::new(200).with_json(&json!({"id": 8, "read": true})));
        let client = AuthenticatedClient::new(transport.clone(), Arc::new(MemoryTokenStore::new()));

        client.notifications().mark_read(8).await.unwrap();

        let sent = &transport.requests_to("/notifications/8/")[0];
        assert_eq!(sent.method, HttpMethod::Patch);
        assert_eq!(sent.body, RequestBody::Json(json!({"read": true})));
    }
}
