// Collection-rule endpoints
//
// Rules are unpaged and scoped by device. The start/end point ordering is
// the server's to enforce; the client forwards what the operator entered.

use tracing::debug;

use crate::client::GatewayClient;
use crate::error::Error;
use crate::models::CollectionRule;

impl GatewayClient {
    /// List collection rules, optionally scoped to a device.
    ///
    /// `GET /api/collection-rules?deviceId=`
    pub async fn list_rules(&self, device_id: Option<&str>) -> Result<Vec<CollectionRule>, Error> {
        let mut url = self.api_url("collection-rules");
        if let Some(device_id) = device_id {
            url.query_pairs_mut().append_pair("deviceId", device_id);
        }
        self.get(url).await
    }

    /// Fetch a single rule by id.
    ///
    /// `GET /api/collection-rules/{id}`
    pub async fn get_rule(&self, id: &str) -> Result<CollectionRule, Error> {
        let url = self.api_url(&format!("collection-rules/{id}"));
        self.get(url).await
    }

    /// Create a collection rule.
    ///
    /// `POST /api/collection-rules`
    pub async fn create_rule(&self, rule: &CollectionRule) -> Result<(), Error> {
        let url = self.api_url("collection-rules");
        debug!(func = rule.rule_func_code, "creating collection rule");
        self.post(url, rule).await
    }

    /// Update an existing collection rule.
    ///
    /// `PUT /api/collection-rules/{id}`
    pub async fn update_rule(&self, id: &str, rule: &CollectionRule) -> Result<(), Error> {
        let url = self.api_url(&format!("collection-rules/{id}"));
        debug!(id, "updating collection rule");
        self.put(url, rule).await
    }

    /// Delete a collection rule.
    ///
    /// `DELETE /api/collection-rules/{id}`
    pub async fn delete_rule(&self, id: &str) -> Result<(), Error> {
        let url = self.api_url(&format!("collection-rules/{id}"));
        debug!(id, "deleting collection rule");
        self.delete(url).await
    }
}
