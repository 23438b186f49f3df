// Device endpoints
//
// Fleet configuration: list, fetch, create, update, delete, plus the
// narrow status toggle that bypasses the full edit round trip.

use serde_json::json;
use tracing::debug;

use crate::client::GatewayClient;
use crate::error::Error;
use crate::models::Device;

impl GatewayClient {
    /// List all configured devices.
    ///
    /// `GET /api/devices`
    pub async fn list_devices(&self) -> Result<Vec<Device>, Error> {
        let url = self.api_url("devices");
        self.get(url).await
    }

    /// Fetch a single device by id.
    ///
    /// `GET /api/devices/{id}`
    pub async fn get_device(&self, id: &str) -> Result<Device, Error> {
        let url = self.api_url(&format!("devices/{id}"));
        self.get(url).await
    }

    /// Create a device. The gateway assigns the id.
    ///
    /// `POST /api/devices`
    pub async fn create_device(&self, device: &Device) -> Result<(), Error> {
        let url = self.api_url("devices");
        debug!(name = %device.name, "creating device");
        self.post(url, device).await
    }

    /// Update an existing device.
    ///
    /// `PUT /api/devices/{id}`
    pub async fn update_device(&self, id: &str, device: &Device) -> Result<(), Error> {
        let url = self.api_url(&format!("devices/{id}"));
        debug!(id, "updating device");
        self.put(url, device).await
    }

    /// Delete a device.
    ///
    /// `DELETE /api/devices/{id}`
    pub async fn delete_device(&self, id: &str) -> Result<(), Error> {
        let url = self.api_url(&format!("devices/{id}"));
        debug!(id, "deleting device");
        self.delete(url).await
    }

    /// Toggle the running/stopped flag without touching the rest of the record.
    ///
    /// `PUT /api/devices/{id}/status` with body `{"status": bool}`
    pub async fn set_device_status(&self, id: &str, status: bool) -> Result<(), Error> {
        let url = self.api_url(&format!("devices/{id}/status"));
        debug!(id, status, "toggling device status");
        self.put(url, &json!({ "status": status })).await
    }
}
