// Live monitoring endpoints
//
// The snapshot is a POST with no body (the gateway flushes its internal
// state before answering); the per-device alarm drill-down is a GET on
// the same path with an `id` query parameter.

use tracing::debug;

use crate::client::GatewayClient;
use crate::error::Error;
use crate::models::{AlarmDetail, DeviceMonitor};

impl GatewayClient {
    /// Fetch the live device status snapshot.
    ///
    /// `POST /api/system/monitor` (no body)
    pub async fn monitor_snapshot(&self) -> Result<Vec<DeviceMonitor>, Error> {
        let url = self.api_url("system/monitor");
        self.post_empty_json(url).await
    }

    /// Fetch current alarms for one device.
    ///
    /// `GET /api/system/monitor?id={device_id}`
    pub async fn device_alarms(&self, device_id: i64) -> Result<Vec<AlarmDetail>, Error> {
        let mut url = self.api_url("system/monitor");
        url.query_pairs_mut()
            .append_pair("id", &device_id.to_string());
        debug!(device_id, "fetching alarm detail");
        self.get(url).await
    }
}
