// ── Console orchestrator ──
//
// Wraps every backend exchange with entity-kind-annotated errors and
// owns the request tracker the front end uses to discard stale
// responses. The console never touches view state: loaders read it,
// user actions write it, and the console just talks to the gateway.

use std::sync::Arc;

use tracing::{debug, info};
use url::Url;

use sentra_api::{
    AlarmDetail, CollectionRule, Device, DeviceMonitor, GatewayClient, Point, PointPage,
    PointQuery, TransportConfig,
};

use crate::error::{CoreError, EntityKind};
use crate::generation::{RequestTracker, View};

/// Aggregates derived from one monitor snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MonitorStats {
    pub total_devices: usize,
    pub online_devices: usize,
    /// Devices with a nonzero current alarm count.
    pub alarm_devices: usize,
}

impl MonitorStats {
    /// Compute the header aggregates for a snapshot.
    pub fn from_rows(rows: &[DeviceMonitor]) -> Self {
        Self {
            total_devices: rows.len(),
            online_devices: rows.iter().filter(|r| r.is_online()).count(),
            alarm_devices: rows.iter().filter(|r| r.current_alarm_count > 0).count(),
        }
    }
}

/// The CRUD orchestrator.
///
/// Cheaply cloneable; every operation is a single round trip whose
/// failure is annotated with the entity kind it touched. Upserts route
/// on id presence: a record with an id is updated, one without is
/// created — the gateway assigns ids.
#[derive(Clone)]
pub struct Console {
    client: Arc<GatewayClient>,
    tracker: Arc<RequestTracker>,
}

impl Console {
    /// Create a console for the gateway at `url`.
    pub fn new(url: Url, transport: &TransportConfig) -> Result<Self, sentra_api::Error> {
        let client = GatewayClient::new(url, transport)?;
        Ok(Self::with_client(client))
    }

    /// Create a console around an existing client (tests).
    pub fn with_client(client: GatewayClient) -> Self {
        Self {
            client: Arc::new(client),
            tracker: Arc::new(RequestTracker::new()),
        }
    }

    /// The per-view request tracker.
    pub fn tracker(&self) -> &RequestTracker {
        &self.tracker
    }

    /// Tag a new request for `view`, superseding any in-flight one.
    pub fn begin_request(&self, view: View) -> u64 {
        self.tracker.begin(view)
    }

    /// Whether a response generation is still the latest for `view`.
    pub fn is_current(&self, view: View, generation: u64) -> bool {
        self.tracker.is_current(view, generation)
    }

    // ── Devices ──────────────────────────────────────────────────────

    pub async fn list_devices(&self) -> Result<Vec<Device>, CoreError> {
        self.client.list_devices().await.map_err(|source| {
            CoreError::Fetch {
                entity: EntityKind::Device,
                source,
            }
        })
    }

    pub async fn get_device(&self, id: &str) -> Result<Device, CoreError> {
        self.client.get_device(id).await.map_err(|source| {
            CoreError::Fetch {
                entity: EntityKind::Device,
                source,
            }
        })
    }

    /// Create or update, routed on id presence.
    pub async fn save_device(&self, device: &Device) -> Result<(), CoreError> {
        let result = match device.id.as_deref() {
            Some(id) if !id.is_empty() => self.client.update_device(id, device).await,
            _ => self.client.create_device(device).await,
        };
        result.map_err(|source| CoreError::Save {
            entity: EntityKind::Device,
            source,
        })?;
        info!(name = %device.name, "device saved");
        Ok(())
    }

    pub async fn delete_device(&self, id: &str) -> Result<(), CoreError> {
        self.client.delete_device(id).await.map_err(|source| {
            CoreError::Delete {
                entity: EntityKind::Device,
                source,
            }
        })
    }

    /// Narrow running/stopped toggle; no modal, no confirmation.
    pub async fn set_device_status(&self, id: &str, status: bool) -> Result<(), CoreError> {
        self.client
            .set_device_status(id, status)
            .await
            .map_err(|source| CoreError::StatusToggle { source })
    }

    // ── Points ───────────────────────────────────────────────────────

    pub async fn list_points(&self, query: &PointQuery) -> Result<PointPage, CoreError> {
        debug!(page = query.page, "loading point page");
        self.client.list_points(query).await.map_err(|source| {
            CoreError::Fetch {
                entity: EntityKind::Point,
                source,
            }
        })
    }

    pub async fn get_point(&self, id: &str) -> Result<Point, CoreError> {
        self.client.get_point(id).await.map_err(|source| {
            CoreError::Fetch {
                entity: EntityKind::Point,
                source,
            }
        })
    }

    pub async fn save_point(&self, point: &Point) -> Result<(), CoreError> {
        let result = match point.id.as_deref() {
            Some(id) if !id.is_empty() => self.client.update_point(id, point).await,
            _ => self.client.create_point(point).await,
        };
        result.map_err(|source| CoreError::Save {
            entity: EntityKind::Point,
            source,
        })?;
        info!(tag = %point.tag, "point saved");
        Ok(())
    }

    pub async fn delete_point(&self, id: &str) -> Result<(), CoreError> {
        self.client.delete_point(id).await.map_err(|source| {
            CoreError::Delete {
                entity: EntityKind::Point,
                source,
            }
        })
    }

    // ── Collection rules ─────────────────────────────────────────────

    pub async fn list_rules(
        &self,
        device_id: Option<&str>,
    ) -> Result<Vec<CollectionRule>, CoreError> {
        self.client.list_rules(device_id).await.map_err(|source| {
            CoreError::Fetch {
                entity: EntityKind::CollectionRule,
                source,
            }
        })
    }

    pub async fn get_rule(&self, id: &str) -> Result<CollectionRule, CoreError> {
        self.client.get_rule(id).await.map_err(|source| {
            CoreError::Fetch {
                entity: EntityKind::CollectionRule,
                source,
            }
        })
    }

    pub async fn save_rule(&self, rule: &CollectionRule) -> Result<(), CoreError> {
        let result = match rule.id.as_deref() {
            Some(id) if !id.is_empty() => self.client.update_rule(id, rule).await,
            _ => self.client.create_rule(rule).await,
        };
        result.map_err(|source| CoreError::Save {
            entity: EntityKind::CollectionRule,
            source,
        })
    }

    pub async fn delete_rule(&self, id: &str) -> Result<(), CoreError> {
        self.client.delete_rule(id).await.map_err(|source| {
            CoreError::Delete {
                entity: EntityKind::CollectionRule,
                source,
            }
        })
    }

    // ── Live monitoring ──────────────────────────────────────────────

    /// Snapshot plus derived header aggregates, in one call.
    pub async fn monitor_snapshot(&self) -> Result<(Vec<DeviceMonitor>, MonitorStats), CoreError> {
        let rows = self.client.monitor_snapshot().await.map_err(|source| {
            CoreError::Fetch {
                entity: EntityKind::Monitor,
                source,
            }
        })?;
        let stats = MonitorStats::from_rows(&rows);
        Ok((rows, stats))
    }

    pub async fn device_alarms(&self, device_id: i64) -> Result<Vec<AlarmDetail>, CoreError> {
        self.client.device_alarms(device_id).await.map_err(|source| {
            CoreError::Fetch {
                entity: EntityKind::Alarm,
                source,
            }
        })
    }

    // ── System actions ───────────────────────────────────────────────

    pub async fn system_pause(&self) -> Result<(), CoreError> {
        self.client.system_pause().await.map_err(|source| {
            CoreError::SystemAction {
                action: "Pause",
                source,
            }
        })
    }

    pub async fn system_flush(&self) -> Result<(), CoreError> {
        self.client.system_flush().await.map_err(|source| {
            CoreError::SystemAction {
                action: "Flush",
                source,
            }
        })
    }

    pub async fn data_clear(&self) -> Result<(), CoreError> {
        self.client.data_clear().await.map_err(|source| {
            CoreError::SystemAction {
                action: "Clear",
                source,
            }
        })
    }

    pub async fn import_config(&self, path: &std::path::Path) -> Result<(), CoreError> {
        self.client.import_config(path).await.map_err(|source| {
            CoreError::SystemAction {
                action: "Config import",
                source,
            }
        })
    }

    pub async fn download_template(&self, dest: &std::path::Path) -> Result<(), CoreError> {
        self.client.download_template(dest).await.map_err(|source| {
            CoreError::SystemAction {
                action: "Template download",
                source,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use sentra_api::{Device, DeviceMonitor, GatewayClient};

    use super::{Console, MonitorStats};
    use crate::error::{CoreError, EntityKind};

    fn monitor_row(id: i64, status: &str, alarms: u32) -> DeviceMonitor {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": format!("dev{id}"),
            "code": format!("D{id:02}"),
            "totalPoints": 10,
            "currentAlarmCount": alarms,
            "status": status,
            "lastCommunicationTime": "2024-06-15T10:30:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn monitor_stats_aggregates() {
        let rows = vec![
            monitor_row(1, "在线", 0),
            monitor_row(2, "在线", 2),
            monitor_row(3, "离线", 1),
        ];
        let stats = MonitorStats::from_rows(&rows);
        assert_eq!(
            stats,
            MonitorStats {
                total_devices: 3,
                online_devices: 2,
                alarm_devices: 2,
            }
        );
    }

    async fn console_for(server: &MockServer) -> Console {
        let url = url::Url::parse(&server.uri()).unwrap();
        Console::with_client(GatewayClient::with_client(reqwest::Client::new(), url))
    }

    fn device(id: Option<&str>) -> Device {
        Device {
            id: id.map(str::to_owned),
            status: true,
            name: "PLC-1".into(),
            code: "D01".into(),
            table: "t_d01".into(),
            interface_type: "RS485".into(),
            address: "/dev/ttyS0".into(),
            baud_rate: 9600,
            stop_bits: 1,
            data_bits: 8,
            parity: "N".into(),
            protocol_type: "Modbus".into(),
            device_address: "1".into(),
            write_timeout: 1000,
            read_timeout: 1000,
        }
    }

    #[tokio::test]
    async fn save_without_id_creates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/devices"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let console = console_for(&server).await;
        console.save_device(&device(None)).await.unwrap();
    }

    #[tokio::test]
    async fn save_with_id_updates() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/devices/dev-1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let console = console_for(&server).await;
        console.save_device(&device(Some("dev-1"))).await.unwrap();
    }

    #[tokio::test]
    async fn get_fetches_a_single_record() {
        let server = MockServer::start().await;
        let body = serde_json::json!({
            "id": "dev-7",
            "status": true,
            "name": "PLC-7",
            "code": "D07",
            "table": "t_d07",
            "interfaceType": "RS485",
            "address": "/dev/ttyS1",
            "baudRate": 19200,
            "stopBits": 1,
            "dataBits": 8,
            "parity": "E",
            "protocolType": "Modbus",
            "deviceAddress": "7",
            "writeTimeout": 1000,
            "readTimeout": 1000
        });
        Mock::given(method("GET"))
            .and(path("/api/devices/dev-7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let console = console_for(&server).await;
        let fetched = console.get_device("dev-7").await.unwrap();
        assert_eq!(fetched.name, "PLC-7");
        assert_eq!(fetched.baud_rate, 19200);
    }

    #[tokio::test]
    async fn fetch_failure_is_annotated_with_entity_kind() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/devices"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let console = console_for(&server).await;
        let err = console.list_devices().await.unwrap_err();
        match err {
            CoreError::Fetch { entity, .. } => assert_eq!(entity, EntityKind::Device),
            other => panic!("expected Fetch, got {other:?}"),
        }
    }
}
