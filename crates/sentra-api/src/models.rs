//! Wire models for the gateway's JSON surface.
//!
//! Field names mirror the gateway's camelCase JSON exactly. Records used
//! in both directions (list responses and create/update bodies) carry an
//! optional `id`: absent on create, present on update.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A serial/field device and its link-layer descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Running (`true`) or stopped. Toggled independently of full edits.
    #[serde(default)]
    pub status: bool,
    pub name: String,
    pub code: String,
    /// Storage table the device's values land in.
    pub table: String,
    pub interface_type: String,
    /// Link address (serial port path or host:port).
    pub address: String,
    pub baud_rate: u32,
    pub stop_bits: u32,
    pub data_bits: u32,
    /// `"E"` even, `"O"` odd, anything else none.
    pub parity: String,
    pub protocol_type: String,
    pub device_address: String,
    /// Milliseconds.
    pub write_timeout: u32,
    /// Milliseconds.
    pub read_timeout: u32,
}

/// A single addressable register/value within a device's address space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub function_code: String,
    pub address: String,
    pub data_type: String,
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lua_expression: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alarm_flag: Option<String>,
    /// Ordered severity: `serious` > `high` > `middle` > `low` > none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alarm_level: Option<String>,
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// 3 = high, 2 = mid, 1 = low, anything else unknown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    /// `"LITTLE"` or big-endian otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endianness: Option<String>,
    /// `"single"`, `"multiple"`, or whole-value otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bit_calculation: Option<String>,
    /// Only meaningful when `bit_calculation` is not whole-value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_bit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_bit: Option<u32>,
    /// `"direct"` or transformed otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<i64>,
    /// Foreign reference to the owning device.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
}

fn default_multiplier() -> f64 {
    1.0
}

/// Paged point list response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointPage {
    pub total_count: u64,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub points: Vec<Point>,
}

/// Query parameters for the point list.
#[derive(Debug, Clone, Default)]
pub struct PointQuery {
    pub page: u32,
    pub page_size: u32,
    pub device_id: Option<String>,
    /// Free-text device mark filter.
    pub device_mark: Option<String>,
}

/// A batched read spanning a contiguous point range on one device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub description: String,
    /// Protocol function selector for the batch read.
    pub rule_func_code: u8,
    pub start_point: String,
    pub end_point: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
}

/// One row of the live monitoring snapshot.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceMonitor {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub total_points: u32,
    pub current_alarm_count: u32,
    /// Localized status string from the gateway; "在线" means online.
    pub status: String,
    pub last_communication_time: DateTime<Utc>,
}

impl DeviceMonitor {
    /// Whether the gateway reports this device as online.
    pub fn is_online(&self) -> bool {
        self.status == "在线" || self.status.eq_ignore_ascii_case("online")
    }
}

/// One alarm row from the per-device drill-down.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmDetail {
    pub point: String,
    pub description: String,
    pub current_value: String,
    pub level: String,
    pub condition: String,
}
