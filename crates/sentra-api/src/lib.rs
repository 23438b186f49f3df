//! Async client for the Sentra field-device gateway's REST API.
//!
//! The gateway exposes a small JSON surface for device, point, and
//! collection-rule configuration plus a live monitoring snapshot.
//! [`GatewayClient`] owns URL construction and uniform response handling;
//! the endpoint groups (devices, points, rules, monitor, system) are
//! implemented as inherent methods in separate modules.
//!
//! Any non-2xx response is reported as [`Error::Status`] with the status
//! code retained — the gateway does not use structured error bodies.

mod client;
mod devices;
mod error;
mod models;
mod monitor;
mod points;
mod rules;
mod system;
mod transport;

pub use client::GatewayClient;
pub use error::Error;
pub use models::{
    AlarmDetail, CollectionRule, Device, DeviceMonitor, Point, PointPage, PointQuery,
};
pub use transport::TransportConfig;
