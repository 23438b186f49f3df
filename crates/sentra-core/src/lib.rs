//! Business logic and shared services for the sentra console.
//!
//! This crate sits between the raw gateway client (`sentra-api`) and the
//! terminal front end. It owns:
//!
//! - the domain enums and label maps used to render gateway records
//!   ([`model`]),
//! - the pure pagination engine ([`pagination`]),
//! - the single-owner view state struct with named mutation methods
//!   ([`view`]),
//! - per-view request generations for discarding stale responses
//!   ([`generation`]),
//! - and the [`Console`] orchestrator that wraps every backend exchange
//!   with entity-kind-annotated error reporting.

pub mod console;
pub mod error;
pub mod generation;
pub mod model;
pub mod pagination;
pub mod view;

pub use console::{Console, MonitorStats};
pub use error::{CoreError, EntityKind};
pub use generation::{RequestTracker, View};
pub use model::{AlarmLevel, AlarmSeverity, BitCalculation, Endianness, Parity, Priority, StorageMethod};
pub use pagination::{PageIntent, PageWindow};
pub use view::{Tab, ViewState};

pub use sentra_api::{
    AlarmDetail, CollectionRule, Device, DeviceMonitor, GatewayClient, Point, PointPage,
    PointQuery, TransportConfig,
};
