//! Domain enums and label maps over the gateway's wire records.
//!
//! The gateway keeps enum-ish fields as loosely-typed strings and ints on
//! the wire. The view is always replaced wholesale from the authoritative
//! response, so rather than duplicating every record struct, the typed
//! enums here parse wire tokens at render time and own the display labels.

mod device;
mod monitor;
mod point;

pub use device::Parity;
pub use monitor::AlarmSeverity;
pub use point::{AlarmLevel, BitCalculation, Endianness, Priority, StorageMethod};
