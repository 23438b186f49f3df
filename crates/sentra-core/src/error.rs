// ── Core error types ──
//
// User-facing errors from sentra-core. Every failure is annotated with the
// entity kind the operation was touching so the notification layer can say
// which table an error belongs to without inspecting the transport error.

use std::fmt;

use thiserror::Error;

/// The entity kind an operation was acting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Device,
    Point,
    CollectionRule,
    Monitor,
    Alarm,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Device => "device",
            Self::Point => "point",
            Self::CollectionRule => "collection rule",
            Self::Monitor => "monitor snapshot",
            Self::Alarm => "alarm detail",
        };
        f.write_str(label)
    }
}

/// Unified error type for the core crate.
///
/// The Display text doubles as the notification message: human-readable
/// lead, raw error appended.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A list/get fetch failed; previously rendered rows must stay visible.
    #[error("Failed to load {entity} data: {source}")]
    Fetch {
        entity: EntityKind,
        #[source]
        source: sentra_api::Error,
    },

    /// A create/update failed; the form stays open for a retry.
    #[error("Failed to save {entity}: {source}")]
    Save {
        entity: EntityKind,
        #[source]
        source: sentra_api::Error,
    },

    /// A delete failed; the view is left untouched.
    #[error("Failed to delete {entity}: {source}")]
    Delete {
        entity: EntityKind,
        #[source]
        source: sentra_api::Error,
    },

    /// A device status toggle failed.
    #[error("Failed to switch device state: {source}")]
    StatusToggle {
        #[source]
        source: sentra_api::Error,
    },

    /// A system action (pause/flush/clear/import/template) failed.
    #[error("{action} failed: {source}")]
    SystemAction {
        action: &'static str,
        #[source]
        source: sentra_api::Error,
    },
}

impl CoreError {
    /// The HTTP status behind this failure, when there is one.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Fetch { source, .. }
            | Self::Save { source, .. }
            | Self::Delete { source, .. }
            | Self::StatusToggle { source }
            | Self::SystemAction { source, .. } => source.http_status(),
        }
    }
}
