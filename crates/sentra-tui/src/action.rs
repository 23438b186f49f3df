//! All possible UI actions. Actions are the sole mechanism for state mutation.

use std::fmt;
use std::path::PathBuf;

use sentra_core::{
    AlarmDetail, CollectionRule, Device, DeviceMonitor, MonitorStats, PageIntent, PointPage,
    Tab,
};

use crate::modal::ModalMode;

/// Notification severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// A toast notification, auto-dismissed after a few seconds.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }
}

/// Pending confirmation action. Destructive commands never execute
/// without passing through one of these.
#[derive(Debug, Clone)]
pub enum ConfirmAction {
    DeleteDevice { id: String, name: String },
    DeletePoint { id: String, tag: String },
    DeleteRule { id: String, description: String },
    ClearData,
}

impl fmt::Display for ConfirmAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeleteDevice { name, .. } => {
                write!(f, "Delete device {name}? Its points are kept.")
            }
            Self::DeletePoint { tag, .. } => write!(f, "Delete point {tag}?"),
            Self::DeleteRule { description, .. } => {
                write!(f, "Delete collection rule {description}?")
            }
            Self::ClearData => write!(f, "Clear all collected data? This cannot be undone."),
        }
    }
}

/// Every state transition in the console is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ────────────────────────────────────────────────
    SwitchTab(Tab),

    // ── Loads (user intent) ───────────────────────────────────────
    ReloadDevices,
    ReloadPoints,
    ReloadRules,
    ReloadMonitor,
    LoadAlarms(i64),
    PointPageIntent(PageIntent),
    SetDeviceMark(String),
    SelectDevice(Option<String>),

    // ── Edit intents (fetch by id, then open the form) ────────────
    EditDevice(String),
    EditPoint(String),
    EditRule(String),

    // ── Load results (only delivered when still current) ──────────
    DevicesLoaded(Vec<Device>),
    PointsLoaded(PointPage),
    RulesLoaded(Vec<CollectionRule>),
    MonitorLoaded {
        rows: Vec<DeviceMonitor>,
        stats: MonitorStats,
    },
    AlarmsLoaded {
        device_id: i64,
        result: Result<Vec<AlarmDetail>, String>,
    },

    // ── Modals ────────────────────────────────────────────────────
    OpenDeviceForm(ModalMode, Option<Box<Device>>),
    OpenPointForm(ModalMode, Option<Box<sentra_core::Point>>),
    OpenRuleList,
    OpenRuleForm(ModalMode, Option<Box<CollectionRule>>),
    CloseModal,

    // ── Writes ────────────────────────────────────────────────────
    SaveDevice(Box<Device>),
    SavePoint(Box<sentra_core::Point>),
    SaveRule(Box<CollectionRule>),
    ToggleDeviceStatus {
        id: String,
        name: String,
        start: bool,
    },

    // ── Destructive commands (routed through confirmation) ────────
    RequestDeleteDevice { id: String, name: String },
    RequestDeletePoint { id: String, tag: String },
    RequestDeleteRule { id: String, description: String },
    RequestClearData,

    // ── System commands ───────────────────────────────────────────
    PauseCollection,
    FlushQueue,
    ImportConfig(PathBuf),
    DownloadTemplate(PathBuf),

    // ── Confirm dialog ────────────────────────────────────────────
    ShowConfirm(ConfirmAction),
    ConfirmYes,
    ConfirmNo,

    // ── Notifications ─────────────────────────────────────────────
    Notify(Notification),
    DismissNotification,
}
