//! Typed views of monitor drill-down fields.

/// Severity class of one alarm row, mapped from the gateway's display
/// value: "高" high, "中" medium, everything else low.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmSeverity {
    High,
    Medium,
    Low,
}

impl AlarmSeverity {
    pub fn from_wire(level: &str) -> Self {
        match level {
            "高" | "high" => Self::High,
            "中" | "medium" | "middle" => Self::Medium,
            _ => Self::Low,
        }
    }
}
