//! Typed views of the point record's enum-ish wire fields.

use strum::Display;

/// Ordered alarm severity attached to a point's value evaluation.
///
/// Ordering matters: `Serious > High > Middle > Low > None`. The derived
/// `Ord` follows variant declaration order, so `None` is declared first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, Default)]
pub enum AlarmLevel {
    #[default]
    #[strum(serialize = "none")]
    None,
    #[strum(serialize = "low")]
    Low,
    #[strum(serialize = "middle")]
    Middle,
    #[strum(serialize = "high")]
    High,
    #[strum(serialize = "serious")]
    Serious,
}

impl AlarmLevel {
    /// Parse the wire token; anything unrecognized means "not watched".
    pub fn from_wire(value: Option<&str>) -> Self {
        match value {
            Some("serious") => Self::Serious,
            Some("high") => Self::High,
            Some("middle") => Self::Middle,
            Some("low") => Self::Low,
            _ => Self::None,
        }
    }

    /// Display label for the point table.
    pub fn label(self) -> &'static str {
        match self {
            Self::Serious => "serious",
            Self::High => "high",
            Self::Middle => "middle",
            Self::Low => "low",
            Self::None => "not watched",
        }
    }
}

/// Acquisition priority: 3 = high, 2 = mid, 1 = low, anything else unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Priority {
    High,
    Mid,
    Low,
    #[default]
    Unknown,
}

impl Priority {
    pub fn from_wire(value: Option<i64>) -> Self {
        match value {
            Some(3) => Self::High,
            Some(2) => Self::Mid,
            Some(1) => Self::Low,
            _ => Self::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Mid => "mid",
            Self::Low => "low",
            Self::Unknown => "unknown",
        }
    }
}

/// Byte order used to decode a multi-byte register value.
///
/// The gateway only distinguishes `"LITTLE"`; every other token is big.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endianness {
    Little,
    #[default]
    Big,
}

impl Endianness {
    pub fn from_wire(value: Option<&str>) -> Self {
        match value {
            Some("LITTLE") => Self::Little,
            _ => Self::Big,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Little => "little-endian",
            Self::Big => "big-endian",
        }
    }
}

/// Whether a point's value occupies one bit, a bit range, or the whole
/// register. `start_bit`/`end_bit` are only meaningful for the bit modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BitCalculation {
    SingleBit,
    MultiBit,
    #[default]
    WholeValue,
}

impl BitCalculation {
    pub fn from_wire(value: Option<&str>) -> Self {
        match value {
            Some("single") => Self::SingleBit,
            Some("multiple") => Self::MultiBit,
            _ => Self::WholeValue,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::SingleBit => "single bit",
            Self::MultiBit => "bit range",
            Self::WholeValue => "whole value",
        }
    }

    /// Whether the bit-range columns apply in this mode.
    pub fn uses_bit_range(self) -> bool {
        !matches!(self, Self::WholeValue)
    }
}

/// How a decoded value is persisted: directly or through a transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageMethod {
    Direct,
    #[default]
    Transformed,
}

impl StorageMethod {
    pub fn from_wire(value: Option<&str>) -> Self {
        match value {
            Some("direct") => Self::Direct,
            _ => Self::Transformed,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Transformed => "transformed",
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn alarm_level_ordering_is_severity() {
        assert!(AlarmLevel::Serious > AlarmLevel::High);
        assert!(AlarmLevel::High > AlarmLevel::Middle);
        assert!(AlarmLevel::Middle > AlarmLevel::Low);
        assert!(AlarmLevel::Low > AlarmLevel::None);
    }

    #[test]
    fn alarm_level_parses_wire_tokens() {
        assert_eq!(AlarmLevel::from_wire(Some("serious")), AlarmLevel::Serious);
        assert_eq!(AlarmLevel::from_wire(Some("bogus")), AlarmLevel::None);
        assert_eq!(AlarmLevel::from_wire(None), AlarmLevel::None);
    }

    #[test]
    fn priority_maps_ints() {
        assert_eq!(Priority::from_wire(Some(3)), Priority::High);
        assert_eq!(Priority::from_wire(Some(2)), Priority::Mid);
        assert_eq!(Priority::from_wire(Some(1)), Priority::Low);
        assert_eq!(Priority::from_wire(Some(0)), Priority::Unknown);
        assert_eq!(Priority::from_wire(None), Priority::Unknown);
    }

    #[test]
    fn endianness_defaults_to_big() {
        assert_eq!(Endianness::from_wire(Some("LITTLE")), Endianness::Little);
        assert_eq!(Endianness::from_wire(Some("BIG")), Endianness::Big);
        assert_eq!(Endianness::from_wire(None), Endianness::Big);
    }

    #[test]
    fn bit_calculation_gates_bit_range() {
        assert!(BitCalculation::from_wire(Some("single")).uses_bit_range());
        assert!(BitCalculation::from_wire(Some("multiple")).uses_bit_range());
        assert!(!BitCalculation::from_wire(None).uses_bit_range());
    }
}
