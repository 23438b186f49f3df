//! Typed views of device wire fields.

/// Serial parity: `"E"` even, `"O"` odd, anything else none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Parity {
    Even,
    Odd,
    #[default]
    None,
}

impl Parity {
    pub fn from_wire(value: &str) -> Self {
        match value {
            "E" => Self::Even,
            "O" => Self::Odd,
            _ => Self::None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Even => "even",
            Self::Odd => "odd",
            Self::None => "none",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Parity;

    #[test]
    fn parity_tokens() {
        assert_eq!(Parity::from_wire("E"), Parity::Even);
        assert_eq!(Parity::from_wire("O"), Parity::Odd);
        assert_eq!(Parity::from_wire("N"), Parity::None);
        assert_eq!(Parity::from_wire(""), Parity::None);
    }
}
