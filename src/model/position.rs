use std::fmt;

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionSide {
    Long,
    Short,
}

impl fmt::Display for PositionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionSide::Long => write!(f, "long"),
            PositionSide::Short => write!(f, "short"),
        }
    }
}

/// One open position as listed by the service. The full set is replaced
/// wholesale on every successful position fetch; the server's listing is
/// authoritative for existence.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub product_id: u64,
    pub product_name: String,
    pub side: PositionSide,
    pub amount: f64,
    pub entry_price: f64,
}

impl Position {
    /// Base instrument name used for quote lookup. Position listings carry
    /// the perp market name ("BTC-PERP"), quotes are keyed by base symbol.
    pub fn base_symbol(&self) -> &str {
        self.product_name
            .strip_suffix("-PERP")
            .unwrap_or(&self.product_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_symbol_strips_perp_suffix() {
        let pos = Position {
            product_id: 1,
            product_name: "BTC-PERP".to_string(),
            side: PositionSide::Long,
            amount: 0.5,
            entry_price: 60000.0,
        };
        assert_eq!(pos.base_symbol(), "BTC");
    }

    #[test]
    fn base_symbol_passes_through_plain_names() {
        let pos = Position {
            product_id: 2,
            product_name: "SOL".to_string(),
            side: PositionSide::Short,
            amount: 10.0,
            entry_price: 150.0,
        };
        assert_eq!(pos.base_symbol(), "SOL");
    }
}
