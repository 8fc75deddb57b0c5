//! Underlying asset

use serde::{Deserialize, Serialize};

/// A stock identified by its ticker. The spot price stays `None` until market
/// data arrives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    pub symbol: String,
    pub price: Option<f64>,
}

impl Stock {
    /// Stock without a price yet
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            price: None,
        }
    }

    pub fn with_price(symbol: impl Into<String>, price: f64) -> Self {
        Self {
            symbol: symbol.into(),
            price: Some(price),
        }
    }

    pub fn has_price(&self) -> bool {
        self.price.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_starts_unset() {
        let stock = Stock::new("fb");
        assert_eq!(stock.symbol, "fb");
        assert!(!stock.has_price());

        let priced = Stock::with_price("fb", 100.0);
        assert_eq!(priced.price, Some(100.0));
    }
}
