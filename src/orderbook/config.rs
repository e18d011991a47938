//! Construction settings for a [`Level2View`](super::Level2View).

use super::error::OrderBookError;
use serde::{Deserialize, Serialize};

/// Default number of orders each side is pre-sized for.
pub const DEFAULT_ORDER_CAPACITY: usize = 1024;

/// Default number of price levels each side is pre-sized for.
pub const DEFAULT_LEVEL_CAPACITY: usize = 128;

/// Settings for one instrument's book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookConfig {
    /// Instrument identifier.
    pub symbol: String,
    /// Orders each side is pre-sized for.
    pub order_capacity: usize,
    /// Price levels each side is pre-sized for.
    pub level_capacity: usize,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            symbol: String::new(),
            order_capacity: DEFAULT_ORDER_CAPACITY,
            level_capacity: DEFAULT_LEVEL_CAPACITY,
        }
    }
}

impl BookConfig {
    /// Default settings for `symbol`.
    pub fn new(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            ..Self::default()
        }
    }

    /// Sets the per-side order capacity.
    #[must_use]
    pub fn with_order_capacity(mut self, order_capacity: usize) -> Self {
        self.order_capacity = order_capacity;
        self
    }

    /// Sets the per-side price level capacity.
    #[must_use]
    pub fn with_level_capacity(mut self, level_capacity: usize) -> Self {
        self.level_capacity = level_capacity;
        self
    }

    /// Reads settings from JSON. Missing fields take their defaults.
    pub fn from_json(data: &str) -> Result<Self, OrderBookError> {
        serde_json::from_str(data).map_err(|error| OrderBookError::DeserializationError {
            message: error.to_string(),
        })
    }
}
