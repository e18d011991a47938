//! Order value types shared by every layer of the book.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a resting order, unique across both sides while it rests.
pub type OrderId = u64;

/// Exact decimal price. Never a binary float.
pub type Price = Decimal;

/// Resting quantity of an order.
pub type Quantity = u64;

/// Side of the book an order rests on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Sell side, lowest price is best.
    Ask,
    /// Buy side, highest price is best.
    Bid,
}

impl Side {
    /// Both sides, asks first.
    pub const ALL: [Side; 2] = [Side::Ask, Side::Bid];

    /// Returns the other side of the book.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Side::Ask => Side::Bid,
            Side::Bid => Side::Ask,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Ask => write!(f, "ASK"),
            Side::Bid => write!(f, "BID"),
        }
    }
}

/// An immutable resting order.
///
/// A change of quantity or price is never applied in place: the book
/// replaces the whole value stored under the id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Order {
    id: OrderId,
    quantity: Quantity,
    price: Price,
}

impl Order {
    /// Creates a new order. The price is normalized so that `1.0` and `1.00`
    /// refer to the same price level.
    #[must_use]
    pub fn new(id: OrderId, quantity: Quantity, price: Price) -> Self {
        Self {
            id,
            quantity,
            price: price.normalize(),
        }
    }

    /// The order id.
    #[must_use]
    pub fn id(&self) -> OrderId {
        self.id
    }

    /// The resting quantity.
    #[must_use]
    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// The limit price.
    #[must_use]
    pub fn price(&self) -> Price {
        self.price
    }

    /// Returns a copy of this order carrying `quantity`.
    #[must_use]
    pub fn with_quantity(&self, quantity: Quantity) -> Self {
        Self { quantity, ..*self }
    }

    /// Returns a copy of this order resting at `price`.
    #[must_use]
    pub fn with_price(&self, price: Price) -> Self {
        Self::new(self.id, self.quantity, price)
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}@{}", self.id, self.quantity, self.price)
    }
}
