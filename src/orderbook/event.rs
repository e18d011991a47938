//! Decoded order events, as handed over by a feed handler.

use super::order::{OrderId, Price, Quantity, Side};
use serde::{Deserialize, Serialize};

/// One order-level event for a single instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BookEvent {
    /// A new resting order.
    NewOrder {
        /// Side the order rests on.
        side: Side,
        /// Limit price.
        price: Price,
        /// Resting quantity.
        quantity: Quantity,
        /// Order id.
        order_id: OrderId,
    },
    /// Cancellation of a resting order.
    CancelOrder {
        /// Order id.
        order_id: OrderId,
    },
    /// New terms for a resting order.
    ReplaceOrder {
        /// New limit price.
        price: Price,
        /// New quantity.
        quantity: Quantity,
        /// Order id.
        order_id: OrderId,
    },
    /// A trade against a resting order.
    Trade {
        /// Traded quantity.
        quantity: Quantity,
        /// The resting order that was hit.
        resting_order_id: OrderId,
    },
}

impl BookEvent {
    /// The order id the event refers to.
    #[must_use]
    pub fn order_id(&self) -> OrderId {
        match self {
            BookEvent::NewOrder { order_id, .. }
            | BookEvent::CancelOrder { order_id }
            | BookEvent::ReplaceOrder { order_id, .. } => *order_id,
            BookEvent::Trade {
                resting_order_id, ..
            } => *resting_order_id,
        }
    }
}
