//! Error types for order book operations.

use super::order::{OrderId, Price, Quantity, Side};
use std::fmt;

/// Errors surfaced by the book. Every variant is detected before any state is
/// mutated, so a failed call leaves the book exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderBookError {
    /// A cancel or replace referenced an id that is not resting on either side.
    OrderNotFound {
        /// The unknown order id.
        order_id: OrderId,
    },

    /// A trade asked for more than the resting order holds.
    InvalidTrade {
        /// The resting order the trade was applied to.
        order_id: OrderId,
        /// Quantity reported by the trade.
        traded: Quantity,
        /// Quantity resting before the trade.
        resting: Quantity,
    },

    /// Top of book was requested on a side with no resting orders.
    EmptyBook {
        /// The empty side.
        side: Side,
    },

    /// A new order reused an id that is still resting.
    DuplicateOrderId {
        /// The id already in the book.
        order_id: OrderId,
    },

    /// A new order, replace or trade carried a zero quantity.
    InvalidQuantity {
        /// The order the quantity referred to.
        order_id: OrderId,
        /// The rejected quantity.
        quantity: Quantity,
    },

    /// Resting the order would push its level's aggregate quantity past
    /// `Quantity::MAX`.
    QuantityOverflow {
        /// The order that was rejected.
        order_id: OrderId,
        /// The level the order would have joined.
        price: Price,
        /// Quantity already resting at `price`, excluding the order itself.
        resting: Quantity,
        /// The rejected order quantity.
        quantity: Quantity,
    },

    /// Failed to serialize a snapshot.
    SerializationError {
        /// Underlying serializer message.
        message: String,
    },

    /// Failed to deserialize a snapshot or configuration.
    DeserializationError {
        /// Underlying deserializer message.
        message: String,
    },

    /// A snapshot package did not match its checksum.
    ChecksumMismatch {
        /// Checksum stored in the package.
        expected: String,
        /// Checksum computed from the payload.
        actual: String,
    },

    /// Any other rejected operation.
    InvalidOperation {
        /// Description of the problem.
        message: String,
    },
}

impl fmt::Display for OrderBookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderBookError::OrderNotFound { order_id } => {
                write!(f, "order not found: {order_id}")
            }
            OrderBookError::InvalidTrade {
                order_id,
                traded,
                resting,
            } => {
                write!(
                    f,
                    "could not trade {traded} against resting order {order_id} with {resting}"
                )
            }
            OrderBookError::EmptyBook { side } => {
                write!(f, "no orders are available on the {side} side")
            }
            OrderBookError::DuplicateOrderId { order_id } => {
                write!(f, "order id {order_id} is already resting")
            }
            OrderBookError::InvalidQuantity { order_id, quantity } => {
                write!(f, "invalid quantity {quantity} for order {order_id}")
            }
            OrderBookError::QuantityOverflow {
                order_id,
                price,
                resting,
                quantity,
            } => {
                write!(
                    f,
                    "order {order_id} of {quantity} overflows level {price} holding {resting}"
                )
            }
            OrderBookError::SerializationError { message } => {
                write!(f, "serialization error: {message}")
            }
            OrderBookError::DeserializationError { message } => {
                write!(f, "deserialization error: {message}")
            }
            OrderBookError::ChecksumMismatch { expected, actual } => {
                write!(f, "checksum mismatch: expected {expected}, got {actual}")
            }
            OrderBookError::InvalidOperation { message } => {
                write!(f, "invalid operation: {message}")
            }
        }
    }
}

impl std::error::Error for OrderBookError {}
