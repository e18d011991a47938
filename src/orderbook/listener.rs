//! Consumer-facing contracts of a Level-2 view.

use super::error::OrderBookError;
use super::order::{OrderId, Price, Quantity, Side};

/// Mutating interface driven by a feed handler once exchange messages are
/// decoded into order events.
pub trait Level2EventListener {
    /// A new resting order.
    fn on_new_order(
        &mut self,
        side: Side,
        price: Price,
        quantity: Quantity,
        order_id: OrderId,
    ) -> Result<(), OrderBookError>;

    /// A resting order was cancelled. Fails if the id is unknown.
    fn on_cancel_order(&mut self, order_id: OrderId) -> Result<(), OrderBookError>;

    /// A resting order changed its terms. Fails if the id is unknown.
    fn on_replace_order(
        &mut self,
        price: Price,
        quantity: Quantity,
        order_id: OrderId,
    ) -> Result<(), OrderBookError>;

    /// An aggressor crossed the spread and traded against a resting order.
    /// The aggressor itself never reaches [`Self::on_new_order`].
    fn on_trade(
        &mut self,
        quantity: Quantity,
        resting_order_id: OrderId,
    ) -> Result<(), OrderBookError>;
}

/// Read-only queries used by strategy and risk consumers.
pub trait Level2Metrics {
    /// Total quantity resting at `price` on `side`, zero if there is no level.
    fn size_for_price_level(&self, side: Side, price: Price) -> Quantity;

    /// Number of distinct price levels on `side`.
    fn book_depth(&self, side: Side) -> usize;

    /// Highest bid or lowest ask. Fails when `side` is empty.
    fn top_of_book(&self, side: Side) -> Result<Price, OrderBookError>;
}
