//! The per-side order store contract.

use super::order::{Order, OrderId, Price, Quantity, Side};

/// One side of a book: resting orders indexed by id and grouped by price.
///
/// [`SideBook`](super::SideBook) is the production implementation. The
/// [`Level2View`](super::Level2View) only talks to its sides through this
/// trait.
pub trait OrderStore {
    /// The side this store holds.
    fn side(&self) -> Side;

    /// Appends `order` to the level at its price, creating the level if needed.
    fn add_order(&mut self, order: Order);

    /// Removes the order with `order_id`. Unknown ids are ignored.
    fn remove_order(&mut self, order_id: OrderId) -> Option<Order>;

    /// Removes the order with `order.id()` and adds `order` in its place, at
    /// the tail of its price level. Unknown ids are ignored.
    fn replace_order(&mut self, order: Order) -> Option<Order>;

    /// The oldest order at the best price.
    fn top_order(&self) -> Option<&Order>;

    /// Number of orders resting at `price`.
    fn order_count(&self, price: Price) -> usize;

    /// Aggregate quantity resting at `price`.
    fn quantity_at(&self, price: Price) -> Quantity;

    /// Number of distinct price levels.
    fn book_depth(&self) -> usize;

    /// True if `order_id` is resting here.
    fn contains_order(&self, order_id: OrderId) -> bool;

    /// The resting order with `order_id`.
    fn order(&self, order_id: OrderId) -> Option<&Order>;

    /// Drops every order.
    fn clear(&mut self);
}
