//! A single price level: every resting order at one price, in arrival order.

use super::order::{Order, OrderId, Price, Quantity};
use indexmap::IndexMap;

/// All resting orders sharing one price.
///
/// Orders are kept in an insertion-ordered map so that the oldest order is
/// always at the front and removal by id stays O(1) amortized.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    price: Price,
    orders: IndexMap<OrderId, Order>,
    total_quantity: Quantity,
}

impl PriceLevel {
    /// Creates an empty level at `price`.
    #[must_use]
    pub fn new(price: Price) -> Self {
        Self {
            price,
            orders: IndexMap::new(),
            total_quantity: 0,
        }
    }

    /// The level's price.
    #[must_use]
    pub fn price(&self) -> Price {
        self.price
    }

    /// Appends `order` at the tail of the arrival sequence.
    ///
    /// The aggregate saturates at `Quantity::MAX`; `Level2View` rejects any
    /// order that would reach that point before it gets here.
    pub fn push(&mut self, order: Order) {
        debug_assert_eq!(order.price(), self.price);
        if let Some(previous) = self.orders.insert(order.id(), order) {
            // Same id re-inserted: keep the aggregate exact.
            self.total_quantity = self.total_quantity.saturating_sub(previous.quantity());
        }
        self.total_quantity = self.total_quantity.saturating_add(order.quantity());
    }

    /// Removes the order with `id`, keeping the relative order of the rest.
    pub fn remove(&mut self, id: OrderId) -> Option<Order> {
        let order = self.orders.shift_remove(&id)?;
        self.total_quantity = self.total_quantity.saturating_sub(order.quantity());
        Some(order)
    }

    /// The oldest order at this level.
    #[must_use]
    pub fn front(&self) -> Option<&Order> {
        self.orders.first().map(|(_, order)| order)
    }

    /// Looks up an order by id.
    #[must_use]
    pub fn get(&self, id: OrderId) -> Option<&Order> {
        self.orders.get(&id)
    }

    /// Number of orders resting here.
    #[must_use]
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// Sum of resting quantities.
    #[must_use]
    pub fn total_quantity(&self) -> Quantity {
        self.total_quantity
    }

    /// True when no order rests at this price.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Orders from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.values()
    }
}
