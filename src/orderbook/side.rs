//! One side of the book: order table, price-level table and price index.

use super::error::OrderBookError;
use super::index::PriceIndex;
use super::level::PriceLevel;
use super::order::{Order, OrderId, Price, Quantity, Side};
use super::store::OrderStore;
use ahash::AHashMap;
use tracing::{trace, warn};

/// Complete state of one side of the book.
///
/// Three structures are kept in step on every call:
/// - `orders`: order id to resting order,
/// - `levels`: price to the [`PriceLevel`] holding that price's orders,
/// - `index`: the [`PriceIndex`] over the keys of `levels`.
///
/// A level exists exactly while it holds at least one order, and the index
/// always contains exactly the prices of the existing levels.
#[derive(Debug, Clone)]
pub struct SideBook {
    side: Side,
    orders: AHashMap<OrderId, Order>,
    levels: AHashMap<Price, PriceLevel>,
    index: PriceIndex,
    best_price: Option<Price>,
}

impl SideBook {
    /// Creates an empty side.
    #[must_use]
    pub fn new(side: Side) -> Self {
        Self::with_capacity(side, 0, 0)
    }

    /// Creates an empty side pre-sized for `orders` orders over `levels`
    /// distinct prices.
    #[must_use]
    pub fn with_capacity(side: Side, orders: usize, levels: usize) -> Self {
        Self {
            side,
            orders: AHashMap::with_capacity(orders),
            levels: AHashMap::with_capacity(levels),
            index: PriceIndex::with_capacity(side, levels),
            best_price: None,
        }
    }

    /// The best price on this side, if any order rests.
    ///
    /// # Performance
    /// O(1)
    #[must_use]
    pub fn best_price(&self) -> Option<Price> {
        self.best_price
    }

    /// The level at `price`, if any order rests there.
    #[must_use]
    pub fn level(&self, price: Price) -> Option<&PriceLevel> {
        self.levels.get(&price.normalize())
    }

    /// Levels from best to worst price.
    pub fn levels(&self) -> impl Iterator<Item = &PriceLevel> {
        self.index
            .iter()
            .filter_map(move |price| self.levels.get(&price))
    }

    /// The price index of this side.
    #[must_use]
    pub fn index(&self) -> &PriceIndex {
        &self.index
    }

    /// Number of resting orders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// True when no order rests on this side.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Checks that the order table, level table, index and cached best price
    /// agree with each other.
    pub fn validate(&self) -> Result<(), OrderBookError> {
        let fail = |message: String| Err(OrderBookError::InvalidOperation { message });

        self.index.validate()?;

        if self.levels.len() != self.index.len() {
            return fail(format!(
                "{} side has {} levels but {} indexed prices",
                self.side,
                self.levels.len(),
                self.index.len()
            ));
        }

        let mut resting = 0;
        for (price, level) in &self.levels {
            if level.is_empty() {
                return fail(format!("{} side keeps empty level {}", self.side, price));
            }
            if !self.index.contains(*price) {
                return fail(format!("{} side level {} is not indexed", self.side, price));
            }
            for order in level.iter() {
                if self.orders.get(&order.id()) != Some(order) {
                    return fail(format!(
                        "{} side level {} holds unknown order {}",
                        self.side,
                        price,
                        order.id()
                    ));
                }
            }
            resting += level.order_count();
        }

        if resting != self.orders.len() {
            return fail(format!(
                "{} side has {} orders in levels but {} by id",
                self.side,
                resting,
                self.orders.len()
            ));
        }

        if self.best_price != self.index.best() {
            return fail(format!(
                "{} side caches best {:?}, index says {:?}",
                self.side,
                self.best_price,
                self.index.best()
            ));
        }
        Ok(())
    }
}

impl OrderStore for SideBook {
    fn side(&self) -> Side {
        self.side
    }

    /// Adds an order in O(1) amortized.
    ///
    /// Only the first order at a new price pays the O(log L) index insertion.
    fn add_order(&mut self, order: Order) {
        if self.orders.contains_key(&order.id()) {
            warn!(
                "{} side: order {} already resting, replacing it",
                self.side,
                order.id()
            );
            self.remove_order(order.id());
        }

        let price = order.price();
        let level = self.levels.entry(price).or_insert_with(|| {
            trace!("{} side: new price level {}", self.side, price);
            PriceLevel::new(price)
        });
        level.push(order);

        if level.order_count() == 1 {
            self.index.insert(price);
            self.best_price = self.index.best();
        }

        self.orders.insert(order.id(), order);
        trace!("{} side: added order {}", self.side, order);
    }

    /// Removes an order in O(1) amortized, O(log L) when its level empties.
    fn remove_order(&mut self, order_id: OrderId) -> Option<Order> {
        let order = self.orders.remove(&order_id)?;
        let price = order.price();

        let emptied = match self.levels.get_mut(&price) {
            Some(level) => {
                level.remove(order_id);
                level.is_empty()
            }
            None => false,
        };

        if emptied {
            self.levels.remove(&price);
            self.index.remove(price);
            self.best_price = self.index.best();
            trace!("{} side: price level {} removed", self.side, price);
        }

        trace!("{} side: removed order {}", self.side, order);
        Some(order)
    }

    fn replace_order(&mut self, order: Order) -> Option<Order> {
        if !self.orders.contains_key(&order.id()) {
            return None;
        }
        let previous = self.remove_order(order.id());
        self.add_order(order);
        previous
    }

    fn top_order(&self) -> Option<&Order> {
        self.best_price
            .and_then(|price| self.levels.get(&price))
            .and_then(PriceLevel::front)
    }

    fn order_count(&self, price: Price) -> usize {
        self.level(price).map_or(0, PriceLevel::order_count)
    }

    fn quantity_at(&self, price: Price) -> Quantity {
        self.level(price).map_or(0, PriceLevel::total_quantity)
    }

    fn book_depth(&self) -> usize {
        self.levels.len()
    }

    fn contains_order(&self, order_id: OrderId) -> bool {
        self.orders.contains_key(&order_id)
    }

    fn order(&self, order_id: OrderId) -> Option<&Order> {
        self.orders.get(&order_id)
    }

    fn clear(&mut self) {
        self.orders.clear();
        self.levels.clear();
        self.index.clear();
        self.best_price = None;
        trace!("{} side: cleared", self.side);
    }
}
