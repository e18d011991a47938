//! Level-2 view over both sides of one instrument's book

use super::config::BookConfig;
use super::error::OrderBookError;
use super::event::BookEvent;
use super::listener::{Level2EventListener, Level2Metrics};
use super::order::{Order, OrderId, Price, Quantity, Side};
use super::side::SideBook;
use super::snapshot::{Level2Snapshot, Level2SnapshotPackage, LevelSnapshot};
use super::store::OrderStore;
use crate::utils::current_time_millis;
use rust_decimal::Decimal;
use tracing::{error, trace, warn};

/// The Level2View owns one order store per side and routes order events to
/// the right one.
///
/// New orders name their side. Cancels, replaces and trades only carry an
/// order id, so the owning side is found by probing both stores. Every event
/// is validated before anything is mutated: a call that returns an error
/// leaves the book untouched.
#[derive(Debug, Clone)]
pub struct Level2View<S = SideBook>
where
    S: OrderStore,
{
    /// The symbol or identifier for this book
    symbol: String,

    /// Sell side, lowest price first
    asks: S,

    /// Buy side, highest price first
    bids: S,
}

impl Level2View<SideBook> {
    /// Create an empty view for the given symbol
    pub fn new(symbol: &str) -> Self {
        Self::with_config(&BookConfig::new(symbol))
    }

    /// Create an empty view with pre-sized sides
    pub fn with_config(config: &BookConfig) -> Self {
        trace!(
            "Level2 view {}: created with capacity for {} orders over {} levels per side",
            config.symbol, config.order_capacity, config.level_capacity
        );
        Self {
            symbol: config.symbol.clone(),
            asks: SideBook::with_capacity(Side::Ask, config.order_capacity, config.level_capacity),
            bids: SideBook::with_capacity(Side::Bid, config.order_capacity, config.level_capacity),
        }
    }

    /// Create a snapshot of the aggregated levels, at most `depth` per side
    pub fn snapshot(&self, depth: usize) -> Level2Snapshot {
        Level2Snapshot {
            symbol: self.symbol.clone(),
            timestamp: current_time_millis(),
            bids: self.bids.levels().take(depth).map(LevelSnapshot::from).collect(),
            asks: self.asks.levels().take(depth).map(LevelSnapshot::from).collect(),
        }
    }

    /// Create a checksum-protected snapshot package
    pub fn snapshot_package(&self, depth: usize) -> Result<Level2SnapshotPackage, OrderBookError> {
        Level2SnapshotPackage::new(self.snapshot(depth))
    }

    /// Serialize a checksum-protected snapshot package to JSON
    pub fn snapshot_to_json(&self, depth: usize) -> Result<String, OrderBookError> {
        self.snapshot_package(depth)?.to_json()
    }

    /// Check the internal consistency of both sides
    pub fn validate(&self) -> Result<(), OrderBookError> {
        self.asks.validate()?;
        self.bids.validate()?;
        if let Some(id) = self
            .asks
            .levels()
            .flat_map(|level| level.iter())
            .map(Order::id)
            .find(|id| self.bids.contains_order(*id))
        {
            return Err(OrderBookError::InvalidOperation {
                message: format!("order {id} rests on both sides"),
            });
        }
        Ok(())
    }
}

impl<S> Level2View<S>
where
    S: OrderStore,
{
    /// Build a view from two existing stores.
    ///
    /// # Errors
    /// `InvalidOperation` if the stores are not for the ask and bid side
    /// respectively.
    pub fn from_books(symbol: &str, asks: S, bids: S) -> Result<Self, OrderBookError> {
        if asks.side() != Side::Ask || bids.side() != Side::Bid {
            return Err(OrderBookError::InvalidOperation {
                message: format!(
                    "expected ASK and BID stores, got {} and {}",
                    asks.side(),
                    bids.side()
                ),
            });
        }
        Ok(Self {
            symbol: symbol.to_string(),
            asks,
            bids,
        })
    }

    /// Get the symbol of this book
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// The store holding `side`
    pub fn book(&self, side: Side) -> &S {
        match side {
            Side::Ask => &self.asks,
            Side::Bid => &self.bids,
        }
    }

    fn book_mut(&mut self, side: Side) -> &mut S {
        match side {
            Side::Ask => &mut self.asks,
            Side::Bid => &mut self.bids,
        }
    }

    /// The side `order_id` rests on, found by probing both stores
    ///
    /// # Performance
    /// O(1), at most two lookups.
    pub fn side_of(&self, order_id: OrderId) -> Option<Side> {
        Side::ALL
            .into_iter()
            .find(|side| self.book(*side).contains_order(order_id))
    }

    /// Get a resting order by its ID
    pub fn order(&self, order_id: OrderId) -> Option<&Order> {
        self.side_of(order_id)
            .and_then(|side| self.book(side).order(order_id))
    }

    /// Insert a new resting order on `side`.
    ///
    /// # Errors
    /// - `InvalidQuantity` if `quantity` is zero.
    /// - `DuplicateOrderId` if `order_id` already rests on either side.
    /// - `QuantityOverflow` if the level total at `price` would overflow.
    pub fn on_new_order(
        &mut self,
        side: Side,
        price: Price,
        quantity: Quantity,
        order_id: OrderId,
    ) -> Result<(), OrderBookError> {
        if quantity == 0 {
            warn!(
                "Level2 view {}: rejected new order {} with zero quantity",
                self.symbol, order_id
            );
            return Err(OrderBookError::InvalidQuantity { order_id, quantity });
        }
        if let Some(existing) = self.side_of(order_id) {
            warn!(
                "Level2 view {}: rejected new order {}, already resting on {}",
                self.symbol, order_id, existing
            );
            return Err(OrderBookError::DuplicateOrderId { order_id });
        }
        let order = Order::new(order_id, quantity, price);
        self.check_level_capacity(side, &order, None)?;

        trace!(
            "Level2 view {}: new order {} {} {}@{}",
            self.symbol, order_id, side, quantity, price
        );
        self.book_mut(side).add_order(order);
        Ok(())
    }

    /// Remove a resting order.
    ///
    /// # Errors
    /// `OrderNotFound` if `order_id` rests on neither side.
    pub fn on_cancel_order(&mut self, order_id: OrderId) -> Result<(), OrderBookError> {
        let side = self.locate(order_id)?;
        trace!(
            "Level2 view {}: cancel order {} on {}",
            self.symbol, order_id, side
        );
        self.book_mut(side).remove_order(order_id);
        Ok(())
    }

    /// Replace a resting order's price and quantity.
    ///
    /// The order keeps its side and id but is re-appended at the tail of its
    /// (possibly unchanged) price level, losing its previous time priority.
    ///
    /// # Errors
    /// - `OrderNotFound` if `order_id` rests on neither side.
    /// - `InvalidQuantity` if `quantity` is zero.
    /// - `QuantityOverflow` if the level total at `price` would overflow.
    pub fn on_replace_order(
        &mut self,
        price: Price,
        quantity: Quantity,
        order_id: OrderId,
    ) -> Result<(), OrderBookError> {
        let side = self.locate(order_id)?;
        if quantity == 0 {
            warn!(
                "Level2 view {}: rejected replace of {} with zero quantity",
                self.symbol, order_id
            );
            return Err(OrderBookError::InvalidQuantity { order_id, quantity });
        }
        let order = Order::new(order_id, quantity, price);
        let previous = self.book(side).order(order_id).copied();
        self.check_level_capacity(side, &order, previous.as_ref())?;

        trace!(
            "Level2 view {}: replace order {} on {} with {}@{}",
            self.symbol, order_id, side, quantity, price
        );
        self.book_mut(side).replace_order(order);
        Ok(())
    }

    /// Apply a trade of `quantity` against a resting order.
    ///
    /// A full fill removes the order. A partial fill replaces it with the
    /// leftover quantity at the same price, at the tail of its level. A trade
    /// against an id resting on neither side is ignored.
    ///
    /// # Errors
    /// - `InvalidQuantity` if `quantity` is zero.
    /// - `InvalidTrade` if `quantity` exceeds the resting quantity.
    pub fn on_trade(
        &mut self,
        quantity: Quantity,
        resting_order_id: OrderId,
    ) -> Result<(), OrderBookError> {
        let Some(side) = self.side_of(resting_order_id) else {
            trace!(
                "Level2 view {}: trade against unknown order {} ignored",
                self.symbol, resting_order_id
            );
            return Ok(());
        };
        let Some(resting) = self.book(side).order(resting_order_id).copied() else {
            return Ok(());
        };

        if quantity == 0 {
            warn!(
                "Level2 view {}: rejected trade of zero against {}",
                self.symbol, resting_order_id
            );
            return Err(OrderBookError::InvalidQuantity {
                order_id: resting_order_id,
                quantity,
            });
        }

        let Some(leftover) = resting.quantity().checked_sub(quantity) else {
            warn!(
                "Level2 view {}: trade of {} exceeds resting order {}",
                self.symbol, quantity, resting
            );
            return Err(OrderBookError::InvalidTrade {
                order_id: resting_order_id,
                traded: quantity,
                resting: resting.quantity(),
            });
        };

        if leftover > 0 {
            let remaining = resting.with_quantity(leftover);
            self.check_level_capacity(side, &remaining, Some(&resting))?;
            self.book_mut(side).replace_order(remaining);
        } else {
            self.book_mut(side).remove_order(resting_order_id);
        }
        trace!(
            "Level2 view {}: traded {} against {} on {}, {} left",
            self.symbol, quantity, resting_order_id, side, leftover
        );
        Ok(())
    }

    /// Dispatch a decoded feed event to the matching handler
    pub fn apply(&mut self, event: &BookEvent) -> Result<(), OrderBookError> {
        match *event {
            BookEvent::NewOrder {
                side,
                price,
                quantity,
                order_id,
            } => self.on_new_order(side, price, quantity, order_id),
            BookEvent::CancelOrder { order_id } => self.on_cancel_order(order_id),
            BookEvent::ReplaceOrder {
                price,
                quantity,
                order_id,
            } => self.on_replace_order(price, quantity, order_id),
            BookEvent::Trade {
                quantity,
                resting_order_id,
            } => self.on_trade(quantity, resting_order_id),
        }
    }

    /// Total quantity resting at `price` on `side`
    pub fn size_for_price_level(&self, side: Side, price: Price) -> Quantity {
        self.book(side).quantity_at(price)
    }

    /// Number of orders resting at `price` on `side`
    pub fn order_count(&self, side: Side, price: Price) -> usize {
        self.book(side).order_count(price)
    }

    /// Number of distinct price levels on `side`
    pub fn book_depth(&self, side: Side) -> usize {
        self.book(side).book_depth()
    }

    /// Best resting price on `side`.
    ///
    /// # Errors
    /// `EmptyBook` if no order rests on `side`.
    pub fn top_of_book(&self, side: Side) -> Result<Price, OrderBookError> {
        self.book(side)
            .top_order()
            .map(Order::price)
            .ok_or(OrderBookError::EmptyBook { side })
    }

    /// Get the best bid price, if any
    pub fn best_bid(&self) -> Option<Price> {
        self.bids.top_order().map(Order::price)
    }

    /// Get the best ask price, if any
    pub fn best_ask(&self) -> Option<Price> {
        self.asks.top_order().map(Order::price)
    }

    /// Get the spread (best ask - best bid), `None` if it is not representable
    pub fn spread(&self) -> Option<Price> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => ask.checked_sub(bid),
            _ => None,
        }
    }

    /// Get the mid price (average of best bid and best ask), `None` if the
    /// sum of the two overflows
    pub fn mid_price(&self) -> Option<Price> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => bid
                .checked_add(ask)
                .and_then(|sum| sum.checked_div(Decimal::TWO)),
            _ => None,
        }
    }

    /// True when the best bid is at or above the best ask
    pub fn is_crossed(&self) -> bool {
        matches!((self.best_bid(), self.best_ask()), (Some(bid), Some(ask)) if bid >= ask)
    }

    /// Drop every order on both sides
    pub fn clear(&mut self) {
        self.asks.clear();
        self.bids.clear();
        trace!("Level2 view {}: cleared", self.symbol);
    }

    /// Rejects `order` if resting it on `side` would overflow its level's
    /// aggregate quantity. `replacing` is the order's current state when it
    /// is being replaced, so its own share of the level is not counted twice.
    fn check_level_capacity(
        &self,
        side: Side,
        order: &Order,
        replacing: Option<&Order>,
    ) -> Result<(), OrderBookError> {
        let mut resting = self.book(side).quantity_at(order.price());
        if let Some(previous) = replacing.filter(|previous| previous.price() == order.price()) {
            resting = resting.saturating_sub(previous.quantity());
        }
        if resting.checked_add(order.quantity()).is_none() {
            warn!(
                "Level2 view {}: order {} of {} overflows {} level {} holding {}",
                self.symbol,
                order.id(),
                order.quantity(),
                side,
                order.price(),
                resting
            );
            return Err(OrderBookError::QuantityOverflow {
                order_id: order.id(),
                price: order.price(),
                resting,
                quantity: order.quantity(),
            });
        }
        Ok(())
    }

    fn locate(&self, order_id: OrderId) -> Result<Side, OrderBookError> {
        self.side_of(order_id).ok_or_else(|| {
            error!(
                "Level2 view {}: could not find order ID {}",
                self.symbol, order_id
            );
            OrderBookError::OrderNotFound { order_id }
        })
    }
}

impl<S> Level2EventListener for Level2View<S>
where
    S: OrderStore,
{
    fn on_new_order(
        &mut self,
        side: Side,
        price: Price,
        quantity: Quantity,
        order_id: OrderId,
    ) -> Result<(), OrderBookError> {
        Level2View::on_new_order(self, side, price, quantity, order_id)
    }

    fn on_cancel_order(&mut self, order_id: OrderId) -> Result<(), OrderBookError> {
        Level2View::on_cancel_order(self, order_id)
    }

    fn on_replace_order(
        &mut self,
        price: Price,
        quantity: Quantity,
        order_id: OrderId,
    ) -> Result<(), OrderBookError> {
        Level2View::on_replace_order(self, price, quantity, order_id)
    }

    fn on_trade(
        &mut self,
        quantity: Quantity,
        resting_order_id: OrderId,
    ) -> Result<(), OrderBookError> {
        Level2View::on_trade(self, quantity, resting_order_id)
    }
}

impl<S> Level2Metrics for Level2View<S>
where
    S: OrderStore,
{
    fn size_for_price_level(&self, side: Side, price: Price) -> Quantity {
        Level2View::size_for_price_level(self, side, price)
    }

    fn book_depth(&self, side: Side) -> usize {
        Level2View::book_depth(self, side)
    }

    fn top_of_book(&self, side: Side) -> Result<Price, OrderBookError> {
        Level2View::top_of_book(self, side)
    }
}
