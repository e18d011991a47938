//! # Level-2 Order Book
//!
//! An in-memory Level-2 limit order book for a single instrument. It keeps
//! every resting order grouped by price level and answers aggregated depth
//! and top-of-book queries while it is updated on every order and trade
//! event.
//!
//! ## Structure
//!
//! - [`PriceIndex`](orderbook::PriceIndex): a red-black tree over the distinct
//!   active prices of one side, ordered ascending for asks and descending for
//!   bids, with the best price cached for O(1) access.
//! - [`SideBook`](orderbook::SideBook): one side's order table, level table
//!   and price index, kept in step on every call.
//! - [`Level2View`](orderbook::Level2View): owns one `SideBook` per side,
//!   routes new, cancel, replace and trade events, and settles partial fills.
//!
//! Prices are exact decimals ([`rust_decimal::Decimal`]); no binary floating
//! point is involved in any comparison or arithmetic.
//!
//! ## Example
//!
//! ```
//! use level2_book::prelude::*;
//! use rust_decimal::Decimal;
//!
//! let mut view = Level2View::new("ACME");
//! view.on_new_order(Side::Bid, Decimal::new(9950, 2), 100, 1).unwrap();
//! view.on_new_order(Side::Ask, Decimal::new(10025, 2), 40, 2).unwrap();
//!
//! view.on_trade(15, 2).unwrap();
//!
//! assert_eq!(view.top_of_book(Side::Ask).unwrap(), Decimal::new(10025, 2));
//! assert_eq!(view.size_for_price_level(Side::Ask, Decimal::new(10025, 2)), 25);
//! assert_eq!(view.book_depth(Side::Bid), 1);
//! ```
//!
//! ## Threading
//!
//! Everything is single-threaded and synchronous. A view exclusively owns
//! its two sides; scale out by running one view per instrument.

pub mod orderbook;
mod utils;

pub use orderbook::{
    BookConfig, BookEvent, Level2EventListener, Level2Metrics, Level2Snapshot,
    Level2SnapshotPackage, Level2View, Order, OrderBookError, OrderId, OrderStore, Price,
    PriceIndex, PriceLevel, Quantity, Side, SideBook,
};
pub use utils::current_time_millis;

/// Commonly used types, re-exported for `use level2_book::prelude::*`.
pub mod prelude {
    pub use crate::orderbook::{
        BookConfig, BookEvent, Level2EventListener, Level2Metrics, Level2Snapshot,
        Level2SnapshotPackage, Level2View, LevelSnapshot, NodeHandle, Order, OrderBookError,
        OrderId, OrderStore, Price, PriceIndex, PriceLevel, Quantity, Side, SideBook,
    };
}
