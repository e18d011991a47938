//! Level-2 order book: price levels, a red-black price index per side, and
//! the two-sided view that routes order events and settles trades.

pub mod book;
pub mod config;
pub mod error;
/// Decoded order events as handed over by a feed handler.
pub mod event;
pub mod index;
pub mod level;
/// Event-sourcing and metrics contracts implemented by [`Level2View`].
pub mod listener;
pub mod order;
/// Per-side order store combining order, level and price tables.
pub mod side;
pub mod snapshot;
pub mod store;

pub use book::Level2View;
pub use config::BookConfig;
pub use error::OrderBookError;
pub use event::BookEvent;
pub use index::{NodeHandle, PriceIndex};
pub use level::PriceLevel;
pub use listener::{Level2EventListener, Level2Metrics};
pub use order::{Order, OrderId, Price, Quantity, Side};
pub use side::SideBook;
pub use snapshot::{LEVEL2_SNAPSHOT_FORMAT_VERSION, Level2Snapshot, Level2SnapshotPackage, LevelSnapshot};
pub use store::OrderStore;
