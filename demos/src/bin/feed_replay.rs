//! Example replaying a decoded order feed into a Level2View
//!
//! This example shows how to:
//! 1. Build a view from a JSON configuration
//! 2. Drive it with decoded `BookEvent`s, the way a feed handler would
//! 3. Handle rejected events without stopping the feed
//! 4. Publish a checksum-protected depth snapshot

use level2_book::prelude::*;
use tracing::{error, info, warn};

const CONFIG: &str = r#"{"symbol":"ACME","order_capacity":4096,"level_capacity":64}"#;

const FEED: &str = r#"[
    {"type":"new_order","side":"BID","price":"99.50","quantity":100,"order_id":1},
    {"type":"new_order","side":"BID","price":"99.75","quantity":40,"order_id":2},
    {"type":"new_order","side":"BID","price":"99.50","quantity":60,"order_id":3},
    {"type":"new_order","side":"ASK","price":"100.00","quantity":80,"order_id":4},
    {"type":"new_order","side":"ASK","price":"100.25","quantity":120,"order_id":5},
    {"type":"trade","quantity":30,"resting_order_id":4},
    {"type":"trade","quantity":40,"resting_order_id":2},
    {"type":"replace_order","price":"99.80","quantity":70,"order_id":3},
    {"type":"trade","quantity":500,"resting_order_id":5},
    {"type":"cancel_order","order_id":77},
    {"type":"trade","quantity":10,"resting_order_id":77},
    {"type":"cancel_order","order_id":1}
]"#;

fn print_top(view: &Level2View) {
    for side in Side::ALL {
        match view.top_of_book(side) {
            Ok(price) => info!(
                "  {} top {} size {} depth {}",
                side,
                price,
                view.size_for_price_level(side, price),
                view.book_depth(side)
            ),
            Err(e) => warn!("  {}: {}", side, e),
        }
    }
}

fn main() {
    tracing_subscriber::fmt::init();

    let config = match BookConfig::from_json(CONFIG) {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return;
        }
    };
    let mut view = Level2View::with_config(&config);
    info!("Replaying feed into {}", view.symbol());

    let events: Vec<BookEvent> = match serde_json::from_str(FEED) {
        Ok(events) => events,
        Err(e) => {
            error!("Could not decode feed: {}", e);
            return;
        }
    };

    for event in &events {
        match view.apply(event) {
            Ok(()) => info!("Applied {:?}", event),
            Err(e) => warn!("Rejected event for order {}: {}", event.order_id(), e),
        }
        print_top(&view);
    }

    if let (Some(spread), Some(mid)) = (view.spread(), view.mid_price()) {
        info!("Spread {} mid {}", spread, mid);
    }

    match view.snapshot_to_json(5) {
        Ok(json) => info!("Snapshot: {}", json),
        Err(e) => error!("Could not publish snapshot: {}", e),
    }
}
