use level2_book::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn px(value: i64) -> Price {
    Decimal::from(value)
}

#[test]
fn test_orders_added_are_retrievable() {
    let mut view = Level2View::new("ACME");
    view.on_new_order(Side::Ask, dec!(10.10), 5, 1).unwrap();
    view.on_new_order(Side::Bid, dec!(9.90), 7, 2).unwrap();

    assert!(view.book(Side::Ask).contains_order(1));
    assert!(view.book(Side::Bid).contains_order(2));
    assert_eq!(view.order(1), Some(&Order::new(1, 5, dec!(10.10))));
    assert_eq!(view.order(2), Some(&Order::new(2, 7, dec!(9.90))));
    assert_eq!(view.side_of(1), Some(Side::Ask));
    assert_eq!(view.side_of(2), Some(Side::Bid));
}

#[test]
fn test_top_and_depth_follow_levels() {
    // Highest bid is top of the bid side.
    let mut view = Level2View::new("ACME");
    view.on_new_order(Side::Bid, px(0), 10, 1).unwrap();
    view.on_new_order(Side::Bid, px(1), 10, 2).unwrap();
    assert_eq!(view.top_of_book(Side::Bid).unwrap(), px(1));
    assert_eq!(view.book_depth(Side::Bid), 2);

    view.on_cancel_order(2).unwrap();
    assert_eq!(view.top_of_book(Side::Bid).unwrap(), px(0));
    assert_eq!(view.book_depth(Side::Bid), 1);

    view.on_new_order(Side::Bid, px(0), 10, 3).unwrap();
    view.on_cancel_order(1).unwrap();
    assert_eq!(view.book_depth(Side::Bid), 1);
    assert_eq!(view.book(Side::Bid).order_count(px(0)), 1);
    assert_eq!(view.top_of_book(Side::Bid).unwrap(), px(0));
}

#[test]
fn test_trade_fills() {
    let mut view = Level2View::new("ACME");
    view.on_new_order(Side::Bid, px(100), 100, 1).unwrap();
    view.on_new_order(Side::Bid, px(100), 100, 2).unwrap();
    view.on_new_order(Side::Bid, px(100), 100, 3).unwrap();

    // Full fill.
    view.on_trade(100, 1).unwrap();
    assert!(view.order(1).is_none());
    assert_eq!(view.size_for_price_level(Side::Bid, px(100)), 200);

    // Partial fill.
    view.on_trade(50, 2).unwrap();
    assert_eq!(view.order(2).map(Order::quantity), Some(50));
    assert_eq!(view.order(2).map(Order::price), Some(px(100)));
    assert_eq!(view.size_for_price_level(Side::Bid, px(100)), 150);

    // Overfill.
    let err = view.on_trade(150, 3).unwrap_err();
    assert!(matches!(err, OrderBookError::InvalidTrade { .. }));
    assert_eq!(view.size_for_price_level(Side::Bid, px(100)), 150);
    assert_eq!(view.book_depth(Side::Bid), 1);
    assert_eq!(view.top_of_book(Side::Bid).unwrap(), px(100));
}

#[test]
fn test_last_order_fill_removes_level() {
    let mut view = Level2View::new("ACME");
    view.on_new_order(Side::Ask, px(10), 5, 1).unwrap();
    view.on_new_order(Side::Ask, px(11), 5, 2).unwrap();

    view.on_trade(5, 1).unwrap();

    assert_eq!(view.book_depth(Side::Ask), 1);
    assert_eq!(view.top_of_book(Side::Ask).unwrap(), px(11));
}

#[test]
fn test_empty_side_top_of_book_fails() {
    let mut view = Level2View::new("ACME");
    view.on_new_order(Side::Ask, px(10), 5, 1).unwrap();
    assert_eq!(
        view.top_of_book(Side::Bid),
        Err(OrderBookError::EmptyBook { side: Side::Bid })
    );
    view.on_cancel_order(1).unwrap();
    assert!(view.top_of_book(Side::Ask).is_err());
}

#[test]
fn test_replace_matches_remove_then_add() {
    let mut replaced = Level2View::new("ACME");
    let mut rebuilt = Level2View::new("ACME");
    for view in [&mut replaced, &mut rebuilt] {
        view.on_new_order(Side::Ask, px(10), 5, 1).unwrap();
        view.on_new_order(Side::Ask, px(10), 6, 2).unwrap();
        view.on_new_order(Side::Ask, px(12), 7, 3).unwrap();
    }

    replaced.on_replace_order(px(9), 4, 2).unwrap();
    rebuilt.on_cancel_order(2).unwrap();
    rebuilt.on_new_order(Side::Ask, px(9), 4, 2).unwrap();

    for price in [px(9), px(10), px(12)] {
        assert_eq!(
            replaced.size_for_price_level(Side::Ask, price),
            rebuilt.size_for_price_level(Side::Ask, price)
        );
    }
    assert_eq!(replaced.book_depth(Side::Ask), rebuilt.book_depth(Side::Ask));
    assert_eq!(replaced.top_of_book(Side::Ask), rebuilt.top_of_book(Side::Ask));
    assert_eq!(
        replaced.snapshot(10).asks,
        rebuilt.snapshot(10).asks
    );
}

#[test]
fn test_feed_replay_from_json() {
    let feed = r#"[
        {"type":"new_order","side":"BID","price":"99.50","quantity":10,"order_id":1},
        {"type":"new_order","side":"ASK","price":"100.00","quantity":8,"order_id":2},
        {"type":"new_order","side":"ASK","price":"100.5","quantity":8,"order_id":3},
        {"type":"trade","quantity":3,"resting_order_id":2},
        {"type":"trade","quantity":1,"resting_order_id":42},
        {"type":"replace_order","price":"99.75","quantity":12,"order_id":1},
        {"type":"cancel_order","order_id":3}
    ]"#;
    let events: Vec<BookEvent> = serde_json::from_str(feed).unwrap();

    let mut view = Level2View::new("ACME");
    for event in &events {
        view.apply(event).unwrap();
    }

    assert_eq!(view.best_bid(), Some(dec!(99.75)));
    assert_eq!(view.best_ask(), Some(dec!(100)));
    assert_eq!(view.size_for_price_level(Side::Ask, dec!(100.00)), 5);
    assert_eq!(view.book_depth(Side::Ask), 1);
    assert_eq!(view.spread(), Some(dec!(0.25)));
    view.validate().unwrap();
}
