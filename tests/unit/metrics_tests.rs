use level2_book::prelude::*;
use rust_decimal::Decimal;

fn px(value: i64) -> Price {
    Decimal::from(value)
}

fn drive<L: Level2EventListener>(listener: &mut L) -> Result<(), OrderBookError> {
    listener.on_new_order(Side::Ask, px(10), 100, 1)?;
    listener.on_new_order(Side::Ask, px(11), 100, 2)?;
    listener.on_new_order(Side::Bid, px(9), 100, 3)?;
    listener.on_trade(60, 1)?;
    listener.on_replace_order(px(8), 50, 3)?;
    listener.on_cancel_order(2)?;
    Ok(())
}

fn read<M: Level2Metrics>(metrics: &M) -> (Quantity, usize, Price, Price) {
    (
        metrics.size_for_price_level(Side::Ask, px(10)),
        metrics.book_depth(Side::Ask),
        metrics.top_of_book(Side::Ask).unwrap(),
        metrics.top_of_book(Side::Bid).unwrap(),
    )
}

#[test]
fn test_view_through_listener_and_metrics_traits() {
    let mut view = Level2View::new("ACME");
    drive(&mut view).unwrap();
    assert_eq!(read(&view), (40, 1, px(10), px(8)));
}

#[test]
fn test_listener_errors_surface_through_trait() {
    let mut view = Level2View::new("ACME");
    let listener: &mut dyn Level2EventListener = &mut view;
    assert_eq!(
        listener.on_cancel_order(5),
        Err(OrderBookError::OrderNotFound { order_id: 5 })
    );
    assert!(listener.on_trade(5, 5).is_ok());
}

#[test]
fn test_independent_views_do_not_share_state() {
    let mut first = Level2View::new("AAA");
    let mut second = Level2View::new("BBB");
    first.on_new_order(Side::Bid, px(1), 1, 1).unwrap();
    second.on_new_order(Side::Bid, px(2), 1, 1).unwrap();

    assert_eq!(first.top_of_book(Side::Bid).unwrap(), px(1));
    assert_eq!(second.top_of_book(Side::Bid).unwrap(), px(2));
    first.on_cancel_order(1).unwrap();
    assert_eq!(second.book_depth(Side::Bid), 1);
}

#[test]
fn test_config_from_json_builds_view() {
    let config = BookConfig::from_json(r#"{"symbol":"ACME","order_capacity":4096}"#).unwrap();
    let mut view = Level2View::with_config(&config);
    assert_eq!(view.symbol(), "ACME");
    view.on_new_order(Side::Ask, px(3), 1, 1).unwrap();
    assert_eq!(view.book_depth(Side::Ask), 1);
}
