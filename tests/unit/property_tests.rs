use level2_book::prelude::*;
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Reference model: per side, price to the ordered list of (id, quantity).
#[derive(Default)]
struct Model {
    sides: [BTreeMap<Decimal, Vec<(OrderId, Quantity)>>; 2],
    owners: BTreeMap<OrderId, (usize, Decimal)>,
}

fn slot(side: Side) -> usize {
    match side {
        Side::Ask => 0,
        Side::Bid => 1,
    }
}

impl Model {
    fn add(&mut self, side: Side, price: Decimal, quantity: Quantity, id: OrderId) {
        self.sides[slot(side)]
            .entry(price)
            .or_default()
            .push((id, quantity));
        self.owners.insert(id, (slot(side), price));
    }

    fn remove(&mut self, id: OrderId) -> Option<(usize, Decimal, Quantity)> {
        let (side, price) = self.owners.remove(&id)?;
        let level = self.sides[side].get_mut(&price)?;
        let position = level.iter().position(|(order_id, _)| *order_id == id)?;
        let (_, quantity) = level.remove(position);
        if level.is_empty() {
            self.sides[side].remove(&price);
        }
        Some((side, price, quantity))
    }

    fn top(&self, side: Side) -> Option<Decimal> {
        let levels = &self.sides[slot(side)];
        match side {
            Side::Ask => levels.keys().next().copied(),
            Side::Bid => levels.keys().next_back().copied(),
        }
    }
}

#[derive(Debug, Clone)]
enum Op {
    New(Side, i64, Quantity, OrderId),
    Cancel(OrderId),
    Replace(i64, Quantity, OrderId),
    Trade(Quantity, OrderId),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let side = prop_oneof![Just(Side::Ask), Just(Side::Bid)];
    prop_oneof![
        4 => (side, 0i64..40, 1u64..200, 0u64..64)
            .prop_map(|(side, price, quantity, id)| Op::New(side, price, quantity, id)),
        2 => (0u64..64).prop_map(Op::Cancel),
        1 => (0i64..40, 1u64..200, 0u64..64)
            .prop_map(|(price, quantity, id)| Op::Replace(price, quantity, id)),
        2 => (1u64..250, 0u64..64).prop_map(|(quantity, id)| Op::Trade(quantity, id)),
    ]
}

fn price(ticks: i64) -> Decimal {
    Decimal::new(ticks * 25, 2)
}

proptest! {
    #[test]
    fn prop_view_matches_model(ops in prop::collection::vec(op_strategy(), 1..300)) {
        let mut view = Level2View::new("PROP");
        let mut model = Model::default();

        for op in ops {
            match op {
                Op::New(side, ticks, quantity, id) => {
                    let result = view.on_new_order(side, price(ticks), quantity, id);
                    if model.owners.contains_key(&id) {
                        prop_assert!(result.is_err());
                    } else {
                        prop_assert!(result.is_ok());
                        model.add(side, price(ticks), quantity, id);
                    }
                }
                Op::Cancel(id) => {
                    let result = view.on_cancel_order(id);
                    prop_assert_eq!(result.is_ok(), model.remove(id).is_some());
                }
                Op::Replace(ticks, quantity, id) => {
                    let result = view.on_replace_order(price(ticks), quantity, id);
                    match model.remove(id) {
                        Some((side, _, _)) => {
                            prop_assert!(result.is_ok());
                            let side = if side == 0 { Side::Ask } else { Side::Bid };
                            model.add(side, price(ticks), quantity, id);
                        }
                        None => {
                            prop_assert!(result.is_err());
                        }
                    }
                }
                Op::Trade(quantity, id) => {
                    let result = view.on_trade(quantity, id);
                    match model.owners.get(&id).copied() {
                        None => {
                            prop_assert!(result.is_ok());
                        }
                        Some((side, level_price)) => {
                            let resting = model.sides[side][&level_price]
                                .iter()
                                .find(|(order_id, _)| *order_id == id)
                                .map(|(_, quantity)| *quantity)
                                .unwrap();
                            if quantity > resting {
                                prop_assert!(result.is_err());
                            } else {
                                prop_assert!(result.is_ok());
                                model.remove(id);
                                if quantity < resting {
                                    let side = if side == 0 { Side::Ask } else { Side::Bid };
                                    model.add(side, level_price, resting - quantity, id);
                                }
                            }
                        }
                    }
                }
            }

            prop_assert!(view.validate().is_ok());
            for side in Side::ALL {
                let levels = &model.sides[slot(side)];
                prop_assert_eq!(view.book_depth(side), levels.len());
                prop_assert_eq!(view.top_of_book(side).ok(), model.top(side));
                prop_assert_eq!(view.book(side).top_order().map(Order::id),
                    model.top(side).map(|top| levels[&top][0].0));
                for (level_price, orders) in levels {
                    let total: Quantity = orders.iter().map(|(_, quantity)| quantity).sum();
                    prop_assert_eq!(view.size_for_price_level(side, *level_price), total);
                    prop_assert_eq!(view.book(side).order_count(*level_price), orders.len());
                }
            }
        }
    }
}
