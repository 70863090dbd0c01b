use crate::{data::OrderSide, orderbook::OrderBook, timeline::{scan_forward, ReplayClock}};
use super::{order, T1, T2, T3};

fn three_step_book() -> OrderBook {
    let mut book = OrderBook::new();
    book.insert(order(1.0, 1.0, T1, OrderSide::Ask)).unwrap();
    book.insert(order(1.0, 1.0, T2, OrderSide::Bid)).unwrap();
    book.insert(order(2.0, 1.0, T3, OrderSide::Ask)).unwrap();
    book
}

#[test]
fn test_clock_starts_at_earliest() {
    let book = three_step_book();
    let clock = ReplayClock::start(&book).unwrap();

    assert_eq!(clock.current(), T1);
    assert_eq!(clock.index(), 0);
    assert_eq!(clock.cycles(), 0);
}

#[test]
fn test_clock_on_empty_book() {
    assert_eq!(ReplayClock::start(&OrderBook::new()), None);
}

#[test]
fn test_clock_wraps_after_full_cycle() {
    let book = three_step_book();
    let mut clock = ReplayClock::start(&book).unwrap();

    assert!(!clock.advance(&book));
    assert_eq!((clock.current(), clock.index()), (T2, 1));
    assert!(!clock.advance(&book));
    assert_eq!((clock.current(), clock.index()), (T3, 2));
    assert!(clock.advance(&book));
    assert_eq!((clock.current(), clock.index()), (T1, 0));
    assert_eq!(clock.cycles(), 1);
}

#[test]
fn test_single_timestamp_always_wraps() {
    let mut book = OrderBook::new();
    book.insert(order(1.0, 1.0, T1, OrderSide::Ask)).unwrap();
    let mut clock = ReplayClock::start(&book).unwrap();

    assert!(clock.advance(&book));
    assert!(clock.advance(&book));
    assert_eq!(clock.current(), T1);
    assert_eq!(clock.cycles(), 2);
}

#[test]
fn test_scan_forward_finds_first_match() {
    let book = three_step_book();

    let found = scan_forward(&book, T1, |ts| !book.entries_at(OrderSide::Bid, "ETH/BTC", ts).is_empty());
    assert_eq!(found.as_deref(), Some(T2));

    let found = scan_forward(&book, T2, |ts| ts == T3);
    assert_eq!(found.as_deref(), Some(T3));
}

#[test]
fn test_scan_forward_stops_at_wrap() {
    let book = three_step_book();
    let mut visited = 0;

    let found = scan_forward(&book, T1, |_| {
        visited += 1;
        false
    });
    assert_eq!(found, None);
    assert_eq!(visited, 3);

    assert_eq!(scan_forward(&book, T3, |ts| ts == T1), None);
    assert_eq!(scan_forward(&OrderBook::new(), T1, |_| true), None);
}
