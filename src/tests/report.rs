use crate::{
    data::{Candlestick, OrderEntry, OrderSide},
    error::{ErrorHandler, ExchangeError},
    exchange::{ProductStats, StepReport},
    ledger::{TradingStats, Transaction, TransactionKind},
    report
};
use super::T1;

fn candle(date: &str, open: f64, high: f64, low: f64, close: f64) -> Candlestick {
    Candlestick {
        date: date.to_string(),
        open,
        high,
        low,
        close,
        product: "ETH/BTC".to_string(),
        side: OrderSide::Ask
    }
}

#[test]
fn test_candlestick_display() {
    let c = candle("2020-03-17", 0.02187308, 0.0219, 0.0218, 0.02189093);
    assert_eq!(c.to_string(), "2020-03-17 | O: 0.021873 | H: 0.021900 | L: 0.021800 | C: 0.021891");
}

#[test]
fn test_candlestick_table() {
    let table = report::candlestick_table(&[candle("2020-01", 10.0, 12.0, 10.0, 12.0), candle("2020-02", 9.0, 9.0, 9.0, 9.0)]);
    let lines: Vec<&str> = table.lines().collect();

    assert_eq!(lines[0], format!("{:<15}{:>12}{:>12}{:>12}{:>12}", "Date", "Open", "High", "Low", "Close"));
    assert_eq!(lines[1], "-".repeat(63));
    assert_eq!(lines[2], format!("{:<15}{:>12}{:>12}{:>12}{:>12}", "2020-01", "10.000000", "12.000000", "10.000000", "12.000000"));
    assert!(lines[3].starts_with("2020-02"));
    assert_eq!(lines.last(), Some(&"Total records: 2"));
}

#[test]
fn test_candlestick_table_empty() {
    assert_eq!(report::candlestick_table(&[]), "No data available for this product.\n");
}

#[test]
fn test_json_lines() {
    let out = report::to_json_lines(&[candle("2020", 1.0, 2.0, 0.5, 1.5), candle("2021", 1.5, 1.5, 1.5, 1.5)]).unwrap();
    let rows: Vec<serde_json::Value> = out.lines().map(|l| serde_json::from_str(l).unwrap()).collect();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["date"], "2020");
    assert_eq!(rows[0]["side"], "ask");
    assert_eq!(rows[1]["close"], 1.5);
}

#[test]
fn test_market_stats_omits_empty_sides() {
    let stats = ProductStats {
        product: "ETH/BTC".to_string(),
        asks: 2,
        bids: 0,
        max_ask: Some(0.0219),
        min_ask: Some(0.0218),
        max_bid: None,
        min_bid: None
    };
    let out = report::market_stats(&[stats]);

    assert!(out.contains("--- ETH/BTC ---"));
    assert!(out.contains("  Max ask: 0.02190000"));
    assert!(out.contains("Bids available: 0"));
    assert!(!out.contains("Max bid"));
}

#[test]
fn test_step_summary() {
    let step = StepReport {
        timestamp: T1.to_string(),
        next_timestamp: T1.to_string(),
        wrapped: true,
        sales: vec![
            OrderEntry::new(1.0, 0.5, T1, "ETH/BTC", OrderSide::AskSale, "a"),
            OrderEntry::new(1.1, 0.5, T1, "ETH/BTC", OrderSide::BidSale, "b"),
        ],
        settled: 0,
        unrecorded: Vec::new()
    };
    let summary = report::step_summary(&step);

    assert!(summary.contains("2 sales"));
    assert!(summary.contains("traded 0.50000000"));
    assert!(summary.ends_with("(wrapped)"));
}

#[test]
fn test_error_recoverability() {
    assert!(ErrorHandler::is_recoverable(&ExchangeError::Validation("x".to_string())));
    assert!(ErrorHandler::is_recoverable(&ExchangeError::UnknownPeriod("weekly".to_string())));
    assert!(!ErrorHandler::is_recoverable(&ExchangeError::Configuration("x".to_string())));
    assert_eq!(
        ErrorHandler::handle_error(&ExchangeError::UnknownSide("sell".to_string())),
        "Unknown order side 'sell', expected ask or bid"
    );
}

#[test]
fn test_trading_stats_report() {
    let bid = Transaction {
        username: "simuser".to_string(),
        timestamp: T1.to_string(),
        kind: TransactionKind::BidPlaced,
        product: "BTC/USDT".to_string(),
        amount: 0.1,
        price: 5000.0,
        balance_after: 0.0
    };
    let ask = Transaction { kind: TransactionKind::AskFilled, product: "ETH/BTC".to_string(), ..bid.clone() };
    let out = report::trading_stats(&TradingStats::from_transactions(&[bid, ask.clone(), ask]));

    assert!(out.starts_with("Total Transactions: 3\n"));
    assert!(out.contains("Total Asks (Sell Orders): 2"));
    assert!(out.contains("Total Bids (Buy Orders): 1"));
    assert!(out.contains("Total Money Spent: 500.00"));
    assert!(out.contains("ETH/BTC: 2 asks"));
    assert!(out.contains("BTC/USDT: 1 bids"));
}

#[test]
fn test_trading_stats_report_without_activity() {
    assert_eq!(report::trading_stats(&TradingStats::default()), "No trading activity yet.\n");
}
