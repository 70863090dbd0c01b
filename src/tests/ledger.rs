use std::fs;
use crate::ledger::{CsvLedger, MemoryLedger, TradingStats, Transaction, TransactionKind, TransactionLog};
use crate::data::OrderSide;
use super::{T1, T2};

fn tx(username: &str, timestamp: &str, kind: TransactionKind, amount: f64) -> Transaction {
    Transaction {
        username: username.to_string(),
        timestamp: timestamp.to_string(),
        kind,
        product: "ETH/BTC".to_string(),
        amount,
        price: 0.02,
        balance_after: 1.0
    }
}

#[test]
fn test_kinds_from_sides() {
    assert_eq!(TransactionKind::placed(OrderSide::Ask), Some(TransactionKind::AskPlaced));
    assert_eq!(TransactionKind::placed(OrderSide::Bid), Some(TransactionKind::BidPlaced));
    assert_eq!(TransactionKind::placed(OrderSide::AskSale), None);
    assert_eq!(TransactionKind::filled(OrderSide::AskSale), Some(TransactionKind::AskFilled));
    assert_eq!(TransactionKind::filled(OrderSide::BidSale), Some(TransactionKind::BidFilled));
    assert_eq!(TransactionKind::filled(OrderSide::Bid), None);
}

#[test]
fn test_memory_ledger() {
    let mut ledger = MemoryLedger::new();
    ledger.record(&tx("simuser", T1, TransactionKind::AskPlaced, 1.0)).unwrap();
    ledger.record(&tx("other", T1, TransactionKind::BidPlaced, 2.0)).unwrap();

    assert_eq!(ledger.transactions.len(), 2);
    assert_eq!(ledger.for_user("simuser").len(), 1);
    assert_eq!(ledger.for_user("other")[0].amount, 2.0);
}

#[test]
fn test_csv_ledger_row_layout() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("transactions.csv");

    let mut ledger = CsvLedger::open(&path).unwrap();
    ledger.record(&tx("simuser", T1, TransactionKind::AskPlaced, 0.5)).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let fields: Vec<&str> = content.trim_end().split(',').collect();
    assert_eq!(fields.len(), 7);
    assert_eq!(&fields[..4], &["simuser", T1, "ASK_PLACED", "ETH/BTC"]);
    assert_eq!(ledger.path(), path.as_path());
}

#[test]
fn test_csv_ledger_history() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("transactions.csv");

    {
        let mut ledger = CsvLedger::open(&path).unwrap();
        ledger.record(&tx("simuser", T1, TransactionKind::BidPlaced, 1.0)).unwrap();
        ledger.record(&tx("other", T1, TransactionKind::AskPlaced, 9.0)).unwrap();
    }
    {
        let mut ledger = CsvLedger::open(&path).unwrap();
        ledger.record(&tx("simuser", T2, TransactionKind::BidFilled, 0.5)).unwrap();
    }

    let history = CsvLedger::read_user(&path, "simuser").unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0], tx("simuser", T1, TransactionKind::BidPlaced, 1.0));
    assert_eq!(history[1].kind, TransactionKind::BidFilled);

    let recent = CsvLedger::read_user_recent(&path, "simuser", 1).unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].timestamp, T2);

    assert!(CsvLedger::read_user(&path, "nobody").unwrap().is_empty());
    assert_eq!(CsvLedger::read_user_recent(&path, "simuser", 10).unwrap().len(), 2);
}

fn priced(kind: TransactionKind, product: &str, amount: f64, price: f64) -> Transaction {
    Transaction {
        product: product.to_string(),
        price,
        ..tx("simuser", T1, kind, amount)
    }
}

#[test]
fn test_trading_stats() {
    let history = vec![
        priced(TransactionKind::AskPlaced, "ETH/BTC", 1.0, 0.02),
        priced(TransactionKind::AskFilled, "ETH/BTC", 1.0, 0.02),
        priced(TransactionKind::BidPlaced, "BTC/USDT", 0.1, 5000.0),
        priced(TransactionKind::BidFilled, "ETH/BTC", 2.0, 0.02),
    ];

    let stats = TradingStats::from_transactions(&history);
    assert_eq!(stats.total, 4);
    assert_eq!(stats.asks, 2);
    assert_eq!(stats.bids, 2);
    assert!((stats.money_spent - 500.04).abs() < 1e-9);
    assert_eq!(stats.asks_by_product.get("ETH/BTC"), Some(&2));
    assert_eq!(stats.bids_by_product.get("BTC/USDT"), Some(&1));
    assert_eq!(stats.bids_by_product.get("ETH/BTC"), Some(&1));
    assert_eq!(stats.asks_by_product.len(), 1);
}

#[test]
fn test_trading_stats_of_empty_history() {
    assert_eq!(TradingStats::from_transactions(&[]), TradingStats::default());
}
