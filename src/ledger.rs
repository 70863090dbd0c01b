use std::{collections::BTreeMap, fs::{File, OpenOptions}, path::{Path, PathBuf}};
use csv::{ReaderBuilder, Writer, WriterBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;
use crate::{data::OrderSide, error::{ExchangeError, ExchangeResult}};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    AskPlaced,
    BidPlaced,
    AskFilled,
    BidFilled
}

impl TransactionKind {
    pub fn placed(side: OrderSide) -> Option<Self> {
        match side {
            OrderSide::Ask => Some(TransactionKind::AskPlaced),
            OrderSide::Bid => Some(TransactionKind::BidPlaced),
            OrderSide::AskSale | OrderSide::BidSale => None
        }
    }

    pub fn filled(side: OrderSide) -> Option<Self> {
        match side {
            OrderSide::AskSale => Some(TransactionKind::AskFilled),
            OrderSide::BidSale => Some(TransactionKind::BidFilled),
            OrderSide::Ask | OrderSide::Bid => None
        }
    }
}

/// One append-only ledger row:
/// `username,timestamp,eventType,product,amount,price,balanceAfter`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub username: String,
    pub timestamp: String,
    #[serde(rename = "eventType")]
    pub kind: TransactionKind,
    pub product: String,
    pub amount: f64,
    pub price: f64,
    #[serde(rename = "balanceAfter")]
    pub balance_after: f64
}

impl TransactionKind {
    pub fn is_ask(&self) -> bool {
        match self {
            TransactionKind::AskPlaced | TransactionKind::AskFilled => true,
            TransactionKind::BidPlaced | TransactionKind::BidFilled => false
        }
    }
}

/// Per-user activity summary over a transaction history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradingStats {
    pub total: usize,
    /// Placed and filled asks.
    pub asks: usize,
    /// Placed and filled bids.
    pub bids: usize,
    /// Sum of `amount * price` over bid rows.
    pub money_spent: f64,
    pub asks_by_product: BTreeMap<String, usize>,
    pub bids_by_product: BTreeMap<String, usize>
}

impl TradingStats {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let mut stats = Self {
            total: transactions.len(),
            ..Self::default()
        };

        for tx in transactions {
            if tx.kind.is_ask() {
                stats.asks += 1;
                *stats.asks_by_product.entry(tx.product.clone()).or_insert(0) += 1;
            } else {
                stats.bids += 1;
                *stats.bids_by_product.entry(tx.product.clone()).or_insert(0) += 1;
                stats.money_spent += tx.amount * tx.price;
            }
        }
        stats
    }
}

pub trait TransactionLog {
    fn record(&mut self, tx: &Transaction) -> ExchangeResult<()>;
}

#[derive(Debug, Default)]
pub struct MemoryLedger {
    pub transactions: Vec<Transaction>
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_user(&self, username: &str) -> Vec<&Transaction> {
        self.transactions.iter().filter(|t| t.username == username).collect()
    }
}

impl TransactionLog for MemoryLedger {
    fn record(&mut self, tx: &Transaction) -> ExchangeResult<()> {
        self.transactions.push(tx.clone());
        Ok(())
    }
}

pub struct CsvLedger {
    path: PathBuf,
    writer: Writer<File>
}

impl CsvLedger {
    pub fn open<P: AsRef<Path>>(path: P) -> ExchangeResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let writer = WriterBuilder::new().has_headers(false).from_writer(file);
        Ok(Self { path, writer })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read_user<P: AsRef<Path>>(path: P, username: &str) -> ExchangeResult<Vec<Transaction>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .from_path(path)?;

        let mut history = Vec::new();
        for row in reader.deserialize::<Transaction>() {
            let tx = row?;
            if tx.username == username {
                history.push(tx);
            }
        }
        Ok(history)
    }

    pub fn read_user_recent<P: AsRef<Path>>(path: P, username: &str, limit: usize) -> ExchangeResult<Vec<Transaction>> {
        let mut history = Self::read_user(path, username)?;
        let start = history.len().saturating_sub(limit);
        Ok(history.split_off(start))
    }
}

impl TransactionLog for CsvLedger {
    fn record(&mut self, tx: &Transaction) -> ExchangeResult<()> {
        self.writer.serialize(tx)?;
        self.writer.flush().map_err(ExchangeError::Io)?;
        debug!("Recorded {:?} for {} in {}", tx.kind, tx.username, self.path.display());
        Ok(())
    }
}
