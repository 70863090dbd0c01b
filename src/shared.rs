use std::sync::Arc;
use tokio::sync::RwLock;
use crate::{
    data::{OrderEntry, OrderSide},
    error::ExchangeResult,
    orderbook::{OrderBook, OrderId}
};

/// Order book handle for concurrent callers. Mutations take the write lock,
/// queries share the read lock.
#[derive(Debug, Clone, Default)]
pub struct SharedOrderBook {
    inner: Arc<RwLock<OrderBook>>
}

impl SharedOrderBook {
    pub fn new(book: OrderBook) -> Self {
        Self { inner: Arc::new(RwLock::new(book)) }
    }

    pub async fn insert(&self, entry: OrderEntry) -> ExchangeResult<OrderId> {
        let mut book = self.inner.write().await;
        book.insert(entry)
    }

    pub async fn match_asks_to_bids(&self, product: &str, timestamp: &str) -> Vec<OrderEntry> {
        let mut book = self.inner.write().await;
        book.match_asks_to_bids(product, timestamp)
    }

    pub async fn entries_at(&self, side: OrderSide, product: &str, timestamp: &str) -> Vec<OrderEntry> {
        let book = self.inner.read().await;
        book.entries_at(side, product, timestamp)
    }

    pub async fn known_products(&self) -> Vec<String> {
        let book = self.inner.read().await;
        book.known_products().to_vec()
    }

    pub async fn earliest_timestamp(&self) -> Option<String> {
        let book = self.inner.read().await;
        book.earliest_timestamp().map(str::to_string)
    }

    pub async fn next_timestamp(&self, current: &str) -> Option<String> {
        let book = self.inner.read().await;
        book.next_timestamp(current)
    }

    pub async fn high_price(&self, side: OrderSide, product: &str, timestamp: &str) -> ExchangeResult<f64> {
        let book = self.inner.read().await;
        OrderBook::high_price(&book.entries_at(side, product, timestamp))
    }

    pub async fn low_price(&self, side: OrderSide, product: &str, timestamp: &str) -> ExchangeResult<f64> {
        let book = self.inner.read().await;
        OrderBook::low_price(&book.entries_at(side, product, timestamp))
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn snapshot(&self) -> OrderBook {
        self.inner.read().await.clone()
    }
}
