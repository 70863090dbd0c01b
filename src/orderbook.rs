use std::{collections::{BTreeMap, BTreeSet, HashMap}, ops::Bound};
use tracing::{debug, warn};
use crate::{data::{OrderEntry, OrderSide}, error::{ExchangeError, ExchangeResult}};

pub type OrderId = u64;

/// Remainders at or below this fraction of the pre-fill amount count as filled.
pub const DUST_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct BookKey {
    side: OrderSide,
    product: String,
    timestamp: String
}

impl BookKey {
    fn new(side: OrderSide, product: &str, timestamp: &str) -> Self {
        Self {
            side,
            product: product.to_string(),
            timestamp: timestamp.to_string()
        }
    }
}

/// Time-indexed store of resting orders.
///
/// Entries live in one map keyed by a monotonically increasing id, so iterating
/// it yields insertion order. The `(side, product, timestamp)` index holds ids in
/// the same order and is kept in step with every insert and removal.
#[derive(Debug, Clone, Default)]
pub struct OrderBook {
    entries: BTreeMap<OrderId, OrderEntry>,
    index: HashMap<BookKey, Vec<OrderId>>,
    timestamps: BTreeSet<String>,
    products: Vec<String>,
    next_id: OrderId
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(entry: &OrderEntry) -> ExchangeResult<()> {
        if !entry.side.is_resting() {
            return Err(ExchangeError::Validation(format!(
                "Only ask or bid orders can rest in the book, got {}", entry.side
            )));
        }

        if !(entry.price.is_finite() && entry.price > 0.0) {
            return Err(ExchangeError::Validation(format!("Price must be positive, got {}", entry.price)));
        }

        if !(entry.amount.is_finite() && entry.amount > 0.0) {
            return Err(ExchangeError::Validation(format!("Amount must be positive, got {}", entry.amount)));
        }

        if entry.product.is_empty() {
            return Err(ExchangeError::Validation("Product cannot be empty".to_string()));
        }

        if entry.timestamp.is_empty() {
            return Err(ExchangeError::Validation("Timestamp cannot be empty".to_string()));
        }

        Ok(())
    }

    pub fn insert(&mut self, entry: OrderEntry) -> ExchangeResult<OrderId> {
        if let Err(e) = Self::validate(&entry) {
            warn!("Rejected order for {} at {}: {}", entry.product, entry.timestamp, e);
            return Err(e);
        }

        let id = self.next_id;
        self.next_id += 1;

        if !self.products.iter().any(|p| *p == entry.product) {
            self.products.push(entry.product.clone());
        }
        self.timestamps.insert(entry.timestamp.clone());
        self.index
            .entry(BookKey::new(entry.side, &entry.product, &entry.timestamp))
            .or_default()
            .push(id);
        self.entries.insert(id, entry);

        Ok(id)
    }

    pub fn entries_at(&self, side: OrderSide, product: &str, timestamp: &str) -> Vec<OrderEntry> {
        self.resting_at(side, product, timestamp)
            .into_iter()
            .map(|(_, entry)| entry)
            .collect()
    }

    /// Every entry for the product and side across all timestamps, in insertion order.
    pub fn entries_for(&self, side: OrderSide, product: &str) -> Vec<OrderEntry> {
        self.entries
            .values()
            .filter(|e| e.side == side && e.product == product)
            .cloned()
            .collect()
    }

    pub fn get(&self, id: OrderId) -> Option<&OrderEntry> {
        self.entries.get(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn known_products(&self) -> &[String] {
        &self.products
    }

    pub fn earliest_timestamp(&self) -> Option<&str> {
        self.timestamps.iter().next().map(String::as_str)
    }

    pub fn latest_timestamp(&self) -> Option<&str> {
        self.timestamps.iter().next_back().map(String::as_str)
    }

    /// Smallest timestamp strictly after `current`, wrapping to the earliest one.
    pub fn next_timestamp(&self, current: &str) -> Option<String> {
        let after = self.timestamps
            .range::<str, _>((Bound::Excluded(current), Bound::Unbounded))
            .next();

        match after {
            Some(ts) => Some(ts.clone()),
            None => self.earliest_timestamp().map(str::to_string)
        }
    }

    pub fn timestamps(&self) -> impl Iterator<Item = &str> {
        self.timestamps.iter().map(String::as_str)
    }

    pub fn timestamp_count(&self) -> usize {
        self.timestamps.len()
    }

    pub fn timestamp_index(&self, timestamp: &str) -> Option<usize> {
        if !self.timestamps.contains(timestamp) {
            return None;
        }
        Some(self.timestamps.range::<str, _>((Bound::Unbounded, Bound::Excluded(timestamp))).count())
    }

    pub fn high_price(entries: &[OrderEntry]) -> ExchangeResult<f64> {
        entries
            .iter()
            .map(|e| e.price)
            .reduce(f64::max)
            .ok_or_else(|| ExchangeError::EmptyInput("high price of an empty order set".to_string()))
    }

    pub fn low_price(entries: &[OrderEntry]) -> ExchangeResult<f64> {
        entries
            .iter()
            .map(|e| e.price)
            .reduce(f64::min)
            .ok_or_else(|| ExchangeError::EmptyInput("low price of an empty order set".to_string()))
    }

    pub(crate) fn resting_at(&self, side: OrderSide, product: &str, timestamp: &str) -> Vec<(OrderId, OrderEntry)> {
        let key = BookKey::new(side, product, timestamp);
        match self.index.get(&key) {
            Some(ids) => ids
                .iter()
                .map(|id| {
                    let entry = self.entries.get(id)
                        .unwrap_or_else(|| panic!("order book index points at missing order {}", id));
                    (*id, entry.clone())
                })
                .collect(),
            None => Vec::new()
        }
    }

    /// Takes `filled` off a resting order, removing it once nothing remains.
    /// A remainder within [`DUST_TOLERANCE`] of the pre-fill amount is float
    /// residue and also removes the order. Returns the remaining amount, `0.0`
    /// once removed.
    ///
    /// Panics if the order is not in the book.
    pub(crate) fn reduce_amount(&mut self, id: OrderId, filled: f64) -> f64 {
        let entry = match self.entries.get_mut(&id) {
            Some(entry) => entry,
            None => panic!("settlement references order {} which is no longer in the book", id)
        };
        assert!(
            filled <= entry.amount,
            "order {} filled for {} but only {} was resting", id, filled, entry.amount
        );

        let before = entry.amount;
        entry.amount -= filled;

        if entry.amount <= before * DUST_TOLERANCE {
            self.remove(id);
            return 0.0;
        }
        entry.amount
    }

    fn remove(&mut self, id: OrderId) {
        let Some(entry) = self.entries.remove(&id) else {
            panic!("cannot remove order {}: not in the book", id);
        };

        let key = BookKey::new(entry.side, &entry.product, &entry.timestamp);
        if let Some(ids) = self.index.get_mut(&key) {
            ids.retain(|x| *x != id);
            if ids.is_empty() {
                self.index.remove(&key);
            }
        }
        debug!("Removed filled {} order {} for {}", entry.side, id, entry.product);
    }
}
