use crate::orderbook::OrderBook;

/// Position of the simulation within the book's fixed set of timestamps.
/// The replay is cyclic: advancing past the last timestamp returns to the first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayClock {
    current: String,
    index: usize,
    cycles: usize
}

impl ReplayClock {
    /// Clock at the book's earliest timestamp, `None` for an empty book.
    pub fn start(book: &OrderBook) -> Option<Self> {
        let earliest = book.earliest_timestamp()?;
        Some(Self {
            current: earliest.to_string(),
            index: 0,
            cycles: 0
        })
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Times the replay has wrapped back to the epoch.
    pub fn cycles(&self) -> usize {
        self.cycles
    }

    /// Moves to the next timestamp and reports whether the move wrapped.
    pub fn advance(&mut self, book: &OrderBook) -> bool {
        let Some(next) = book.next_timestamp(&self.current) else {
            return false;
        };

        let wrapped = next.as_str() <= self.current.as_str();
        if wrapped {
            self.cycles += 1;
        }

        self.index = book.timestamp_index(&next).unwrap_or(0);
        self.current = next;
        wrapped
    }
}

/// First timestamp from `start` onwards that satisfies `pred`.
///
/// Visits each distinct timestamp at most once and stops at the wrap, so an
/// all-empty book terminates.
pub fn scan_forward<F>(book: &OrderBook, start: &str, mut pred: F) -> Option<String>
where
    F: FnMut(&str) -> bool
{
    let mut timestamp = start.to_string();

    for _ in 0..book.timestamp_count() {
        if pred(&timestamp) {
            return Some(timestamp);
        }

        let next = book.next_timestamp(&timestamp)?;
        if next <= timestamp {
            break;
        }
        timestamp = next;
    }
    None
}
