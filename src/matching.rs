use tracing::{debug, info};
use crate::{data::{OrderEntry, OrderSide}, orderbook::OrderBook};

/// Batch auction over the asks and bids resting at one timestamp.
pub struct MatchingEngine;

impl MatchingEngine {
    /// Pairs crossing asks and bids for `product` at `timestamp`.
    ///
    /// Asks are walked cheapest first and bids highest first. Equal prices keep
    /// their insertion order. Each trade emits an `AskSale` at the ask's price and
    /// a `BidSale` at the bid's price for the same amount. Filled orders leave the
    /// book and partially filled ones stay with their reduced amount.
    pub fn match_asks_to_bids(book: &mut OrderBook, product: &str, timestamp: &str) -> Vec<OrderEntry> {
        let mut asks = book.resting_at(OrderSide::Ask, product, timestamp);
        let mut bids = book.resting_at(OrderSide::Bid, product, timestamp);
        let mut sales = Vec::new();

        if asks.is_empty() || bids.is_empty() {
            debug!("Nothing to match for {} at {}: {} asks, {} bids", product, timestamp, asks.len(), bids.len());
            return sales;
        }

        asks.sort_by(|a, b| a.1.price.total_cmp(&b.1.price));
        bids.sort_by(|a, b| b.1.price.total_cmp(&a.1.price));

        let mut a = 0;
        let mut b = 0;
        let mut traded = 0.0;

        while a < asks.len() && b < bids.len() {
            let (ask_id, ask_price, ask_amount) = (asks[a].0, asks[a].1.price, asks[a].1.amount);
            let (bid_id, bid_price, bid_amount) = (bids[b].0, bids[b].1.price, bids[b].1.amount);

            if ask_price > bid_price {
                break;
            }

            let matched = ask_amount.min(bid_amount);

            sales.push(OrderEntry::new(
                ask_price,
                matched,
                timestamp,
                product,
                OrderSide::AskSale,
                asks[a].1.owner.clone()
            ));
            sales.push(OrderEntry::new(
                bid_price,
                matched,
                timestamp,
                product,
                OrderSide::BidSale,
                bids[b].1.owner.clone()
            ));
            debug!("Trade {} {} @ ask {} / bid {}", product, matched, ask_price, bid_price);

            traded += matched;
            asks[a].1.amount = book.reduce_amount(ask_id, matched);
            bids[b].1.amount = book.reduce_amount(bid_id, matched);

            if asks[a].1.amount <= 0.0 {
                a += 1;
            }
            if bids[b].1.amount <= 0.0 {
                b += 1;
            }
        }

        if !sales.is_empty() {
            info!("Matched {} trades for {} at {}, total amount: {}", sales.len() / 2, product, timestamp, traded);
        }
        sales
    }
}

impl OrderBook {
    pub fn match_asks_to_bids(&mut self, product: &str, timestamp: &str) -> Vec<OrderEntry> {
        MatchingEngine::match_asks_to_bids(self, product, timestamp)
    }
}
