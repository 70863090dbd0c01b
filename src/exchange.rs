use rand::Rng;
use tracing::{error, info, warn};
use crate::{
    candlestick::CandlestickAggregator,
    data::{Candlestick, OrderEntry, OrderSide, Period},
    error::{ErrorHandler, ExchangeError, ExchangeResult},
    ledger::{Transaction, TransactionKind, TransactionLog},
    orderbook::OrderBook,
    timeline::{scan_forward, ReplayClock},
    wallet::Settlement
};

#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    pub timestamp: String,
    pub next_timestamp: String,
    pub wrapped: bool,
    pub sales: Vec<OrderEntry>,
    pub settled: usize,
    /// Settled user sales whose ledger row could not be written.
    pub unrecorded: Vec<OrderEntry>
}

/// Orders placed by [`Exchange::simulate_orders`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulationSummary {
    pub placed: Vec<OrderEntry>,
    pub rejected: usize
}

pub const SIMULATED_ORDERS_PER_SIDE: usize = 5;

/// Five years of 15% annual growth, applied to 2020 feed prices.
pub const GROWTH_FACTOR: f64 = 1.15 * 1.15 * 1.15 * 1.15 * 1.15;

/// Ask price used for a product with no resting asks in the feed.
pub fn fallback_price(product: &str) -> f64 {
    if product.contains("DOGE") {
        0.15
    } else if product.contains("BTC") {
        50000.0
    } else if product.contains("ETH") {
        3000.0
    } else {
        100.0
    }
}

/// Average ask `reference` grown by [`GROWTH_FACTOR`] with a -5%..+5% jitter.
/// Without a reference the product's [`fallback_price`] is used as is.
pub fn simulated_ask_price<R: Rng + ?Sized>(reference: Option<f64>, product: &str, rng: &mut R) -> f64 {
    match reference {
        Some(average) => {
            let variation = 0.95 + rng.gen_range(0..100u32) as f64 / 1000.0;
            average * GROWTH_FACTOR * variation
        }
        None => fallback_price(product)
    }
}

/// A fresh ask price less a 0.1%..3% spread.
pub fn simulated_bid_price<R: Rng + ?Sized>(reference: Option<f64>, product: &str, rng: &mut R) -> f64 {
    let ask = simulated_ask_price(reference, product, rng);
    let spread = 0.97 + rng.gen_range(0..30u32) as f64 / 1000.0;
    ask * spread
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductStats {
    pub product: String,
    pub asks: usize,
    pub bids: usize,
    pub max_ask: Option<f64>,
    pub min_ask: Option<f64>,
    pub max_bid: Option<f64>,
    pub min_bid: Option<f64>
}

/// Replay driver: owns the book, the clock and one user's wallet and ledger.
pub struct Exchange<W: Settlement, L: TransactionLog> {
    book: OrderBook,
    clock: ReplayClock,
    user: String,
    wallet: W,
    ledger: L
}

impl<W: Settlement, L: TransactionLog> Exchange<W, L> {
    pub fn new(book: OrderBook, user: impl Into<String>, wallet: W, ledger: L) -> ExchangeResult<Self> {
        let clock = ReplayClock::start(&book)
            .ok_or_else(|| ExchangeError::EmptyInput("order book has no timestamps to replay".to_string()))?;

        Ok(Self {
            book,
            clock,
            user: user.into(),
            wallet,
            ledger
        })
    }

    pub fn book(&self) -> &OrderBook {
        &self.book
    }

    pub fn clock(&self) -> &ReplayClock {
        &self.clock
    }

    pub fn current_timestamp(&self) -> &str {
        self.clock.current()
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn wallet(&self) -> &W {
        &self.wallet
    }

    pub fn wallet_mut(&mut self) -> &mut W {
        &mut self.wallet
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Places a user order at the current timestamp so it joins the next auction.
    pub fn place_order(&mut self, side: OrderSide, product: &str, price: f64, amount: f64) -> ExchangeResult<OrderEntry> {
        let kind = TransactionKind::placed(side)
            .ok_or_else(|| ExchangeError::Validation(format!("Cannot place a {} order", side)))?;
        let entry = OrderEntry::new(price, amount, self.clock.current(), product, side, self.user.clone());
        OrderBook::validate(&entry)?;

        if !self.wallet.can_fulfil(&entry) {
            warn!("Insufficient funds for {} {} {} @ {}", side, amount, product, price);
            return Err(ExchangeError::Validation(format!(
                "Insufficient funds for {} {} {} @ {}", side, amount, product, price
            )));
        }

        let committed = match (entry.currencies(), side) {
            (Some((base, _)), OrderSide::Ask) => self.wallet.balance(base),
            (Some((_, quote)), OrderSide::Bid) => self.wallet.balance(quote),
            _ => 0.0
        };
        // ledger first: a failed write must leave the book untouched
        self.ledger.record(&Transaction {
            username: self.user.clone(),
            timestamp: entry.timestamp.clone(),
            kind,
            product: entry.product.clone(),
            amount,
            price,
            balance_after: committed
        })?;
        self.book.insert(entry.clone())?;

        info!("Placed {} {} {} @ {} at {}", side, amount, product, price, entry.timestamp);
        Ok(entry)
    }

    /// Runs the batch auction for every product at the current timestamp,
    /// settles the user's sales, moves the clock on, then writes ledger rows.
    ///
    /// Book, wallet and clock always move together. Sales whose ledger row
    /// fails to write are returned in [`StepReport::unrecorded`].
    pub fn advance(&mut self) -> ExchangeResult<StepReport> {
        let timestamp = self.clock.current().to_string();
        let products = self.book.known_products().to_vec();
        let user = self.user.clone();
        let mut sales = Vec::new();
        let mut settled_sales = Vec::new();

        for product in &products {
            let matched = self.book.match_asks_to_bids(product, &timestamp);

            for sale in matched.iter().filter(|s| s.owner == user) {
                match self.wallet.settle(sale) {
                    Ok(()) => settled_sales.push((sale.clone(), self.received_balance(sale))),
                    Err(e) => warn!("Could not settle {} for {}: {}", sale.side, sale.product, e)
                }
            }
            sales.extend(matched);
        }

        let wrapped = self.clock.advance(&self.book);
        if wrapped {
            info!("Replay wrapped to {} (cycle {})", self.clock.current(), self.clock.cycles());
        }

        let mut unrecorded = Vec::new();
        for (sale, balance_after) in &settled_sales {
            if let Err(e) = self.record_sale(sale, *balance_after) {
                error!("Ledger write failed for {} {} @ {}: {}", sale.side, sale.product, sale.price, e);
                unrecorded.push(sale.clone());
            }
        }

        Ok(StepReport {
            timestamp,
            next_timestamp: self.clock.current().to_string(),
            wrapped,
            sales,
            settled: settled_sales.len(),
            unrecorded
        })
    }

    /// Places [`SIMULATED_ORDERS_PER_SIDE`] asks and bids for every known product
    /// at the current timestamp. Amounts run 0.1, 0.15, .. and prices come from
    /// [`simulated_ask_price`] and [`simulated_bid_price`] over the product's
    /// [`Exchange::reference_price`], taken before any simulated order rests.
    ///
    /// Orders the wallet cannot cover are counted as rejected.
    pub fn simulate_orders<R: Rng + ?Sized>(&mut self, rng: &mut R) -> ExchangeResult<SimulationSummary> {
        let products = self.book.known_products().to_vec();
        let mut summary = SimulationSummary::default();

        for product in &products {
            let reference = self.reference_price(OrderSide::Ask, product);

            for side in [OrderSide::Ask, OrderSide::Bid] {
                for i in 0..SIMULATED_ORDERS_PER_SIDE {
                    let amount = 0.1 + i as f64 * 0.05;
                    let price = match side {
                        OrderSide::Bid => simulated_bid_price(reference, product, rng),
                        _ => simulated_ask_price(reference, product, rng)
                    };

                    match self.place_order(side, product, price, amount) {
                        Ok(entry) => summary.placed.push(entry),
                        Err(e) if ErrorHandler::is_recoverable(&e) => summary.rejected += 1,
                        Err(e) => return Err(e)
                    }
                }
            }
        }

        info!(
            "Simulated {} orders across {} products, {} rejected",
            summary.placed.len(), products.len(), summary.rejected
        );
        Ok(summary)
    }

    fn received_balance(&self, sale: &OrderEntry) -> f64 {
        match (sale.currencies(), sale.side) {
            (Some((_, quote)), OrderSide::AskSale) => self.wallet.balance(quote),
            (Some((base, _)), OrderSide::BidSale) => self.wallet.balance(base),
            _ => 0.0
        }
    }

    fn record_sale(&mut self, sale: &OrderEntry, received: f64) -> ExchangeResult<()> {
        let Some(kind) = TransactionKind::filled(sale.side) else {
            return Ok(());
        };

        self.ledger.record(&Transaction {
            username: self.user.clone(),
            timestamp: sale.timestamp.clone(),
            kind,
            product: sale.product.clone(),
            amount: sale.amount,
            price: sale.price,
            balance_after: received
        })
    }

    pub fn market_stats(&self) -> Vec<ProductStats> {
        let timestamp = self.clock.current();

        self.book
            .known_products()
            .iter()
            .map(|product| {
                let asks = self.book.entries_at(OrderSide::Ask, product, timestamp);
                let bids = self.book.entries_at(OrderSide::Bid, product, timestamp);

                ProductStats {
                    product: product.clone(),
                    asks: asks.len(),
                    bids: bids.len(),
                    max_ask: OrderBook::high_price(&asks).ok(),
                    min_ask: OrderBook::low_price(&asks).ok(),
                    max_bid: OrderBook::high_price(&bids).ok(),
                    min_bid: OrderBook::low_price(&bids).ok()
                }
            })
            .collect()
    }

    /// Ask and bid candlesticks over the product's full history.
    pub fn candlesticks(&self, product: &str, period: Period) -> (Vec<Candlestick>, Vec<Candlestick>) {
        let asks = self.book.entries_for(OrderSide::Ask, product);
        let bids = self.book.entries_for(OrderSide::Bid, product);

        (
            CandlestickAggregator::aggregate(&asks, product, period, OrderSide::Ask),
            CandlestickAggregator::aggregate(&bids, product, period, OrderSide::Bid)
        )
    }

    /// Average price at the first timestamp from the epoch that has orders on `side`.
    pub fn reference_price(&self, side: OrderSide, product: &str) -> Option<f64> {
        let epoch = self.book.earliest_timestamp()?;
        let timestamp = scan_forward(&self.book, epoch, |ts| {
            !self.book.entries_at(side, product, ts).is_empty()
        })?;

        let entries = self.book.entries_at(side, product, &timestamp);
        let total: f64 = entries.iter().map(|e| e.price).sum();
        Some(total / entries.len() as f64)
    }
}
