pub mod candlestick;
pub mod config;
pub mod data;
pub mod error;
pub mod exchange;
pub mod feed;
pub mod ledger;
pub mod logging;
pub mod matching;
pub mod orderbook;
pub mod report;
pub mod shared;
pub mod timeline;
pub mod wallet;

#[cfg(test)]
mod tests;

pub use candlestick::CandlestickAggregator;
pub use data::{Candlestick, OrderEntry, OrderSide, Period};
pub use error::{ExchangeError, ExchangeResult};
pub use exchange::{Exchange, ProductStats, SimulationSummary, StepReport};
pub use matching::MatchingEngine;
pub use orderbook::OrderBook;
