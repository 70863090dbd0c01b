use std::{fmt, str::FromStr};
use serde::{Deserialize, Serialize};
use crate::error::ExchangeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Ask,
    Bid,
    AskSale,
    BidSale
}

impl OrderSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Ask => "ask",
            OrderSide::Bid => "bid",
            OrderSide::AskSale => "asksale",
            OrderSide::BidSale => "bidsale"
        }
    }

    /// True for unfilled orders that can sit in the book.
    pub fn is_resting(&self) -> bool {
        match self {
            OrderSide::Ask | OrderSide::Bid => true,
            OrderSide::AskSale | OrderSide::BidSale => false
        }
    }

    /// The settlement leg a filled resting order turns into.
    pub fn sale_side(&self) -> Option<OrderSide> {
        match self {
            OrderSide::Ask => Some(OrderSide::AskSale),
            OrderSide::Bid => Some(OrderSide::BidSale),
            OrderSide::AskSale | OrderSide::BidSale => None
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderSide {
    type Err = ExchangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ask" => Ok(OrderSide::Ask),
            "bid" => Ok(OrderSide::Bid),
            "asksale" => Ok(OrderSide::AskSale),
            "bidsale" => Ok(OrderSide::BidSale),
            other => Err(ExchangeError::UnknownSide(other.to_string()))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderEntry {
    pub price: f64,
    pub amount: f64,
    pub timestamp: String,
    pub product: String,
    pub side: OrderSide,
    pub owner: String
}

impl OrderEntry {
    pub fn new(
        price: f64,
        amount: f64,
        timestamp: impl Into<String>,
        product: impl Into<String>,
        side: OrderSide,
        owner: impl Into<String>
    ) -> Self {
        Self {
            price,
            amount,
            timestamp: timestamp.into(),
            product: product.into(),
            side,
            owner: owner.into()
        }
    }

    /// Splits "BASE/QUOTE" into its two currencies.
    pub fn currencies(&self) -> Option<(&str, &str)> {
        let (base, quote) = self.product.split_once('/')?;
        if base.is_empty() || quote.is_empty() {
            return None;
        }
        Some((base, quote))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Daily,
    Monthly,
    Yearly
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Daily => "daily",
            Period::Monthly => "monthly",
            Period::Yearly => "yearly"
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = ExchangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(Period::Daily),
            "monthly" => Ok(Period::Monthly),
            "yearly" => Ok(Period::Yearly),
            _ => Err(ExchangeError::UnknownPeriod(s.to_string()))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candlestick {
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub product: String,
    pub side: OrderSide
}

impl fmt::Display for Candlestick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | O: {:.6} | H: {:.6} | L: {:.6} | C: {:.6}",
            self.date, self.open, self.high, self.low, self.close
        )
    }
}
