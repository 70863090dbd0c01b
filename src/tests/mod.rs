mod config;
mod ledger;
mod report;
mod timeline;

use crate::data::{OrderEntry, OrderSide};

pub const T1: &str = "2020/03/17 17:01:24.884492";
pub const T2: &str = "2020/03/17 17:01:30.099017";
pub const T3: &str = "2020/03/17 17:01:55.120438";

pub fn order(price: f64, amount: f64, timestamp: &str, side: OrderSide) -> OrderEntry {
    OrderEntry::new(price, amount, timestamp, "ETH/BTC", side, "dataset")
}

pub fn owned(price: f64, amount: f64, side: OrderSide, owner: &str) -> OrderEntry {
    OrderEntry::new(price, amount, T1, "X", side, owner)
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
