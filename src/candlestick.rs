use std::collections::HashMap;
use crate::data::{Candlestick, OrderEntry, OrderSide, Period};

/// OHLC aggregation over order entries.
pub struct CandlestickAggregator;

impl CandlestickAggregator {
    /// Period key from a `YYYY/MM/DD HH:MM:SS.ffffff` timestamp.
    /// Timestamps too short to hold a date are returned unchanged.
    pub fn period_key(timestamp: &str, period: Period) -> String {
        let (Some(year), Some(month), Some(day)) = (
            timestamp.get(0..4),
            timestamp.get(5..7),
            timestamp.get(8..10)
        ) else {
            return timestamp.to_string();
        };

        match period {
            Period::Daily => format!("{}-{}-{}", year, month, day),
            Period::Monthly => format!("{}-{}", year, month),
            Period::Yearly => year.to_string()
        }
    }

    /// Groups matching entries by period key. Groups appear in first-seen order
    /// and each keeps the relative order of its entries.
    pub fn group_by_period<'a>(
        entries: &'a [OrderEntry],
        product: &str,
        side: OrderSide,
        period: Period
    ) -> Vec<(String, Vec<&'a OrderEntry>)> {
        let mut groups: Vec<(String, Vec<&OrderEntry>)> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for entry in entries.iter().filter(|e| e.product == product && e.side == side) {
            let key = Self::period_key(&entry.timestamp, period);
            match positions.get(&key) {
                Some(&pos) => groups[pos].1.push(entry),
                None => {
                    positions.insert(key.clone(), groups.len());
                    groups.push((key, vec![entry]));
                }
            }
        }
        groups
    }

    pub fn aggregate(entries: &[OrderEntry], product: &str, period: Period, side: OrderSide) -> Vec<Candlestick> {
        let mut candles: Vec<Candlestick> = Self::group_by_period(entries, product, side, period)
            .into_iter()
            .filter_map(|(date, group)| {
                let first = group.first()?;
                let last = group.last()?;
                // open/close follow arrival order within the group
                let high = group.iter().map(|e| e.price).fold(first.price, f64::max);
                let low = group.iter().map(|e| e.price).fold(first.price, f64::min);

                Some(Candlestick {
                    date,
                    open: first.price,
                    high,
                    low,
                    close: last.price,
                    product: product.to_string(),
                    side
                })
            })
            .collect();

        candles.sort_by(|a, b| a.date.cmp(&b.date));
        candles
    }
}
