use std::{fs::File, io::Read, path::Path};
use chrono::NaiveDateTime;
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, info, warn};
use crate::{
    data::{OrderEntry, OrderSide},
    error::{ExchangeError, ExchangeResult},
    orderbook::OrderBook
};

pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S%.f";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedSummary {
    pub loaded: usize,
    pub skipped: usize
}

/// Loader for the historical `timestamp,product,side,price,amount` feed.
pub struct FeedLoader;

impl FeedLoader {
    pub fn load_path<P: AsRef<Path>>(path: P, owner: &str) -> ExchangeResult<(OrderBook, FeedSummary)> {
        let path = path.as_ref();
        let file = File::open(path)?;
        info!("Loading historical feed from {}", path.display());
        Self::load_reader(file, owner)
    }

    pub fn load_reader<R: Read>(reader: R, owner: &str) -> ExchangeResult<(OrderBook, FeedSummary)> {
        let mut book = OrderBook::new();
        let summary = Self::load_into(&mut book, reader, owner)?;
        Ok((book, summary))
    }

    /// Appends every well-formed row to `book`. Rows that fail to parse or validate
    /// are skipped; only I/O failures abort the load.
    pub fn load_into<R: Read>(book: &mut OrderBook, reader: R, owner: &str) -> ExchangeResult<FeedSummary> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);
        let mut summary = FeedSummary::default();

        for (row, result) in reader.records().enumerate() {
            let record = match result {
                Ok(record) => record,
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => {
                    debug!("Skipped unreadable feed row {}: {}", row + 1, e);
                    summary.skipped += 1;
                    continue;
                }
            };
            let line = record.position().map(|p| p.line()).unwrap_or(row as u64 + 1);

            let inserted = Self::parse_record(&record, line, owner)
                .and_then(|entry| book.insert(entry).map_err(|e| ExchangeError::MalformedRecord {
                    line,
                    reason: e.to_string()
                }));

            match inserted {
                Ok(_) => summary.loaded += 1,
                Err(e) => {
                    debug!("{}", e);
                    summary.skipped += 1;
                }
            }
        }

        if summary.skipped > 0 {
            warn!("Skipped {} malformed feed rows", summary.skipped);
        }
        info!(
            "Loaded {} orders across {} products and {} timeframes",
            summary.loaded, book.known_products().len(), book.timestamp_count()
        );
        Ok(summary)
    }

    pub fn parse_record(record: &StringRecord, line: u64, owner: &str) -> ExchangeResult<OrderEntry> {
        let malformed = |reason: String| ExchangeError::MalformedRecord { line, reason };

        if record.len() != 5 {
            return Err(malformed(format!("expected 5 fields, found {}", record.len())));
        }

        let timestamp = &record[0];
        NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT)
            .map_err(|e| malformed(format!("bad timestamp '{}': {}", timestamp, e)))?;

        let product = &record[1];
        if product.is_empty() {
            return Err(malformed("empty product".to_string()));
        }

        let side = match &record[2] {
            "ask" => OrderSide::Ask,
            "bid" => OrderSide::Bid,
            other => return Err(malformed(format!("unknown side '{}'", other)))
        };

        let price: f64 = record[3]
            .parse()
            .map_err(|_| malformed(format!("bad price '{}'", &record[3])))?;
        let amount: f64 = record[4]
            .parse()
            .map_err(|_| malformed(format!("bad amount '{}'", &record[4])))?;

        Ok(OrderEntry::new(price, amount, timestamp, product, side, owner))
    }
}
