use std::fmt::Write;
use crate::{data::Candlestick, exchange::{ProductStats, StepReport}, ledger::TradingStats};

pub fn candlestick_table(candles: &[Candlestick]) -> String {
    if candles.is_empty() {
        return "No data available for this product.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "{:<15}{:>12}{:>12}{:>12}{:>12}", "Date", "Open", "High", "Low", "Close");
    let _ = writeln!(out, "{}", "-".repeat(63));

    for c in candles {
        let _ = writeln!(
            out,
            "{:<15}{:>12.6}{:>12.6}{:>12.6}{:>12.6}",
            c.date, c.open, c.high, c.low, c.close
        );
    }

    let _ = writeln!(out, "\nTotal records: {}", candles.len());
    out
}

/// One JSON object per line.
pub fn to_json_lines(candles: &[Candlestick]) -> serde_json::Result<String> {
    let mut out = String::new();
    for candle in candles {
        out.push_str(&serde_json::to_string(candle)?);
        out.push('\n');
    }
    Ok(out)
}

pub fn market_stats(stats: &[ProductStats]) -> String {
    let mut out = String::new();

    for s in stats {
        let _ = writeln!(out, "--- {} ---", s.product);
        let _ = writeln!(out, "Asks available: {}", s.asks);
        if let (Some(max), Some(min)) = (s.max_ask, s.min_ask) {
            let _ = writeln!(out, "  Max ask: {:.8}", max);
            let _ = writeln!(out, "  Min ask: {:.8}", min);
        }
        let _ = writeln!(out, "Bids available: {}", s.bids);
        if let (Some(max), Some(min)) = (s.max_bid, s.min_bid) {
            let _ = writeln!(out, "  Max bid: {:.8}", max);
            let _ = writeln!(out, "  Min bid: {:.8}", min);
        }
    }
    out
}

pub fn step_summary(step: &StepReport) -> String {
    let traded: f64 = step.sales
        .iter()
        .filter(|s| s.side == crate::data::OrderSide::AskSale)
        .map(|s| s.amount)
        .sum();

    format!(
        "{} -> {}: {} sales, traded {:.8}, settled {} for user{}",
        step.timestamp,
        step.next_timestamp,
        step.sales.len(),
        traded,
        step.settled,
        if step.wrapped { " (wrapped)" } else { "" }
    )
}

pub fn trading_stats(stats: &TradingStats) -> String {
    if stats.total == 0 {
        return "No trading activity yet.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "Total Transactions: {}", stats.total);
    let _ = writeln!(out, "Total Asks (Sell Orders): {}", stats.asks);
    let _ = writeln!(out, "Total Bids (Buy Orders): {}", stats.bids);
    let _ = writeln!(out, "Total Money Spent: {:.2}", stats.money_spent);

    let _ = writeln!(out, "\n--- Asks by Product ---");
    for (product, count) in &stats.asks_by_product {
        let _ = writeln!(out, "{}: {} asks", product, count);
    }
    let _ = writeln!(out, "\n--- Bids by Product ---");
    for (product, count) in &stats.bids_by_product {
        let _ = writeln!(out, "{}: {} bids", product, count);
    }
    out
}
