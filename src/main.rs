use std::env;
use anyhow::Context;
use rand::{rngs::StdRng, SeedableRng};
use tracing::{info, warn};
use merkel_exchange::{
    config::AppConfig,
    error::ErrorHandler,
    exchange::Exchange,
    feed::FeedLoader,
    ledger::{CsvLedger, TradingStats},
    logging::init_logging,
    report,
    wallet::Wallet
};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenv::dotenv().ok();

    let config = match env::var("CONFIG_PATH") {
        Ok(path) => AppConfig::from_file(&path).with_context(|| format!("Failed to load config from {}", path))?,
        Err(_) => AppConfig::from_env().context("Failed to load config from environment")?
    };

    init_logging(&config.logging)
        .map_err(|e| anyhow::anyhow!("Failed to initialise logging: {}", e))?;

    let feed = config.feed.clone();
    let (book, summary) = tokio::task::spawn_blocking(move || FeedLoader::load_path(&feed.path, &feed.owner))
        .await
        .context("Feed loader task panicked")?
        .with_context(|| format!("Failed to load feed {}", config.feed.path))?;
    info!("Feed ready: {} orders loaded, {} rows skipped", summary.loaded, summary.skipped);

    let wallet = Wallet::with_balances(config.wallet.balances.clone())?;
    let ledger = CsvLedger::open(&config.ledger.path)
        .with_context(|| format!("Failed to open ledger {}", config.ledger.path))?;
    let period = config.period()?;

    let mut exchange = Exchange::new(book, config.simulation.user.clone(), wallet, ledger)?;
    info!("Replay starts at {}", exchange.current_timestamp());
    println!("{}", report::market_stats(&exchange.market_stats()));

    if config.simulation.simulate_orders {
        let mut rng = StdRng::seed_from_u64(config.simulation.seed);
        let summary = exchange.simulate_orders(&mut rng)?;
        println!(
            "Simulation placed {} orders across {} products ({} rejected)",
            summary.placed.len(), exchange.book().known_products().len(), summary.rejected
        );
    }

    for _ in 0..config.simulation.steps {
        match exchange.advance() {
            Ok(step) => {
                info!("{}", report::step_summary(&step));
                if !step.unrecorded.is_empty() {
                    warn!("{} settled sales at {} are missing from the ledger", step.unrecorded.len(), step.timestamp);
                }
            }
            Err(e) if ErrorHandler::is_recoverable(&e) => {
                warn!("{}", ErrorHandler::handle_error(&e));
            }
            Err(e) => return Err(e.into())
        }
    }

    for product in exchange.book().known_products() {
        let (asks, bids) = exchange.candlesticks(product, period);
        println!("\n========== {} ASK ({}) ==========", product, period);
        print!("{}", report::candlestick_table(&asks));
        println!("\n========== {} BID ({}) ==========", product, period);
        print!("{}", report::candlestick_table(&bids));
    }

    println!("\nWallet after replay:\n{}", exchange.wallet());

    let history = CsvLedger::read_user(exchange.ledger().path(), exchange.user())
        .context("Failed to read ledger history")?;
    println!("========== USER TRADING STATISTICS ==========");
    print!("{}", report::trading_stats(&TradingStats::from_transactions(&history)));
    Ok(())
}
