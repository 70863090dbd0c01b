use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, env, str::FromStr};
use crate::{data::Period, error::{ExchangeError, ExchangeResult}};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    pub path: String,
    pub owner: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub user: String,
    pub steps: usize,
    pub period: String,
    /// Place the bulk simulated orders before replaying.
    #[serde(default)]
    pub simulate_orders: bool,
    /// Seed for simulated order prices.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_seed() -> u64 {
    2020
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    pub balances: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub include_target: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub feed: FeedConfig,
    pub simulation: SimulationConfig,
    pub wallet: WalletConfig,
    pub ledger: LedgerConfig,
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            feed: FeedConfig {
                path: "20200317.csv".to_string(),
                owner: "dataset".to_string(),
            },
            simulation: SimulationConfig {
                user: "simuser".to_string(),
                steps: 5,
                period: "daily".to_string(),
                simulate_orders: true,
                seed: default_seed(),
            },
            wallet: WalletConfig {
                balances: BTreeMap::from([
                    ("USDT".to_string(), 10000.0),
                    ("BTC".to_string(), 0.5),
                    ("ETH".to_string(), 5.0),
                ]),
            },
            ledger: LedgerConfig {
                path: "transactions.csv".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
                include_target: true,
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> ExchangeResult<Self> {
        dotenv::dotenv().ok();
        let mut config = Self::default();
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file, environment variables take precedence
    pub fn from_file(path: &str) -> ExchangeResult<Self> {
        dotenv::dotenv().ok();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ExchangeError::Configuration(format!("Failed to read config file: {}", e)))?;

        let mut config: AppConfig = toml::from_str(&content)?;
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save_to_file(&self, path: &str) -> ExchangeResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ExchangeError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| ExchangeError::Configuration(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    fn apply_env(&mut self) -> ExchangeResult<()> {
        if let Ok(path) = env::var("FEED_PATH") {
            self.feed.path = path;
        }

        if let Ok(owner) = env::var("FEED_OWNER") {
            self.feed.owner = owner;
        }

        if let Ok(user) = env::var("SIM_USER") {
            self.simulation.user = user;
        }

        if let Ok(steps) = env::var("SIM_STEPS") {
            self.simulation.steps = steps.parse()
                .map_err(|_| ExchangeError::Configuration("Invalid SIM_STEPS".to_string()))?;
        }

        if let Ok(period) = env::var("SIM_PERIOD") {
            self.simulation.period = period;
        }

        if let Ok(simulate) = env::var("SIM_ORDERS") {
            self.simulation.simulate_orders = simulate.parse()
                .map_err(|_| ExchangeError::Configuration("Invalid SIM_ORDERS".to_string()))?;
        }

        if let Ok(seed) = env::var("SIM_SEED") {
            self.simulation.seed = seed.parse()
                .map_err(|_| ExchangeError::Configuration("Invalid SIM_SEED".to_string()))?;
        }

        if let Ok(ledger) = env::var("LEDGER_PATH") {
            self.ledger.path = ledger;
        }

        if let Ok(level) = env::var("LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Ok(format) = env::var("LOG_FORMAT") {
            self.logging.format = format;
        }

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> ExchangeResult<()> {
        if self.feed.path.is_empty() {
            return Err(ExchangeError::Configuration("Feed path cannot be empty".to_string()));
        }

        if self.feed.owner.is_empty() {
            return Err(ExchangeError::Configuration("Feed owner cannot be empty".to_string()));
        }

        if self.simulation.user.is_empty() {
            return Err(ExchangeError::Configuration("Simulation user cannot be empty".to_string()));
        }

        self.period()?;

        if let Some((currency, amount)) = self.wallet.balances.iter().find(|(_, amount)| **amount < 0.0) {
            return Err(ExchangeError::Configuration(format!("Negative initial balance for {}: {}", currency, amount)));
        }

        if self.ledger.path.is_empty() {
            return Err(ExchangeError::Configuration("Ledger path cannot be empty".to_string()));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ExchangeError::Configuration(format!("Invalid log level: {}", self.logging.level)));
        }

        let valid_formats = ["pretty", "compact"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(ExchangeError::Configuration(format!("Invalid log format: {}", self.logging.format)));
        }

        Ok(())
    }

    pub fn period(&self) -> ExchangeResult<Period> {
        Period::from_str(&self.simulation.period)
            .map_err(|_| ExchangeError::Configuration(format!("Invalid period: {}", self.simulation.period)))
    }
}
