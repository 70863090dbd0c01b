use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Malformed record at line {line}: {reason}")]
    MalformedRecord { line: u64, reason: String },

    #[error("Unknown order side: {0}")]
    UnknownSide(String),

    #[error("Unknown candlestick period: {0}")]
    UnknownPeriod(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl From<toml::de::Error> for ExchangeError {
    fn from(err: toml::de::Error) -> Self {
        ExchangeError::Configuration(format!("Failed to parse config file: {}", err))
    }
}

pub type ExchangeResult<T> = Result<T, ExchangeError>;

/// Error handling utilities
pub struct ErrorHandler;

impl ErrorHandler {
    /// Log error and return a user-friendly message
    pub fn handle_error(error: &ExchangeError) -> String {
        match error {
            ExchangeError::Validation(msg) => {
                tracing::warn!("Order rejected: {}", msg);
                format!("Order rejected: {}", msg)
            }
            ExchangeError::EmptyInput(msg) => {
                tracing::debug!("No data: {}", msg);
                format!("No data available: {}", msg)
            }
            ExchangeError::MalformedRecord { line, reason } => {
                tracing::debug!("Skipped feed line {}: {}", line, reason);
                format!("Skipped feed line {}: {}", line, reason)
            }
            ExchangeError::UnknownSide(side) => {
                tracing::warn!("Unknown order side: {}", side);
                format!("Unknown order side '{}', expected ask or bid", side)
            }
            ExchangeError::UnknownPeriod(period) => {
                tracing::warn!("Unknown period: {}", period);
                format!("Unknown period '{}', expected daily, monthly or yearly", period)
            }
            ExchangeError::Configuration(msg) => {
                tracing::error!("Configuration error: {}", msg);
                format!("Configuration error: {}", msg)
            }
            ExchangeError::Io(err) => {
                tracing::error!("I/O error: {}", err);
                format!("I/O error: {}", err)
            }
            ExchangeError::Csv(err) => {
                tracing::error!("CSV error: {}", err);
                format!("CSV error: {}", err)
            }
        }
    }

    /// Bad input the simulation can keep running past
    pub fn is_recoverable(error: &ExchangeError) -> bool {
        match error {
            ExchangeError::Validation(_)
            | ExchangeError::EmptyInput(_)
            | ExchangeError::MalformedRecord { .. }
            | ExchangeError::UnknownSide(_)
            | ExchangeError::UnknownPeriod(_) => true,
            ExchangeError::Configuration(_) | ExchangeError::Io(_) | ExchangeError::Csv(_) => false,
        }
    }
}
