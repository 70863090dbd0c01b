use std::{collections::BTreeMap, fmt};
use tracing::debug;
use crate::{data::{OrderEntry, OrderSide}, error::{ExchangeError, ExchangeResult}};

/// Holdings the exchange checks orders against and settles sales into.
pub trait Settlement {
    fn can_fulfil(&self, order: &OrderEntry) -> bool;
    fn settle(&mut self, sale: &OrderEntry) -> ExchangeResult<()>;
    fn balance(&self, currency: &str) -> f64;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Wallet {
    currencies: BTreeMap<String, f64>
}

impl Wallet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_balances<I, S>(balances: I) -> ExchangeResult<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>
    {
        let mut wallet = Self::new();
        for (currency, amount) in balances {
            let currency = currency.into();
            if amount < 0.0 {
                return Err(ExchangeError::Validation(format!("Negative balance for {}: {}", currency, amount)));
            }
            if amount > 0.0 {
                wallet.deposit(&currency, amount)?;
            }
        }
        Ok(wallet)
    }

    pub fn deposit(&mut self, currency: &str, amount: f64) -> ExchangeResult<()> {
        if !(amount.is_finite() && amount > 0.0) {
            return Err(ExchangeError::Validation(format!("Deposit amount must be positive, got {}", amount)));
        }
        *self.currencies.entry(currency.to_string()).or_insert(0.0) += amount;
        Ok(())
    }

    pub fn withdraw(&mut self, currency: &str, amount: f64) -> ExchangeResult<()> {
        if !(amount.is_finite() && amount > 0.0) {
            return Err(ExchangeError::Validation(format!("Withdrawal amount must be positive, got {}", amount)));
        }
        if !self.contains(currency, amount) {
            return Err(ExchangeError::Validation(format!(
                "Insufficient {} balance: have {}, need {}", currency, self.balance_of(currency), amount
            )));
        }
        if let Some(balance) = self.currencies.get_mut(currency) {
            *balance -= amount;
        }
        Ok(())
    }

    pub fn contains(&self, currency: &str, amount: f64) -> bool {
        self.balance_of(currency) >= amount
    }

    pub fn balance_of(&self, currency: &str) -> f64 {
        self.currencies.get(currency).copied().unwrap_or(0.0)
    }

    pub fn balances(&self) -> &BTreeMap<String, f64> {
        &self.currencies
    }

    fn transfer(&mut self, outgoing: (&str, f64), incoming: (&str, f64)) -> ExchangeResult<()> {
        self.withdraw(outgoing.0, outgoing.1)?;
        self.deposit(incoming.0, incoming.1)
    }
}

impl Settlement for Wallet {
    fn can_fulfil(&self, order: &OrderEntry) -> bool {
        let Some((base, quote)) = order.currencies() else {
            return false;
        };

        match order.side {
            OrderSide::Ask => self.contains(base, order.amount),
            OrderSide::Bid => self.contains(quote, order.amount * order.price),
            OrderSide::AskSale | OrderSide::BidSale => false
        }
    }

    fn settle(&mut self, sale: &OrderEntry) -> ExchangeResult<()> {
        let (base, quote) = sale.currencies()
            .ok_or_else(|| ExchangeError::Validation(format!("Product '{}' is not BASE/QUOTE", sale.product)))?;
        let value = sale.amount * sale.price;

        match sale.side {
            OrderSide::AskSale => self.transfer((base, sale.amount), (quote, value))?,
            OrderSide::BidSale => self.transfer((quote, value), (base, sale.amount))?,
            OrderSide::Ask | OrderSide::Bid => {
                return Err(ExchangeError::Validation(format!(
                    "Cannot settle a resting {} order", sale.side
                )));
            }
        }

        debug!("Settled {} {} {} @ {}", sale.side, sale.amount, sale.product, sale.price);
        Ok(())
    }

    fn balance(&self, currency: &str) -> f64 {
        self.balance_of(currency)
    }
}

impl fmt::Display for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (currency, amount) in &self.currencies {
            writeln!(f, "{} : {}", currency, amount)?;
        }
        Ok(())
    }
}
