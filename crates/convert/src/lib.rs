//! Read-time currency projection over an immutable rate snapshot.
//!
//! Balances are stored in one native currency; any other currency is a
//! projection computed at read time from a rate table loaded once at startup.
//! The upstream rates API only serves EUR-based rates on its free tier, so
//! every conversion pivots through EUR.

use std::collections::HashMap;

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConvertError {
    #[error("currency {0} is not in the rate table")]
    UnknownCurrency(String),
}

/// Immutable snapshot of EUR-based exchange rates.
///
/// Never mutated after construction, so it needs no synchronization when
/// shared across request handlers.
#[derive(Debug, Clone)]
pub struct RateTable {
    rates: HashMap<String, Decimal>,
}

impl RateTable {
    pub fn new(rates: HashMap<String, Decimal>) -> Self {
        Self { rates }
    }

    /// Rate of `code` relative to EUR, if the snapshot carries it.
    pub fn rate(&self, code: &str) -> Option<Decimal> {
        self.rates.get(code).copied()
    }
}

/// Projects native-currency amounts into arbitrary target currencies.
///
/// Both the rate table and the native currency are injected at construction;
/// there is no process-wide singleton.
#[derive(Debug, Clone)]
pub struct Convertor {
    rates: RateTable,
    native: String,
}

impl Convertor {
    pub fn new(rates: RateTable, native: impl Into<String>) -> Self {
        Self {
            rates,
            native: native.into(),
        }
    }

    /// The currency balances are stored in.
    pub fn native(&self) -> &str {
        &self.native
    }

    /// Project `amount` (in the native currency) into `target`.
    ///
    /// The native currency is returned untouched: no conversion and no
    /// rounding, so stored amounts pass through exactly. Everything else goes
    /// `native -> EUR -> target` and is rounded to 2 decimal places, half
    /// away from zero.
    pub fn convert(&self, amount: Decimal, target: &str) -> Result<Decimal, ConvertError> {
        if target == self.native {
            return Ok(amount);
        }

        let native_rate = self
            .rates
            .rate(&self.native)
            .ok_or_else(|| ConvertError::UnknownCurrency(self.native.clone()))?;
        let target_rate = self
            .rates
            .rate(target)
            .ok_or_else(|| ConvertError::UnknownCurrency(target.to_string()))?;

        let in_eur = amount / native_rate;

        Ok((in_eur * target_rate).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
    }
}
