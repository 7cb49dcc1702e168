//! Ledger error taxonomy.

use thiserror::Error;

use crate::account::AccountId;

/// Result type used across the ledger engine.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Errors surfaced by the ledger engine.
///
/// Every failure leaves persisted state unchanged: the whole unit of work is
/// rolled back and never retried internally. Retry policy, if any, belongs to
/// the caller.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Malformed or out-of-range input. Most of these are caught by the
    /// request layer before the engine is invoked.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The addressed account does not exist. A debit never creates one.
    #[error("account not found")]
    AccountNotFound,

    /// Transfer sender does not exist.
    #[error("transfer sender account #{0} does not exist")]
    SenderNotFound(AccountId),

    /// Transfer receiver does not exist.
    #[error("transfer receiver account #{0} does not exist")]
    ReceiverNotFound(AccountId),

    /// An adjustment would take the balance below zero.
    #[error("balance cannot go negative")]
    BalanceWouldBeNegative,

    /// The transfer debit would take the sender below zero.
    #[error("insufficient funds")]
    InsufficientFunds,

    /// Unclassified persistence failure. The detail is for logs; it is never
    /// put into a client response.
    #[error("store failure: {0}")]
    Store(String),
}

impl LedgerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn store(err: impl std::fmt::Display) -> Self {
        Self::Store(err.to_string())
    }
}
