//! Core ledger domain: accounts, history entries, query parameters, errors.
//!
//! Pure domain logic only: no IO, no HTTP, no persistence concerns.

pub mod account;
pub mod error;
pub mod history;

pub use account::{Account, AccountId, Counterpart};
pub use error::{LedgerError, LedgerResult};
pub use history::{
    DEFAULT_HISTORY_LIMIT, HistoryEntry, HistoryPage, HistoryQuery, MAX_HISTORY_LIMIT, SortBy,
    SortOrder,
};
