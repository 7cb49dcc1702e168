//! Transaction history: entries, validated query parameters, pages.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::account::{AccountId, Counterpart};
use crate::error::LedgerError;

/// Largest page size a history query may ask for.
pub const MAX_HISTORY_LIMIT: u32 = 100;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_HISTORY_LIMIT: u32 = 10;

/// One immutable row of the audit trail.
///
/// `amount` is always positive; direction is carried by which side is a real
/// account. Entries are append-only and never mutated or deleted.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub from: Counterpart,
    pub to: Counterpart,
    pub amount: Decimal,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// True if `id` participates on either side of this entry.
    pub fn touches(&self, id: AccountId) -> bool {
        self.from == Counterpart::Account(id) || self.to == Counterpart::Account(id)
    }
}

/// Sort key accepted by history queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    CreatedAt,
    Amount,
}

impl SortBy {
    pub fn parse(s: &str) -> Result<Self, LedgerError> {
        match s {
            "created_at" => Ok(Self::CreatedAt),
            "amount" => Ok(Self::Amount),
            _ => Err(LedgerError::validation(
                "sort_by must be created_at or amount",
            )),
        }
    }

    /// Column name. Safe to splice into SQL because the set is closed.
    pub fn as_column(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::Amount => "amount",
        }
    }
}

/// Sort direction accepted by history queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Case-insensitive, matching the public API (`ASC`/`DESC`).
    pub fn parse(s: &str) -> Result<Self, LedgerError> {
        match s.to_ascii_uppercase().as_str() {
            "ASC" => Ok(Self::Asc),
            "DESC" => Ok(Self::Desc),
            _ => Err(LedgerError::validation("sort_order must be ASC or DESC")),
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Validated paging and sorting parameters for a history query.
///
/// Construction is the validation boundary: a `HistoryQuery` that exists is
/// in range, so stores never re-check limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryQuery {
    limit: u32,
    offset: u32,
    sort_by: SortBy,
    sort_order: SortOrder,
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_HISTORY_LIMIT,
            offset: 0,
            sort_by: SortBy::CreatedAt,
            sort_order: SortOrder::Desc,
        }
    }
}

impl HistoryQuery {
    /// Build a validated query; `None` fields fall back to the defaults
    /// (limit 10, offset 0, newest first).
    pub fn new(
        limit: Option<u32>,
        offset: Option<u32>,
        sort_by: Option<SortBy>,
        sort_order: Option<SortOrder>,
    ) -> Result<Self, LedgerError> {
        let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
        if limit > MAX_HISTORY_LIMIT {
            return Err(LedgerError::validation("limit must be <= 100"));
        }

        Ok(Self {
            limit,
            offset: offset.unwrap_or(0),
            sort_by: sort_by.unwrap_or(SortBy::CreatedAt),
            sort_order: sort_order.unwrap_or(SortOrder::Desc),
        })
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn sort_by(&self) -> SortBy {
        self.sort_by
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }
}

/// One page of history plus the window count: the total number of rows
/// matching the account filter regardless of `limit`/`offset`.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryPage {
    pub entries: Vec<HistoryEntry>,
    pub total: u64,
}
