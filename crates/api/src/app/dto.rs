use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ledgerd_core::{AccountId, HistoryEntry};

// -------------------------
// Request DTOs
// -------------------------

/// `?id=` target for balance reads and adjustments.
#[derive(Debug, Deserialize)]
pub struct AccountTarget {
    pub id: AccountId,
}

#[derive(Debug, Deserialize)]
pub struct BalanceQuery {
    pub id: AccountId,
    pub currency: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AdjustBalanceRequest {
    pub amount: Decimal,
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    pub id_from: AccountId,
    pub id_to: AccountId,
    pub amount: Decimal,
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub id: AccountId,
    pub currency: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub balance: Decimal,
    pub currency: String,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    /// Window count: all rows matching the account, not just this page.
    pub count: u64,
    pub history: Vec<TransactionJson>,
}

#[derive(Debug, Serialize)]
pub struct TransactionJson {
    pub id_from: i64,
    pub id_to: i64,
    pub amount: Decimal,
    pub currency: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl TransactionJson {
    /// `amount` is passed separately because it may already be a converted
    /// projection of the stored value.
    pub fn from_entry(entry: HistoryEntry, amount: Decimal, currency: &str) -> Self {
        Self {
            id_from: entry.from.to_raw(),
            id_to: entry.to.to_raw(),
            amount,
            currency: currency.to_string(),
            comment: entry.comment,
            created_at: entry.created_at,
        }
    }
}
