use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Account identifier, assigned by the store (BIGSERIAL).
pub type AccountId = i64;

/// A ledger account and its committed balance.
///
/// Balances are kept in the ledger's single native currency and are never
/// negative at any committed state; the store enforces that with a CHECK
/// constraint, so the constraint violation is the canonical non-negativity
/// signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub balance: Decimal,
}

/// One side of a history entry.
///
/// A single-account adjustment has exactly one `Account` side; the other side
/// is `External` (money entering or leaving the ledger). A transfer has two
/// distinct `Account` sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Counterpart {
    /// Outside the ledger. Persisted and serialized as id `0`.
    External,
    Account(AccountId),
}

impl Counterpart {
    /// Wire/schema representation (`0` = external).
    pub fn to_raw(self) -> i64 {
        match self {
            Counterpart::External => 0,
            Counterpart::Account(id) => id,
        }
    }

    pub fn from_raw(raw: i64) -> Self {
        if raw == 0 {
            Counterpart::External
        } else {
            Counterpart::Account(raw)
        }
    }

    pub fn account_id(self) -> Option<AccountId> {
        match self {
            Counterpart::External => None,
            Counterpart::Account(id) => Some(id),
        }
    }
}
