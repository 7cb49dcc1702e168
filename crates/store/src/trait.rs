use async_trait::async_trait;
use rust_decimal::Decimal;

use ledgerd_core::{Account, AccountId, HistoryPage, HistoryQuery, LedgerResult};

/// Atomic ledger operations.
///
/// Every call is one unit of work: on any error the store is left exactly as
/// it was, with no partial effect to reconcile. Serialization between
/// concurrent calls is the store's job; the trait owns no locks, queues or
/// schedulers of its own.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Read an account. `AccountNotFound` on miss.
    async fn get_account(&self, id: AccountId) -> LedgerResult<Account>;

    /// Credit (`amount > 0`) or debit (`amount < 0`) a single account, and
    /// append one history entry with the other side marked external.
    ///
    /// An unknown id is auto-provisioned when the amount is non-negative,
    /// with the amount as the opening balance; a debit never creates an
    /// account (`AccountNotFound`). A debit past zero fails with
    /// `BalanceWouldBeNegative`. Returns the effective account id, which
    /// differs from `id` only when auto-provisioning occurred.
    ///
    /// `amount == 0` is rejected by the request layer before the store is
    /// reached; the store does not re-check it.
    async fn adjust(&self, id: AccountId, amount: Decimal, comment: &str)
    -> LedgerResult<AccountId>;

    /// Move `amount` from `from` to `to` and append one history entry with
    /// both sides populated.
    ///
    /// The caller guarantees `amount > 0`, `from != to`, and that neither id
    /// is the external sentinel. The debit is attempted first so a missing
    /// receiver can never leave created money behind: the rollback removes
    /// the debit too.
    async fn transfer(
        &self,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
        comment: &str,
    ) -> LedgerResult<()>;

    /// One page of the account's audit trail plus the window count.
    ///
    /// An unknown account fails with `AccountNotFound`; a known account with
    /// no matching rows, or an offset past the end, yields an empty page with
    /// the correct total.
    async fn history(&self, id: AccountId, query: HistoryQuery) -> LedgerResult<HistoryPage>;
}
