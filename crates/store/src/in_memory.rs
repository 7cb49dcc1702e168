//! In-memory ledger store.
//!
//! Intended for tests/dev. Mirrors the Postgres store's observable semantics,
//! including all-or-nothing failure: every check runs before the first
//! mutation, so an error leaves the state untouched.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use ledgerd_core::{
    Account, AccountId, Counterpart, HistoryEntry, HistoryPage, HistoryQuery, LedgerError,
    LedgerResult, SortBy, SortOrder,
};

use crate::r#trait::LedgerStore;

#[derive(Debug)]
struct State {
    accounts: BTreeMap<AccountId, Decimal>,
    next_id: AccountId,
    history: Vec<HistoryEntry>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            accounts: BTreeMap::new(),
            next_id: 1,
            history: Vec::new(),
        }
    }
}

/// In-memory `LedgerStore` guarded by one process-local lock.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    state: RwLock<State>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> LedgerError {
    LedgerError::store("lock poisoned")
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn get_account(&self, id: AccountId) -> LedgerResult<Account> {
        let state = self.state.read().map_err(poisoned)?;

        let balance = *state.accounts.get(&id).ok_or(LedgerError::AccountNotFound)?;
        Ok(Account { id, balance })
    }

    async fn adjust(
        &self,
        id: AccountId,
        amount: Decimal,
        comment: &str,
    ) -> LedgerResult<AccountId> {
        let mut state = self.state.write().map_err(poisoned)?;

        let effective = match state.accounts.get(&id).copied() {
            Some(balance) => {
                let next = balance + amount;
                if next < Decimal::ZERO {
                    return Err(LedgerError::BalanceWouldBeNegative);
                }
                state.accounts.insert(id, next);
                id
            }
            None => {
                if amount < Decimal::ZERO {
                    return Err(LedgerError::AccountNotFound);
                }
                let new_id = state.next_id;
                state.next_id += 1;
                state.accounts.insert(new_id, amount);
                new_id
            }
        };

        let (from, to) = if amount < Decimal::ZERO {
            (Counterpart::Account(effective), Counterpart::External)
        } else {
            (Counterpart::External, Counterpart::Account(effective))
        };

        state.history.push(HistoryEntry {
            from,
            to,
            amount: amount.abs(),
            comment: comment.to_string(),
            created_at: Utc::now(),
        });

        Ok(effective)
    }

    async fn transfer(
        &self,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
        comment: &str,
    ) -> LedgerResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;

        let sender = state
            .accounts
            .get(&from)
            .copied()
            .ok_or(LedgerError::SenderNotFound(from))?;
        if sender - amount < Decimal::ZERO {
            return Err(LedgerError::InsufficientFunds);
        }
        let receiver = state
            .accounts
            .get(&to)
            .copied()
            .ok_or(LedgerError::ReceiverNotFound(to))?;

        // All checks passed; both legs land together.
        state.accounts.insert(from, sender - amount);
        state.accounts.insert(to, receiver + amount);
        state.history.push(HistoryEntry {
            from: Counterpart::Account(from),
            to: Counterpart::Account(to),
            amount,
            comment: comment.to_string(),
            created_at: Utc::now(),
        });

        Ok(())
    }

    async fn history(&self, id: AccountId, query: HistoryQuery) -> LedgerResult<HistoryPage> {
        let state = self.state.read().map_err(poisoned)?;

        let mut matching: Vec<HistoryEntry> = state
            .history
            .iter()
            .filter(|e| e.touches(id))
            .cloned()
            .collect();
        let total = matching.len() as u64;

        if total == 0 && !state.accounts.contains_key(&id) {
            return Err(LedgerError::AccountNotFound);
        }

        // Reversed comparators rather than sort-then-reverse: the sort is
        // stable, so equal keys keep insertion order in both directions.
        match (query.sort_by(), query.sort_order()) {
            (SortBy::CreatedAt, SortOrder::Asc) => {
                matching.sort_by(|a, b| a.created_at.cmp(&b.created_at))
            }
            (SortBy::CreatedAt, SortOrder::Desc) => {
                matching.sort_by(|a, b| b.created_at.cmp(&a.created_at))
            }
            (SortBy::Amount, SortOrder::Asc) => matching.sort_by(|a, b| a.amount.cmp(&b.amount)),
            (SortBy::Amount, SortOrder::Desc) => matching.sort_by(|a, b| b.amount.cmp(&a.amount)),
        }

        let entries = matching
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.limit() as usize)
            .collect();

        Ok(HistoryPage { entries, total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn query(
        limit: Option<u32>,
        offset: Option<u32>,
        sort_by: Option<SortBy>,
        sort_order: Option<SortOrder>,
    ) -> HistoryQuery {
        HistoryQuery::new(limit, offset, sort_by, sort_order).unwrap()
    }

    async fn balance(store: &InMemoryLedgerStore, id: AccountId) -> Decimal {
        store.get_account(id).await.unwrap().balance
    }

    /// Sum of all committed balances (for conservation checks).
    async fn total_money(store: &InMemoryLedgerStore) -> Decimal {
        let state = store.state.read().unwrap();
        state.accounts.values().copied().sum()
    }

    #[tokio::test]
    async fn credit_to_unknown_id_provisions_one_account() {
        let store = InMemoryLedgerStore::new();

        let id = store.adjust(999, dec!(100), "seed").await.unwrap();
        assert_eq!(balance(&store, id).await, dec!(100));

        let page = store.history(id, HistoryQuery::default()).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.entries[0].from, Counterpart::External);
        assert_eq!(page.entries[0].to, Counterpart::Account(id));
        assert_eq!(page.entries[0].amount, dec!(100));

        // The requested id was never created; only the generated one exists.
        assert!(matches!(
            store.get_account(999).await,
            Err(LedgerError::AccountNotFound)
        ));
    }

    #[tokio::test]
    async fn debit_to_unknown_id_creates_nothing() {
        let store = InMemoryLedgerStore::new();

        let err = store.adjust(7, dec!(-50), "x").await.unwrap_err();
        assert!(matches!(err, LedgerError::AccountNotFound));

        assert_eq!(total_money(&store).await, Decimal::ZERO);
        assert!(store.state.read().unwrap().history.is_empty());
    }

    #[tokio::test]
    async fn debit_past_zero_is_rejected_and_rolled_back() {
        let store = InMemoryLedgerStore::new();
        let id = store.adjust(0, dec!(30), "seed").await.unwrap();

        let err = store.adjust(id, dec!(-31), "overdraw").await.unwrap_err();
        assert!(matches!(err, LedgerError::BalanceWouldBeNegative));
        assert_eq!(balance(&store, id).await, dec!(30));

        // Draining to exactly zero is fine.
        store.adjust(id, dec!(-30), "drain").await.unwrap();
        assert_eq!(balance(&store, id).await, Decimal::ZERO);
    }

    #[tokio::test]
    async fn debit_logs_account_on_the_from_side() {
        let store = InMemoryLedgerStore::new();
        let id = store.adjust(0, dec!(100), "seed").await.unwrap();
        store.adjust(id, dec!(-40), "withdraw").await.unwrap();

        let page = store
            .history(id, query(None, None, None, Some(SortOrder::Asc)))
            .await
            .unwrap();
        let withdrawal = &page.entries[1];
        assert_eq!(withdrawal.from, Counterpart::Account(id));
        assert_eq!(withdrawal.to, Counterpart::External);
        // Stored positive; direction lives in the sides.
        assert_eq!(withdrawal.amount, dec!(40));
    }

    #[tokio::test]
    async fn transfer_moves_money_and_logs_one_entry() {
        let store = InMemoryLedgerStore::new();
        let a = store.adjust(0, dec!(500), "seed a").await.unwrap();
        let b = store.adjust(0, dec!(0), "seed b").await.unwrap();

        store.transfer(a, b, dec!(200), "rent").await.unwrap();

        assert_eq!(balance(&store, a).await, dec!(300));
        assert_eq!(balance(&store, b).await, dec!(200));

        let transfers: Vec<_> = store
            .state
            .read()
            .unwrap()
            .history
            .iter()
            .filter(|e| e.from == Counterpart::Account(a) && e.to == Counterpart::Account(b))
            .cloned()
            .collect();
        assert_eq!(transfers.len(), 1);
        assert_eq!(transfers[0].amount, dec!(200));

        // Second transfer overdraws and changes nothing.
        let err = store.transfer(a, b, dec!(400), "too much").await.unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientFunds));
        assert_eq!(balance(&store, a).await, dec!(300));
        assert_eq!(balance(&store, b).await, dec!(200));
    }

    #[tokio::test]
    async fn transfer_to_missing_receiver_rolls_back_the_debit() {
        let store = InMemoryLedgerStore::new();
        let a = store.adjust(0, dec!(500), "seed").await.unwrap();

        let err = store.transfer(a, 12345, dec!(100), "void").await.unwrap_err();
        assert!(matches!(err, LedgerError::ReceiverNotFound(12345)));

        // Sender untouched, nothing logged.
        assert_eq!(balance(&store, a).await, dec!(500));
        assert_eq!(store.state.read().unwrap().history.len(), 1);
    }

    #[tokio::test]
    async fn transfer_from_missing_sender_fails() {
        let store = InMemoryLedgerStore::new();
        let b = store.adjust(0, dec!(10), "seed").await.unwrap();

        let err = store.transfer(777, b, dec!(5), "ghost").await.unwrap_err();
        assert!(matches!(err, LedgerError::SenderNotFound(777)));
        assert_eq!(balance(&store, b).await, dec!(10));
    }

    #[tokio::test]
    async fn internal_transfers_conserve_total_money() {
        let store = InMemoryLedgerStore::new();
        let a = store.adjust(0, dec!(1000), "seed a").await.unwrap();
        let b = store.adjust(0, dec!(250), "seed b").await.unwrap();
        let c = store.adjust(0, dec!(0), "seed c").await.unwrap();

        let external_net = dec!(1250);
        assert_eq!(total_money(&store).await, external_net);

        store.transfer(a, b, dec!(300), "").await.unwrap();
        store.transfer(b, c, dec!(550), "").await.unwrap();
        store.transfer(c, a, dec!(1), "").await.unwrap();
        // Failed operations must not move the total either.
        let _ = store.transfer(c, a, dec!(100000), "overdraw").await;
        let _ = store.transfer(a, 999999, dec!(1), "missing").await;

        assert_eq!(total_money(&store).await, external_net);

        // The total only moves by the net of external adjustments.
        store.adjust(a, dec!(-200), "withdraw").await.unwrap();
        assert_eq!(total_money(&store).await, external_net - dec!(200));
    }

    #[tokio::test]
    async fn committed_balances_never_go_negative() {
        let store = InMemoryLedgerStore::new();
        let a = store.adjust(0, dec!(50), "seed a").await.unwrap();
        let b = store.adjust(0, dec!(5), "seed b").await.unwrap();

        // A deterministic mix of valid and overdrawing operations.
        let ops: &[(AccountId, Decimal)] = &[
            (a, dec!(-20)),
            (a, dec!(-40)),
            (b, dec!(10)),
            (b, dec!(-16)),
            (a, dec!(-30)),
            (a, dec!(-1)),
        ];
        for &(id, amount) in ops {
            let _ = store.adjust(id, amount, "mix").await;
            let _ = store.transfer(a, b, dec!(7), "mix").await;
        }

        let state = store.state.read().unwrap();
        for (&id, &bal) in &state.accounts {
            assert!(bal >= Decimal::ZERO, "account {id} went negative: {bal}");
        }
    }

    #[tokio::test]
    async fn history_of_unknown_account_is_not_found() {
        let store = InMemoryLedgerStore::new();
        let err = store
            .history(1, HistoryQuery::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::AccountNotFound));
    }

    #[tokio::test]
    async fn offset_past_the_end_is_an_empty_page_not_an_error() {
        let store = InMemoryLedgerStore::new();
        let id = store.adjust(0, dec!(10), "seed").await.unwrap();
        store.adjust(id, dec!(5), "top up").await.unwrap();

        let page = store
            .history(id, query(None, Some(50), None, None))
            .await
            .unwrap();
        assert!(page.entries.is_empty());
        assert_eq!(page.total, 2);
    }

    #[tokio::test]
    async fn window_count_ignores_the_page_bounds() {
        let store = InMemoryLedgerStore::new();
        let id = store.adjust(0, dec!(1), "seed").await.unwrap();
        for _ in 0..7 {
            store.adjust(id, dec!(1), "tick").await.unwrap();
        }

        let page = store
            .history(id, query(Some(3), Some(2), None, None))
            .await
            .unwrap();
        assert_eq!(page.entries.len(), 3);
        assert_eq!(page.total, 8);
    }

    #[tokio::test]
    async fn history_sorts_by_amount_in_both_directions() {
        let store = InMemoryLedgerStore::new();
        let id = store.adjust(0, dec!(30), "seed").await.unwrap();
        store.adjust(id, dec!(5), "").await.unwrap();
        store.adjust(id, dec!(90), "").await.unwrap();

        let asc = store
            .history(id, query(None, None, Some(SortBy::Amount), Some(SortOrder::Asc)))
            .await
            .unwrap();
        let amounts: Vec<_> = asc.entries.iter().map(|e| e.amount).collect();
        assert_eq!(amounts, vec![dec!(5), dec!(30), dec!(90)]);

        let desc = store
            .history(id, query(None, None, Some(SortBy::Amount), Some(SortOrder::Desc)))
            .await
            .unwrap();
        let amounts: Vec<_> = desc.entries.iter().map(|e| e.amount).collect();
        assert_eq!(amounts, vec![dec!(90), dec!(30), dec!(5)]);
    }

    #[tokio::test]
    async fn equal_sort_keys_keep_insertion_order_in_both_directions() {
        let store = InMemoryLedgerStore::new();
        let id = store.adjust(0, dec!(5), "a").await.unwrap();
        store.adjust(id, dec!(5), "b").await.unwrap();
        store.adjust(id, dec!(5), "c").await.unwrap();

        for order in [SortOrder::Asc, SortOrder::Desc] {
            let page = store
                .history(id, query(None, None, Some(SortBy::Amount), Some(order)))
                .await
                .unwrap();
            let comments: Vec<_> = page.entries.iter().map(|e| e.comment.as_str()).collect();
            assert_eq!(comments, vec!["a", "b", "c"], "order: {order:?}");
        }
    }

    #[tokio::test]
    async fn history_defaults_to_newest_first() {
        let store = InMemoryLedgerStore::new();
        let id = store.adjust(0, dec!(1), "first").await.unwrap();
        store.adjust(id, dec!(2), "second").await.unwrap();
        store.adjust(id, dec!(3), "third").await.unwrap();

        let page = store.history(id, HistoryQuery::default()).await.unwrap();
        let comments: Vec<_> = page.entries.iter().map(|e| e.comment.as_str()).collect();
        assert_eq!(comments, vec!["third", "second", "first"]);
    }
}
