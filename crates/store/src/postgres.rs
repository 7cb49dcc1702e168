//! Postgres-backed ledger store.
//!
//! All mutations run inside a Read Committed transaction; serialization is
//! delegated entirely to Postgres. Non-negativity comes from the
//! `CHECK (balance >= 0)` constraint on `accounts`: the check fires
//! atomically with each UPDATE, so two concurrent debits cannot both drain
//! the same account past zero. Write-skew across two accounts remains
//! possible at this isolation level (the commit order of crossing transfers
//! is not serializable); raising isolation would also require deterministic
//! lock ordering by ascending account id to stay deadlock-free.
//!
//! ## Error mapping
//!
//! | Signal | Interpreted as |
//! |---|---|
//! | check violation (`23514`) on adjust | `BalanceWouldBeNegative` |
//! | check violation on the transfer debit | `InsufficientFunds` |
//! | zero rows matched on adjust, `amount < 0` | `AccountNotFound` |
//! | zero rows matched on transfer debit / credit | `SenderNotFound` / `ReceiverNotFound` |
//! | anything else | `Store` (detail logged, never sent to clients) |

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Row, Transaction};
use tracing::instrument;

use ledgerd_core::{
    Account, AccountId, Counterpart, HistoryEntry, HistoryPage, HistoryQuery, LedgerError,
    LedgerResult,
};

use crate::r#trait::LedgerStore;

/// Production ledger store over a sqlx Postgres pool.
///
/// Cloning is cheap; the pool is internally reference-counted.
#[derive(Debug, Clone)]
pub struct PostgresLedgerStore {
    pool: PgPool,
}

impl PostgresLedgerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply the bundled schema migrations.
    pub async fn migrate(&self) -> LedgerResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(LedgerError::store)
    }

    async fn append_history(
        tx: &mut Transaction<'_, Postgres>,
        from: Counterpart,
        to: Counterpart,
        amount: Decimal,
        comment: &str,
    ) -> LedgerResult<()> {
        sqlx::query(
            "INSERT INTO transaction_history (id_from, id_to, amount, comment, created_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(from.to_raw())
        .bind(to.to_raw())
        .bind(amount)
        .bind(comment)
        .bind(Utc::now())
        .execute(&mut **tx)
        .await
        .map_err(LedgerError::store)?;

        Ok(())
    }

}

fn is_check_violation(err: &sqlx::Error) -> bool {
    matches!(
        err.as_database_error().map(|db| db.kind()),
        Some(sqlx::error::ErrorKind::CheckViolation)
    )
}

#[async_trait]
impl LedgerStore for PostgresLedgerStore {
    #[instrument(skip(self), err)]
    async fn get_account(&self, id: AccountId) -> LedgerResult<Account> {
        let row = sqlx::query("SELECT id, balance FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(LedgerError::store)?
            .ok_or(LedgerError::AccountNotFound)?;

        Ok(Account {
            id: row.get("id"),
            balance: row.get("balance"),
        })
    }

    #[instrument(skip(self, comment), err)]
    async fn adjust(
        &self,
        id: AccountId,
        amount: Decimal,
        comment: &str,
    ) -> LedgerResult<AccountId> {
        let mut tx = self.pool.begin().await.map_err(LedgerError::store)?;

        let updated = sqlx::query("UPDATE accounts SET balance = balance + $1 WHERE id = $2")
            .bind(amount)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if is_check_violation(&e) {
                    LedgerError::BalanceWouldBeNegative
                } else {
                    LedgerError::store(e)
                }
            })?;

        let effective = if updated.rows_affected() == 0 {
            if amount < Decimal::ZERO {
                // Dropping the transaction rolls it back.
                return Err(LedgerError::AccountNotFound);
            }

            // First touch of an unknown id: provision a fresh account with
            // the credited amount as its opening balance. The generated id is
            // the effective id from here on.
            sqlx::query("INSERT INTO accounts (balance) VALUES ($1) RETURNING id")
                .bind(amount)
                .fetch_one(&mut *tx)
                .await
                .map_err(LedgerError::store)?
                .get::<i64, _>("id")
        } else {
            id
        };

        let (from, to) = if amount < Decimal::ZERO {
            (Counterpart::Account(effective), Counterpart::External)
        } else {
            (Counterpart::External, Counterpart::Account(effective))
        };

        Self::append_history(&mut tx, from, to, amount.abs(), comment).await?;

        tx.commit().await.map_err(LedgerError::store)?;

        Ok(effective)
    }

    #[instrument(skip(self, comment), err)]
    async fn transfer(
        &self,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
        comment: &str,
    ) -> LedgerResult<()> {
        let mut tx = self.pool.begin().await.map_err(LedgerError::store)?;

        // Debit first: if the receiver turns out not to exist, the rollback
        // removes the debit instead of leaving created money behind.
        let debited = sqlx::query("UPDATE accounts SET balance = balance - $1 WHERE id = $2")
            .bind(amount)
            .bind(from)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if is_check_violation(&e) {
                    LedgerError::InsufficientFunds
                } else {
                    LedgerError::store(e)
                }
            })?;

        if debited.rows_affected() == 0 {
            return Err(LedgerError::SenderNotFound(from));
        }

        let credited = sqlx::query("UPDATE accounts SET balance = balance + $1 WHERE id = $2")
            .bind(amount)
            .bind(to)
            .execute(&mut *tx)
            .await
            .map_err(LedgerError::store)?;

        if credited.rows_affected() == 0 {
            return Err(LedgerError::ReceiverNotFound(to));
        }

        Self::append_history(
            &mut tx,
            Counterpart::Account(from),
            Counterpart::Account(to),
            amount,
            comment,
        )
        .await?;

        tx.commit().await.map_err(LedgerError::store)?;

        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn history(&self, id: AccountId, query: HistoryQuery) -> LedgerResult<HistoryPage> {
        // Sort column and direction come from closed enums, so the format!
        // is not an injection surface. The window count rides along with the
        // page so both are read at one instant.
        let sql = format!(
            "SELECT id_from, id_to, amount, comment, created_at, count(*) OVER () AS total \
             FROM transaction_history \
             WHERE id_from = $1 OR id_to = $1 \
             ORDER BY {} {} \
             LIMIT $2 OFFSET $3",
            query.sort_by().as_column(),
            query.sort_order().as_sql(),
        );

        let mut tx = self.pool.begin().await.map_err(LedgerError::store)?;

        let rows = sqlx::query(&sql)
            .bind(id)
            .bind(i64::from(query.limit()))
            .bind(i64::from(query.offset()))
            .fetch_all(&mut *tx)
            .await
            .map_err(LedgerError::store)?;

        if rows.is_empty() {
            // The window count is unavailable on an empty page. Distinguish
            // "no such account" from "page past the end" in one statement so
            // the two answers cannot disagree.
            let row = sqlx::query(
                "SELECT \
                   EXISTS(SELECT 1 FROM accounts WHERE id = $1) AS account_exists, \
                   (SELECT count(*) FROM transaction_history \
                    WHERE id_from = $1 OR id_to = $1) AS total",
            )
            .bind(id)
            .fetch_one(&mut *tx)
            .await
            .map_err(LedgerError::store)?;

            if !row.get::<bool, _>("account_exists") {
                return Err(LedgerError::AccountNotFound);
            }
            let total: i64 = row.get("total");

            tx.commit().await.map_err(LedgerError::store)?;

            return Ok(HistoryPage {
                entries: Vec::new(),
                total: total as u64,
            });
        }

        let total: i64 = rows[0].get("total");
        let entries = rows
            .iter()
            .map(|row| HistoryEntry {
                from: Counterpart::from_raw(row.get("id_from")),
                to: Counterpart::from_raw(row.get("id_to")),
                amount: row.get("amount"),
                comment: row.get("comment"),
                created_at: row.get("created_at"),
            })
            .collect();

        tx.commit().await.map_err(LedgerError::store)?;

        Ok(HistoryPage {
            entries,
            total: total as u64,
        })
    }
}
