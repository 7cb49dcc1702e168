//! Ledger persistence: atomic state transitions over a transactional store.
//!
//! `LedgerStore` is the seam between the HTTP layer and persistence. The
//! Postgres implementation is the production path; the in-memory one backs
//! tests and dev runs with the same observable semantics.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryLedgerStore;
pub use postgres::PostgresLedgerStore;
pub use r#trait::LedgerStore;
