//! Append-only transaction ledger and wallet balance mutation.
//!
//! This module implements the core ledger functionality:
//! - Immutable transaction records and their closed kind set
//! - The ledger service, the only component permitted to mutate a balance
//! - Best-effort reversals referencing the original record
//! - Atomic two-leg transfers for administrative operations
//! - Error types for ledger operations

pub mod error;
pub mod service;
pub mod store;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::LedgerError;
pub use service::LedgerService;
pub use store::{InMemoryTransactionLog, TransactionRepository};
pub use types::{Transaction, TransactionKind, TransactionStatus};
