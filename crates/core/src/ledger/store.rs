//! Transaction log interface and in-memory store.
//!
//! The interface is append-only by construction: records can be written
//! and read, never updated or deleted.

use std::sync::{PoisonError, RwLock};

use dompet_shared::TransactionId;

use crate::wallet::AccountRef;

use super::types::Transaction;

/// Storage interface for the transaction audit trail.
pub trait TransactionRepository: Send + Sync {
    /// Appends a committed record to the log.
    fn append(&self, transaction: Transaction);

    /// Reads a record by ID.
    fn get(&self, id: TransactionId) -> Option<Transaction>;

    /// Lists an account's records in commit order.
    fn list_for_owner(&self, owner: AccountRef) -> Vec<Transaction>;
}

/// In-memory append-only transaction log.
#[derive(Debug, Default)]
pub struct InMemoryTransactionLog {
    records: RwLock<Vec<Transaction>>,
}

impl InMemoryTransactionLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of records in the log.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if the log holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TransactionRepository for InMemoryTransactionLog {
    fn append(&self, transaction: Transaction) {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(transaction);
    }

    fn get(&self, id: TransactionId) -> Option<Transaction> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|t| t.id == id)
            .cloned()
    }

    fn list_for_owner(&self, owner: AccountRef) -> Vec<Transaction> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|t| t.owner == owner)
            .cloned()
            .collect()
    }
}
