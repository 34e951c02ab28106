//! Wallet state for users and the platform.
//!
//! This module defines the balance records the ledger mutates:
//! - One wallet per user, created at registration
//! - Three administrative sub-wallets (cash, profit, tax)
//! - The repository interface the ledger reads and writes through

pub mod store;
pub mod types;

pub use store::{InMemoryWalletStore, WalletRepository};
pub use types::{AccountRef, AdminAccount, Wallet};
