//! Ledger error types for validation and state errors.

use dompet_shared::{Amount, TransactionId, UserId};
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Transaction amount cannot be zero.
    #[error("Transaction amount cannot be zero")]
    ZeroAmount,

    /// Transfer magnitudes must be positive.
    #[error("Transfer amount must be positive")]
    NegativeAmount,

    /// A transfer must move money between two different accounts.
    #[error("Transfer source and destination must differ")]
    SelfTransfer,

    // ========== Wallet Errors ==========
    /// Wallet not found.
    #[error("No wallet found for user {0}")]
    WalletNotFound(UserId),

    /// A wallet already exists for the user.
    #[error("A wallet already exists for user {0}")]
    WalletAlreadyExists(UserId),

    /// The wallet is frozen; debits are blocked.
    #[error("Wallet for user {0} is frozen and cannot be debited")]
    WalletFrozen(UserId),

    /// The debit would overdraw the account.
    #[error("Insufficient balance: available {balance}, requested debit of {requested}")]
    InsufficientBalance {
        /// The balance at validation time.
        balance: Amount,
        /// The debit magnitude requested.
        requested: Amount,
    },

    // ========== Transaction Errors ==========
    /// Transaction not found.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(TransactionId),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ZeroAmount => "ZERO_AMOUNT",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::SelfTransfer => "SELF_TRANSFER",
            Self::WalletNotFound(_) => "WALLET_NOT_FOUND",
            Self::WalletAlreadyExists(_) => "WALLET_ALREADY_EXISTS",
            Self::WalletFrozen(_) => "WALLET_FROZEN",
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::TransactionNotFound(_) => "TRANSACTION_NOT_FOUND",
        }
    }
}
