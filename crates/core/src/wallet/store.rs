//! Wallet repository interface and in-memory store.
//!
//! The repository has plain key/value semantics; the atomicity of
//! validate-then-commit lives in the ledger service's per-account critical
//! sections, not here.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use dompet_shared::{Amount, UserId};

use crate::ledger::LedgerError;

use super::types::{AdminAccount, Wallet};

/// Storage interface for user wallets and administrative sub-wallets.
pub trait WalletRepository: Send + Sync {
    /// Stores the wallet for a newly registered user.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::WalletAlreadyExists` if the user already has
    /// a wallet.
    fn insert(&self, wallet: Wallet) -> Result<(), LedgerError>;

    /// Reads a wallet by owner.
    fn get(&self, owner: UserId) -> Option<Wallet>;

    /// Writes back a full wallet record.
    fn put(&self, wallet: Wallet);

    /// Toggles the frozen flag. Never touches the balance and never
    /// reverses transactions made before freezing.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::WalletNotFound` for an unknown owner.
    fn set_frozen(&self, owner: UserId, frozen: bool) -> Result<(), LedgerError>;

    /// Reads an administrative sub-wallet balance.
    fn admin_balance(&self, account: AdminAccount) -> Amount;

    /// Writes an administrative sub-wallet balance.
    fn put_admin_balance(&self, account: AdminAccount, balance: Amount);
}

/// In-memory wallet store.
///
/// Administrative sub-wallets always exist and start at zero.
#[derive(Debug, Default)]
pub struct InMemoryWalletStore {
    wallets: RwLock<HashMap<UserId, Wallet>>,
    admin: RwLock<HashMap<AdminAccount, Amount>>,
}

impl InMemoryWalletStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl WalletRepository for InMemoryWalletStore {
    fn insert(&self, wallet: Wallet) -> Result<(), LedgerError> {
        let mut wallets = self
            .wallets
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if wallets.contains_key(&wallet.owner) {
            return Err(LedgerError::WalletAlreadyExists(wallet.owner));
        }
        wallets.insert(wallet.owner, wallet);
        Ok(())
    }

    fn get(&self, owner: UserId) -> Option<Wallet> {
        self.wallets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&owner)
            .cloned()
    }

    fn put(&self, wallet: Wallet) {
        self.wallets
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(wallet.owner, wallet);
    }

    fn set_frozen(&self, owner: UserId, frozen: bool) -> Result<(), LedgerError> {
        let mut wallets = self
            .wallets
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let wallet = wallets
            .get_mut(&owner)
            .ok_or(LedgerError::WalletNotFound(owner))?;
        wallet.is_frozen = frozen;
        Ok(())
    }

    fn admin_balance(&self, account: AdminAccount) -> Amount {
        self.admin
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&account)
            .copied()
            .unwrap_or(0)
    }

    fn put_admin_balance(&self, account: AdminAccount, balance: Amount) {
        self.admin
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(account, balance);
    }
}
