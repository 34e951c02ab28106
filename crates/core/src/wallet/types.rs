//! Wallet domain types.

use std::fmt;

use dompet_shared::{Amount, UserId};
use serde::{Deserialize, Serialize};

/// A user's spendable balance record.
///
/// One wallet exists per user, created at registration and kept for the
/// account's lifetime. The balance is mutated only by the ledger service;
/// the frozen flag blocks debits and nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    /// The user who owns this wallet.
    pub owner: UserId,
    /// Current balance in minor currency units.
    pub balance: Amount,
    /// Whether debits are blocked.
    pub is_frozen: bool,
}

impl Wallet {
    /// Creates an empty, unfrozen wallet for a new user.
    #[must_use]
    pub const fn new(owner: UserId) -> Self {
        Self {
            owner,
            balance: 0,
            is_frozen: false,
        }
    }
}

/// One of the three platform-held administrative sub-wallets.
///
/// These balances are not bound to any user record and cannot be frozen.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AdminAccount {
    /// Operating cash held by the platform.
    Cash,
    /// Accumulated platform profit.
    Profit,
    /// Collected tax awaiting settlement.
    Tax,
}

impl AdminAccount {
    /// Returns the string representation of the sub-wallet.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Profit => "profit",
            Self::Tax => "tax",
        }
    }
}

impl fmt::Display for AdminAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The owner of a balance: a user wallet or an administrative sub-wallet.
///
/// Ordered so compound transfers can acquire account locks in a canonical
/// order regardless of transfer direction.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AccountRef {
    /// A platform sub-wallet.
    Admin(AdminAccount),
    /// A user wallet.
    User(UserId),
}

impl AccountRef {
    /// Returns true for administrative sub-wallets.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin(_))
    }
}

impl fmt::Display for AccountRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin(account) => write!(f, "admin:{account}"),
            Self::User(user) => write!(f, "user:{user}"),
        }
    }
}
