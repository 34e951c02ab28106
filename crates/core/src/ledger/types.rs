//! Ledger domain types.

use std::fmt;

use chrono::{DateTime, Utc};
use dompet_shared::{Amount, TransactionId};
use serde::{Deserialize, Serialize};

use crate::wallet::AccountRef;

/// Classification of a ledger transaction.
///
/// A closed set: an unrecognized kind is a construction-time error rather
/// than a silent string mismatch at reporting time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Wallet top-up from an external payment channel.
    TopUp,
    /// Marketplace purchase.
    Marketplace,
    /// Platform commission on a sale.
    Commission,
    /// Collected or settled tax.
    Tax,
    /// Refund issued to a buyer.
    Refund,
    /// Negation of a prior transaction.
    Reversal,
    /// Teleconsultation session fee.
    Teleconsultation,
    /// Operational-expense reimbursement paid to an employee.
    DanaOpex,
    /// Insurance claim payout.
    InsuranceClaim,
    /// Move between administrative sub-wallets.
    InternalTransfer,
    /// Operational expense paid out of platform cash.
    OperationalExpense,
}

impl TransactionKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TopUp => "top_up",
            Self::Marketplace => "marketplace",
            Self::Commission => "commission",
            Self::Tax => "tax",
            Self::Refund => "refund",
            Self::Reversal => "reversal",
            Self::Teleconsultation => "teleconsultation",
            Self::DanaOpex => "dana_opex",
            Self::InsuranceClaim => "insurance_claim",
            Self::InternalTransfer => "internal_transfer",
            Self::OperationalExpense => "operational_expense",
        }
    }

    /// Parses a kind from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "top_up" => Some(Self::TopUp),
            "marketplace" => Some(Self::Marketplace),
            "commission" => Some(Self::Commission),
            "tax" => Some(Self::Tax),
            "refund" => Some(Self::Refund),
            "reversal" => Some(Self::Reversal),
            "teleconsultation" => Some(Self::Teleconsultation),
            "dana_opex" => Some(Self::DanaOpex),
            "insurance_claim" => Some(Self::InsuranceClaim),
            "internal_transfer" => Some(Self::InternalTransfer),
            "operational_expense" => Some(Self::OperationalExpense),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Settlement status of a ledger transaction.
///
/// The ledger service only ever commits `Completed` records. `Pending` and
/// `Failed` exist for gateway-driven top-up flows recorded by the
/// surrounding application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Awaiting external settlement.
    Pending,
    /// Committed to the ledger.
    Completed,
    /// External settlement failed; no balance change occurred.
    Failed,
}

impl TransactionStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An immutable ledger record.
///
/// Corrections are new transactions referencing the original via
/// `related_id`; no update or delete path exists anywhere in the crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier.
    pub id: TransactionId,
    /// The account this record belongs to.
    pub owner: AccountRef,
    /// Classification.
    pub kind: TransactionKind,
    /// Signed amount: positive credit, negative debit.
    pub amount: Amount,
    /// Human-readable description.
    pub description: String,
    /// Settlement status.
    pub status: TransactionStatus,
    /// Commit time.
    pub created_at: DateTime<Utc>,
    /// The transaction this one corrects, if any.
    pub related_id: Option<TransactionId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_as_str_round_trip() {
        let kinds = [
            TransactionKind::TopUp,
            TransactionKind::Marketplace,
            TransactionKind::Commission,
            TransactionKind::Tax,
            TransactionKind::Refund,
            TransactionKind::Reversal,
            TransactionKind::Teleconsultation,
            TransactionKind::DanaOpex,
            TransactionKind::InsuranceClaim,
            TransactionKind::InternalTransfer,
            TransactionKind::OperationalExpense,
        ];
        for kind in kinds {
            assert_eq!(TransactionKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_kind_parse_is_case_insensitive() {
        assert_eq!(
            TransactionKind::parse("DANA_OPEX"),
            Some(TransactionKind::DanaOpex)
        );
    }

    #[test]
    fn test_kind_parse_rejects_unknown() {
        assert_eq!(TransactionKind::parse("cashback"), None);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(TransactionStatus::Completed.to_string(), "completed");
        assert_eq!(TransactionStatus::Pending.to_string(), "pending");
        assert_eq!(TransactionStatus::Failed.to_string(), "failed");
    }
}
