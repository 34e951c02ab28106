//! Monetary amounts in minor currency units.
//!
//! All balances and transaction amounts are signed 64-bit integers counted
//! in the smallest currency unit. Integer minor units keep arithmetic exact;
//! floating-point money is banned workspace-wide.

/// A monetary amount in minor currency units.
///
/// Positive amounts are credits, negative amounts are debits.
pub type Amount = i64;

/// Returns true if the amount is a debit.
#[must_use]
pub const fn is_debit(amount: Amount) -> bool {
    amount < 0
}

/// Returns true if the amount is a credit.
#[must_use]
pub const fn is_credit(amount: Amount) -> bool {
    amount > 0
}
