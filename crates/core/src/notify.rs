//! User-facing notification dispatch.
//!
//! The sink is an external collaborator: delivery is fire-and-forget, and a
//! failing sink must never block or fail a ledger or workflow operation, so
//! the interface has no error channel. Implementations swallow their own
//! failures.

use dompet_shared::UserId;
use serde::{Deserialize, Serialize};

use crate::workflow::ApproverRole;

/// Who a notification is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recipient {
    /// A single user.
    User(UserId),
    /// Every operator holding a role.
    Role(ApproverRole),
}

/// Urgency of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Routine event.
    Info,
    /// Something the recipient should look at.
    Warning,
    /// Something that demands immediate attention.
    Critical,
}

/// Delivery interface for user-facing events.
pub trait NotificationSink: Send + Sync {
    /// Delivers one notification.
    fn notify(&self, recipient: Recipient, message: &str, severity: Severity);
}

/// Sink that drops every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotificationSink;

impl NotificationSink for NullNotificationSink {
    fn notify(&self, _recipient: Recipient, _message: &str, _severity: Severity) {}
}
