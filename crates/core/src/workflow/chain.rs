//! Per-kind approval chains.
//!
//! Each workflow kind supplies an ordered list of pending stages, the role
//! required to act on each, and the terminal status its final approval
//! lands on. Every transition the engine performs is derived from these
//! tables; no chain logic is re-derived per kind.

use super::types::{ApproverRole, RequestStatus, WorkflowKind};

/// One pending stage in an approval chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stage {
    /// The status a request holds while waiting at this stage.
    pub status: RequestStatus,
    /// The role allowed to act on it.
    pub approver: ApproverRole,
}

const OPEX_STAGES: &[Stage] = &[
    Stage {
        status: RequestStatus::PendingHrVerification,
        approver: ApproverRole::Hr,
    },
    Stage {
        status: RequestStatus::PendingFinanceApproval,
        approver: ApproverRole::Finance,
    },
];

const CLAIM_STAGES: &[Stage] = &[Stage {
    status: RequestStatus::Pending,
    approver: ApproverRole::Finance,
}];

const LEAVE_STAGES: &[Stage] = &[Stage {
    status: RequestStatus::Pending,
    approver: ApproverRole::Hr,
}];

const DISPUTE_STAGES: &[Stage] = &[Stage {
    status: RequestStatus::Open,
    approver: ApproverRole::Admin,
}];

impl WorkflowKind {
    /// The ordered pending stages of this kind's chain.
    #[must_use]
    pub const fn stages(self) -> &'static [Stage] {
        match self {
            Self::Opex => OPEX_STAGES,
            Self::InsuranceClaim => CLAIM_STAGES,
            Self::Leave => LEAVE_STAGES,
            Self::Dispute => DISPUTE_STAGES,
        }
    }

    /// The status a freshly submitted request starts in.
    #[must_use]
    pub const fn initial_status(self) -> RequestStatus {
        self.stages()[0].status
    }

    /// The terminal status reached by approving the final stage.
    #[must_use]
    pub const fn approved_status(self) -> RequestStatus {
        match self {
            Self::Dispute => RequestStatus::Resolved,
            _ => RequestStatus::Approved,
        }
    }

    /// Whether this kind moves money on final approval.
    #[must_use]
    pub const fn disburses(self) -> bool {
        !matches!(self, Self::Leave)
    }

    /// Index of `status` within this kind's chain, if it is a pending
    /// stage of that chain.
    #[must_use]
    pub fn stage_index(self, status: RequestStatus) -> Option<usize> {
        self.stages().iter().position(|stage| stage.status == status)
    }

    /// The stage after `status`, or `None` when `status` is the final
    /// pending stage (or not a stage of this chain at all).
    #[must_use]
    pub fn next_stage(self, status: RequestStatus) -> Option<Stage> {
        let index = self.stage_index(status)?;
        self.stages().get(index + 1).copied()
    }

    /// The role required to act while a request sits at `status`.
    #[must_use]
    pub fn required_approver(self, status: RequestStatus) -> Option<ApproverRole> {
        self.stage_index(status)
            .map(|index| self.stages()[index].approver)
    }
}
