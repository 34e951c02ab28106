//! Approval request repository interface and in-memory store.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use dompet_shared::RequestId;

use super::types::{ApprovalRequest, RequestStatus, WorkflowKind};

/// Storage interface for approval requests.
///
/// Records are written on submission and rewritten only by the workflow
/// engine's `advance`; terminal requests are retained, never deleted.
pub trait ApprovalRequestRepository: Send + Sync {
    /// Stores a newly submitted request.
    fn insert(&self, request: ApprovalRequest);

    /// Reads a request by ID.
    fn get(&self, id: RequestId) -> Option<ApprovalRequest>;

    /// Writes back an updated request.
    fn put(&self, request: ApprovalRequest);

    /// Lists disputes still in `Open` status, oldest first.
    fn open_disputes(&self) -> Vec<ApprovalRequest>;
}

/// In-memory approval request store.
#[derive(Debug, Default)]
pub struct InMemoryRequestStore {
    requests: RwLock<HashMap<RequestId, ApprovalRequest>>,
}

impl InMemoryRequestStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ApprovalRequestRepository for InMemoryRequestStore {
    fn insert(&self, request: ApprovalRequest) {
        self.requests
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(request.id, request);
    }

    fn get(&self, id: RequestId) -> Option<ApprovalRequest> {
        self.requests
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    fn put(&self, request: ApprovalRequest) {
        self.requests
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(request.id, request);
    }

    fn open_disputes(&self) -> Vec<ApprovalRequest> {
        let mut disputes: Vec<ApprovalRequest> = self
            .requests
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|r| r.kind == WorkflowKind::Dispute && r.status == RequestStatus::Open)
            .cloned()
            .collect();
        disputes.sort_by_key(|r| r.submitted_at);
        disputes
    }
}
