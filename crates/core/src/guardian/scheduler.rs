//! Periodic sweep over open disputes.
//!
//! Each tick reads the open disputes, auto-refunds those whose order total
//! sits below the configured threshold, and escalates those open past the
//! escalation window. The sweep runs on a fixed timer and exposes an
//! explicit shutdown handle so it can be stopped deterministically during
//! shutdown or in tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::Utc;
use dompet_shared::GuardianConfig;
use tokio::sync::Notify;
use tracing::{debug, info, warn};

use crate::notify::{NotificationSink, Recipient, Severity};
use crate::workflow::{
    Actor, AdvanceContext, ApprovalRequest, ApprovalRequestRepository, ApprovalWorkflowEngine,
    ApproverRole, Decision, OrderDirectory, WorkflowError,
};

/// Externally supplied on/off switch for the sweep.
///
/// Checked on every tick, so the sweep can be toggled at runtime without
/// restarting the scheduler.
pub trait FeatureToggle: Send + Sync {
    /// Whether the sweep should run.
    fn is_enabled(&self) -> bool;
}

impl FeatureToggle for AtomicBool {
    fn is_enabled(&self) -> bool {
        self.load(Ordering::Relaxed)
    }
}

/// Background scheduler that sweeps open disputes.
///
/// Disputes are processed sequentially within a tick; a tick completes
/// before the timer rearms.
pub struct GuardianScheduler {
    requests: Arc<dyn ApprovalRequestRepository>,
    orders: Arc<dyn OrderDirectory>,
    engine: Arc<ApprovalWorkflowEngine>,
    notifier: Arc<dyn NotificationSink>,
    toggle: Arc<dyn FeatureToggle>,
    config: GuardianConfig,
    shutdown: Notify,
}

impl GuardianScheduler {
    /// Creates a scheduler over the given collaborators.
    #[must_use]
    pub fn new(
        requests: Arc<dyn ApprovalRequestRepository>,
        orders: Arc<dyn OrderDirectory>,
        engine: Arc<ApprovalWorkflowEngine>,
        notifier: Arc<dyn NotificationSink>,
        toggle: Arc<dyn FeatureToggle>,
        config: GuardianConfig,
    ) -> Self {
        Self {
            requests,
            orders,
            engine,
            notifier,
            toggle,
            config,
            shutdown: Notify::new(),
        }
    }

    /// Runs one sweep. A no-op while the feature toggle is off.
    ///
    /// Each dispute is processed independently: a failure is logged and
    /// the sweep continues with the rest. Resolution is idempotent by
    /// construction, since a resolved dispute no longer appears in the
    /// open-dispute scan.
    pub fn tick(&self) {
        if !self.toggle.is_enabled() {
            debug!("guardian sweep disabled, skipping tick");
            return;
        }

        for dispute in self.requests.open_disputes() {
            if let Err(error) = self.process_dispute(&dispute) {
                warn!(request = %dispute.id, %error, "guardian sweep failed for dispute");
            }
        }
    }

    fn process_dispute(&self, dispute: &ApprovalRequest) -> Result<(), WorkflowError> {
        let Some(detail) = dispute.as_dispute() else {
            return Ok(());
        };
        let total = self
            .orders
            .order_total(detail.order_id)
            .ok_or(WorkflowError::OrderNotFound(detail.order_id))?;

        if total < self.config.auto_resolve_threshold {
            self.engine.advance(
                dispute.id,
                &Actor::Guardian,
                Decision::GrantRefund,
                &AdvanceContext::default(),
            )?;
            info!(
                request = %dispute.id,
                order = %detail.order_id,
                total,
                "dispute auto-resolved by guardian"
            );
            self.notifier.notify(
                Recipient::Role(ApproverRole::Admin),
                &format!(
                    "Dispute {} auto-resolved with a refund of {total}",
                    dispute.id
                ),
                Severity::Info,
            );
        } else if self.age_days(dispute) > self.config.escalation_window_days {
            // Stateless on purpose: an over-age dispute re-notifies on
            // every tick until an administrator acts on it.
            warn!(request = %dispute.id, "open dispute exceeded the escalation window");
            self.notifier.notify(
                Recipient::Role(ApproverRole::Admin),
                &format!(
                    "Dispute {} has been open for more than {} days and needs attention",
                    dispute.id, self.config.escalation_window_days
                ),
                Severity::Warning,
            );
        }
        Ok(())
    }

    fn age_days(&self, dispute: &ApprovalRequest) -> i64 {
        (Utc::now() - dispute.submitted_at).num_days()
    }

    /// Spawns the periodic sweep loop.
    ///
    /// The first tick fires immediately; later ticks follow the configured
    /// interval, skipping missed ones rather than bunching them up.
    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        let scheduler = self;
        tokio::spawn(async move {
            info!(
                interval_secs = scheduler.config.tick_interval_secs,
                threshold = scheduler.config.auto_resolve_threshold,
                "guardian scheduler started"
            );

            let mut interval =
                tokio::time::interval(Duration::from_secs(scheduler.config.tick_interval_secs));
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    () = scheduler.shutdown.notified() => {
                        info!("guardian scheduler received shutdown signal");
                        break;
                    }
                    _ = interval.tick() => scheduler.tick(),
                }
            }
        })
    }

    /// Requests graceful shutdown of the sweep loop.
    pub fn shutdown(&self) {
        self.shutdown.notify_one();
    }
}
