//! Plan session
//!
//! Holds the most recent plan and allows a single request in flight.

use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::{GoalInput, GoalPlan};
use crate::planner::{PlanAdapter, PlanError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("A plan request is already in progress")]
    Busy,

    #[error(transparent)]
    Plan(#[from] PlanError),
}

/// Clears the busy flag when dropped
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct PlanSession {
    adapter: PlanAdapter,
    busy: AtomicBool,
    last_plan: Option<GoalPlan>,
}

impl PlanSession {
    pub fn new(adapter: PlanAdapter) -> Self {
        debug!("PlanSession::new: called");
        Self {
            adapter,
            busy: AtomicBool::new(false),
            last_plan: None,
        }
    }

    /// Whether a request is in flight
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// The most recent successful plan
    pub fn last_plan(&self) -> Option<&GoalPlan> {
        self.last_plan.as_ref()
    }

    pub fn adapter(&self) -> &PlanAdapter {
        &self.adapter
    }

    /// Request a plan for `input`
    ///
    /// Rejected with `Busy` while another request is outstanding. On failure
    /// the previous plan is kept.
    pub async fn submit(&mut self, input: &GoalInput) -> Result<&GoalPlan, SessionError> {
        debug!(topic = %input.topic, "PlanSession::submit: called");
        let plan = self.request(input).await?;
        Ok(self.last_plan.insert(plan))
    }

    /// Run one adapter call under the busy flag without touching the stored plan
    pub async fn request(&self, input: &GoalInput) -> Result<GoalPlan, SessionError> {
        let Some(_guard) = BusyGuard::acquire(&self.busy) else {
            warn!("PlanSession::request: rejected, request already in flight");
            return Err(SessionError::Busy);
        };
        Ok(self.adapter.generate_plan(input).await?)
    }

    /// Drop the stored plan, as when starting a new goal
    pub fn reset(&mut self) {
        debug!("PlanSession::reset: called");
        self.last_plan = None;
    }
}
