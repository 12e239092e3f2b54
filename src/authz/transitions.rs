use std::collections::{HashMap, HashSet};

use super::catalog::role_ids::*;
use super::status::{ChangeRequestStatus, ProjectStatus, UpdateStatus, WorkflowStatus};

/// Maps each actor role to the set of states it may move an entity into.
///
/// The guard only looks at the proposed state. The current state is accepted
/// for call-site symmetry and logged, but it does not take part in the
/// decision: a role may request any state in its allowed set from anywhere.
#[derive(Debug, Clone)]
pub struct TransitionGuard<S: WorkflowStatus> {
    allowed: HashMap<String, HashSet<S>>,
}

impl<S: WorkflowStatus> TransitionGuard<S> {
    pub fn new() -> Self {
        Self {
            allowed: HashMap::new(),
        }
    }

    pub fn allow(mut self, role: &str, targets: &[S]) -> Self {
        self.allowed
            .entry(role.to_string())
            .or_default()
            .extend(targets.iter().copied());
        self
    }

    pub fn allow_all(self, role: &str) -> Self {
        self.allow(role, S::all())
    }

    pub fn can_transition(&self, current: S, proposed: S, actor_role: &str) -> bool {
        let Some(targets) = self.allowed.get(actor_role) else {
            tracing::debug!(
                "{} transition {} -> {} denied: role '{}' has no transition entry",
                S::ENTITY,
                current,
                proposed,
                actor_role
            );
            return false;
        };

        let allowed = targets.contains(&proposed);
        tracing::debug!(
            "{} transition {} -> {} for '{}': {}",
            S::ENTITY,
            current,
            proposed,
            actor_role,
            if allowed { "allowed" } else { "denied" }
        );
        allowed
    }

    /// States `role` may move an entity into, in declaration order
    pub fn allowed_targets(&self, role: &str) -> Vec<S> {
        match self.allowed.get(role) {
            Some(targets) => S::all().iter().copied().filter(|s| targets.contains(s)).collect(),
            None => Vec::new(),
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.allowed.contains_key(role)
    }
}

impl<S: WorkflowStatus> Default for TransitionGuard<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// The three guards used by the tracker
#[derive(Debug, Clone)]
pub struct Transitions {
    pub project: TransitionGuard<ProjectStatus>,
    pub weekly_update: TransitionGuard<UpdateStatus>,
    pub change_request: TransitionGuard<ChangeRequestStatus>,
}

impl Transitions {
    pub fn seeded() -> Self {
        use ChangeRequestStatus as Cr;
        use ProjectStatus as P;
        use UpdateStatus as U;

        let project = TransitionGuard::new()
            .allow_all(ADMIN)
            .allow_all(PMO)
            .allow(DEPARTMENT_DIRECTOR, &[P::PendingApproval, P::Active, P::OnHold, P::Cancelled])
            .allow(
                PROJECT_MANAGER,
                &[P::Draft, P::PendingApproval, P::Active, P::OnHold, P::Completed],
            );

        let weekly_update = TransitionGuard::new()
            .allow_all(ADMIN)
            .allow(PMO, &[U::Approved, U::Rejected])
            .allow(DEPARTMENT_DIRECTOR, &[U::Approved, U::Rejected])
            .allow(PROJECT_MANAGER, &[U::Draft, U::Submitted]);

        let change_request = TransitionGuard::new()
            .allow_all(ADMIN)
            .allow(PMO, &[Cr::UnderReview, Cr::Approved, Cr::Rejected, Cr::Implemented])
            .allow(DEPARTMENT_DIRECTOR, &[Cr::UnderReview, Cr::Approved, Cr::Rejected])
            .allow(PROJECT_MANAGER, &[Cr::Draft, Cr::Submitted]);

        Self {
            project,
            weekly_update,
            change_request,
        }
    }
}

impl Default for Transitions {
    fn default() -> Self {
        Self::seeded()
    }
}
