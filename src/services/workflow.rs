use thiserror::Error;
use tracing::info;

use crate::authz::{TransitionGuard, WorkflowStatus};
use crate::database::models::Tracked;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Role '{role}' may not move {entity} from {from} to {to}")]
pub struct TransitionError {
    pub entity: &'static str,
    pub from: String,
    pub to: String,
    pub role: String,
}

/// Move `entity` to `proposed` if the guard allows it for `actor_role`.
/// Returns the previous status.
pub fn apply_transition<T: Tracked>(
    entity: &mut T,
    proposed: T::Status,
    actor_role: &str,
    guard: &TransitionGuard<T::Status>,
) -> Result<T::Status, TransitionError> {
    let current = entity.status();
    if !guard.can_transition(current, proposed, actor_role) {
        return Err(TransitionError {
            entity: <T::Status as WorkflowStatus>::ENTITY,
            from: current.to_string(),
            to: proposed.to_string(),
            role: actor_role.to_string(),
        });
    }

    entity.set_status(proposed);
    info!(
        "{} {} moved {} -> {} by '{}'",
        <T::Status as WorkflowStatus>::ENTITY,
        entity.id(),
        current,
        proposed,
        actor_role
    );
    Ok(current)
}
