use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::authz::{ChangeRequestStatus, ProjectStatus, TransitionGuard, UpdateStatus, WorkflowStatus};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::state::AppState;

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Project,
    WeeklyUpdate,
    ChangeRequest,
}

#[derive(Debug, Deserialize)]
pub struct TransitionCheck {
    pub entity: EntityKind,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Serialize)]
pub struct TransitionDecision {
    pub entity: EntityKind,
    pub from: String,
    pub to: String,
    pub role: String,
    pub allowed: bool,
}

fn check<S: WorkflowStatus>(guard: &TransitionGuard<S>, from: &str, to: &str, role: &str) -> Result<bool, ApiError> {
    let from: S = from.parse()?;
    let to: S = to.parse()?;
    Ok(guard.can_transition(from, to, role))
}

/// POST /api/transitions/check - would the current user be allowed to move
/// an entity between the given statuses
pub async fn transition_check_post(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<TransitionCheck>,
) -> ApiResult<TransitionDecision> {
    let role = user.role.as_str();
    let allowed = match body.entity {
        EntityKind::Project => check::<ProjectStatus>(&state.transitions.project, &body.from, &body.to, role)?,
        EntityKind::WeeklyUpdate => {
            check::<UpdateStatus>(&state.transitions.weekly_update, &body.from, &body.to, role)?
        }
        EntityKind::ChangeRequest => {
            check::<ChangeRequestStatus>(&state.transitions.change_request, &body.from, &body.to, role)?
        }
    };

    Ok(ApiResponse::success(TransitionDecision {
        entity: body.entity,
        from: body.from,
        to: body.to,
        role: user.role,
        allowed,
    }))
}
