use axum::extract::{Path, State};
use serde::Serialize;

use crate::authz::{ChangeRequestStatus, ProjectStatus, UpdateStatus};
use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AllowedTargets {
    pub project: Vec<ProjectStatus>,
    pub weekly_update: Vec<UpdateStatus>,
    pub change_request: Vec<ChangeRequestStatus>,
}

#[derive(Debug, Serialize)]
pub struct MeView {
    pub user: User,
    pub role_name: Option<String>,
    pub hierarchy_level: i32,
    pub capabilities: Vec<String>,
    pub transitions: AllowedTargets,
}

/// GET /api/me - the resolved user with everything view helpers need to
/// decide what to show
pub async fn me_get(State(state): State<AppState>, CurrentUser(user): CurrentUser) -> ApiResult<MeView> {
    let role = user.role.as_str();
    let transitions = AllowedTargets {
        project: state.transitions.project.allowed_targets(role),
        weekly_update: state.transitions.weekly_update.allowed_targets(role),
        change_request: state.transitions.change_request.allowed_targets(role),
    };

    let view = MeView {
        role_name: state.catalog.role(role).map(|r| r.display_name.clone()),
        hierarchy_level: state.catalog.level_of(role),
        capabilities: state.catalog.capabilities_of(role).into_iter().collect(),
        transitions,
        user,
    };
    Ok(ApiResponse::success(view))
}

#[derive(Debug, Serialize)]
pub struct PermissionView {
    pub capability: String,
    pub granted: bool,
}

/// GET /api/me/permissions/:capability
pub async fn permission_get(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(capability): Path<String>,
) -> ApiResult<PermissionView> {
    let granted = state.catalog.has_permission(&user.role, &capability);
    Ok(ApiResponse::success(PermissionView { capability, granted }))
}
