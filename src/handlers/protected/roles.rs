use axum::extract::State;
use serde::Serialize;

use crate::authz::Role;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct RoleView {
    #[serde(flatten)]
    pub role: Role,
    pub manage_projects: bool,
    pub manage_users: bool,
    pub approve_requests: bool,
    pub manage_roles: bool,
    pub view_reports: bool,
    pub view_audit_logs: bool,
}

impl From<&Role> for RoleView {
    fn from(role: &Role) -> Self {
        Self {
            manage_projects: role.can_manage_projects(),
            manage_users: role.can_manage_users(),
            approve_requests: role.can_approve_requests(),
            manage_roles: role.can_manage_roles(),
            view_reports: role.can_view_reports(),
            view_audit_logs: role.can_view_audit_logs(),
            role: role.clone(),
        }
    }
}

/// GET /api/roles - the role catalog, most senior first
pub async fn roles_get(State(state): State<AppState>) -> ApiResult<Vec<RoleView>> {
    let roles = state.catalog.roles().into_iter().map(RoleView::from).collect();
    Ok(ApiResponse::success(roles))
}
