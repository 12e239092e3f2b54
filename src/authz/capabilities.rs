// Capability strings granted per role. Handlers compare against these
// constants, never against ad-hoc literals.

pub const PROJECTS_VIEW: &str = "Projects.View";
pub const PROJECTS_CREATE: &str = "Projects.Create";
pub const PROJECTS_EDIT: &str = "Projects.Edit";
pub const PROJECTS_DELETE: &str = "Projects.Delete";
pub const PROJECTS_APPROVE: &str = "Projects.Approve";

pub const UPDATES_VIEW: &str = "Updates.View";
pub const UPDATES_SUBMIT: &str = "Updates.Submit";
pub const UPDATES_APPROVE: &str = "Updates.Approve";

pub const CHANGE_REQUESTS_VIEW: &str = "ChangeRequests.View";
pub const CHANGE_REQUESTS_SUBMIT: &str = "ChangeRequests.Submit";
pub const CHANGE_REQUESTS_APPROVE: &str = "ChangeRequests.Approve";

pub const DEPARTMENTS_VIEW: &str = "Departments.View";
pub const DEPARTMENTS_MANAGE: &str = "Departments.Manage";

pub const USERS_VIEW: &str = "Users.View";
pub const USERS_MANAGE: &str = "Users.Manage";
pub const ROLES_MANAGE: &str = "Roles.Manage";

pub const REPORTS_VIEW: &str = "Reports.View";
pub const AUDIT_LOGS_VIEW: &str = "AuditLogs.View";

/// Every capability known to the system, in display order.
pub const ALL: &[&str] = &[
    PROJECTS_VIEW,
    PROJECTS_CREATE,
    PROJECTS_EDIT,
    PROJECTS_DELETE,
    PROJECTS_APPROVE,
    UPDATES_VIEW,
    UPDATES_SUBMIT,
    UPDATES_APPROVE,
    CHANGE_REQUESTS_VIEW,
    CHANGE_REQUESTS_SUBMIT,
    CHANGE_REQUESTS_APPROVE,
    DEPARTMENTS_VIEW,
    DEPARTMENTS_MANAGE,
    USERS_VIEW,
    USERS_MANAGE,
    ROLES_MANAGE,
    REPORTS_VIEW,
    AUDIT_LOGS_VIEW,
];

// Named boolean capabilities exposed on Role
pub const MANAGE_PROJECTS: &str = PROJECTS_EDIT;
pub const MANAGE_USERS: &str = USERS_MANAGE;
pub const APPROVE_REQUESTS: &str = CHANGE_REQUESTS_APPROVE;
pub const MANAGE_ROLES: &str = ROLES_MANAGE;
pub const VIEW_REPORTS: &str = REPORTS_VIEW;
pub const VIEW_AUDIT_LOGS: &str = AUDIT_LOGS_VIEW;

/// Returns true when `name` is one of the known capability strings.
pub fn is_known(name: &str) -> bool {
    ALL.contains(&name)
}
