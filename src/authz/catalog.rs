use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::capabilities as cap;

/// Rank assigned to roles that are missing from the hierarchy table.
pub const LOWEST_RANK: i32 = 10;

/// Role identifiers seeded at startup
pub mod role_ids {
    pub const ADMIN: &str = "Admin";
    pub const PMO: &str = "PMO";
    pub const DEPARTMENT_DIRECTOR: &str = "DepartmentDirector";
    pub const PROJECT_MANAGER: &str = "ProjectManager";
    pub const TEAM_MEMBER: &str = "TeamMember";
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Duplicate role id: {0}")]
    DuplicateRole(String),

    #[error("Role id cannot be empty")]
    EmptyRoleId,
}

/// Immutable role reference data
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Role {
    pub id: String,
    pub display_name: String,
    pub hierarchy_level: i32,
    pub capabilities: BTreeSet<String>,
}

impl Role {
    pub fn new(id: &str, display_name: &str, hierarchy_level: i32, capabilities: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            hierarchy_level,
            capabilities: capabilities.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn grants(&self, capability: &str) -> bool {
        self.capabilities.contains(capability)
    }

    pub fn can_manage_projects(&self) -> bool {
        self.grants(cap::MANAGE_PROJECTS)
    }

    pub fn can_manage_users(&self) -> bool {
        self.grants(cap::MANAGE_USERS)
    }

    pub fn can_approve_requests(&self) -> bool {
        self.grants(cap::APPROVE_REQUESTS)
    }

    pub fn can_manage_roles(&self) -> bool {
        self.grants(cap::MANAGE_ROLES)
    }

    pub fn can_view_reports(&self) -> bool {
        self.grants(cap::VIEW_REPORTS)
    }

    pub fn can_view_audit_logs(&self) -> bool {
        self.grants(cap::VIEW_AUDIT_LOGS)
    }
}

/// Lookup table from role id to role. Built once at startup and shared by
/// reference; there is no way to mutate it after construction.
#[derive(Debug, Clone)]
pub struct RoleCatalog {
    roles: HashMap<String, Role>,
}

impl RoleCatalog {
    /// Build a catalog from an explicit role list
    pub fn new(roles: Vec<Role>) -> Result<Self, CatalogError> {
        let mut map = HashMap::with_capacity(roles.len());
        for role in roles {
            if role.id.trim().is_empty() {
                return Err(CatalogError::EmptyRoleId);
            }
            if map.contains_key(&role.id) {
                return Err(CatalogError::DuplicateRole(role.id));
            }
            map.insert(role.id.clone(), role);
        }
        Ok(Self { roles: map })
    }

    /// The roles the PMO tracker ships with
    pub fn seeded() -> Self {
        use role_ids::*;

        let pmo = [
            cap::PROJECTS_VIEW,
            cap::PROJECTS_CREATE,
            cap::PROJECTS_EDIT,
            cap::PROJECTS_DELETE,
            cap::PROJECTS_APPROVE,
            cap::UPDATES_VIEW,
            cap::UPDATES_SUBMIT,
            cap::UPDATES_APPROVE,
            cap::CHANGE_REQUESTS_VIEW,
            cap::CHANGE_REQUESTS_SUBMIT,
            cap::CHANGE_REQUESTS_APPROVE,
            cap::DEPARTMENTS_VIEW,
            cap::DEPARTMENTS_MANAGE,
            cap::USERS_VIEW,
            cap::USERS_MANAGE,
            cap::REPORTS_VIEW,
            cap::AUDIT_LOGS_VIEW,
        ];
        let director = [
            cap::PROJECTS_VIEW,
            cap::PROJECTS_APPROVE,
            cap::UPDATES_VIEW,
            cap::UPDATES_APPROVE,
            cap::CHANGE_REQUESTS_VIEW,
            cap::CHANGE_REQUESTS_APPROVE,
            cap::DEPARTMENTS_VIEW,
            cap::USERS_VIEW,
            cap::REPORTS_VIEW,
        ];
        let project_manager = [
            cap::PROJECTS_VIEW,
            cap::PROJECTS_CREATE,
            cap::PROJECTS_EDIT,
            cap::UPDATES_VIEW,
            cap::UPDATES_SUBMIT,
            cap::CHANGE_REQUESTS_VIEW,
            cap::CHANGE_REQUESTS_SUBMIT,
            cap::DEPARTMENTS_VIEW,
            cap::REPORTS_VIEW,
        ];
        let team_member = [cap::PROJECTS_VIEW, cap::UPDATES_VIEW, cap::CHANGE_REQUESTS_VIEW];

        let roles = vec![
            Role::new(ADMIN, "Administrator", 100, cap::ALL),
            Role::new(PMO, "PMO Officer", 80, &pmo),
            Role::new(DEPARTMENT_DIRECTOR, "Department Director", 60, &director),
            Role::new(PROJECT_MANAGER, "Project Manager", 40, &project_manager),
            Role::new(TEAM_MEMBER, "Team Member", 20, &team_member),
        ];

        // Seeded ids are distinct constants
        Self {
            roles: roles.into_iter().map(|r| (r.id.clone(), r)).collect(),
        }
    }

    pub fn role(&self, id: &str) -> Option<&Role> {
        self.roles.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.roles.contains_key(id)
    }

    /// All roles, most senior first
    pub fn roles(&self) -> Vec<&Role> {
        let mut roles: Vec<&Role> = self.roles.values().collect();
        roles.sort_by(|a, b| b.hierarchy_level.cmp(&a.hierarchy_level).then_with(|| a.id.cmp(&b.id)));
        roles
    }

    /// Deny by default: an unknown role has no capabilities.
    pub fn has_permission(&self, role: &str, capability: &str) -> bool {
        self.roles
            .get(role)
            .map(|r| r.grants(capability))
            .unwrap_or(false)
    }

    pub fn capabilities_of(&self, role: &str) -> BTreeSet<String> {
        self.roles
            .get(role)
            .map(|r| r.capabilities.clone())
            .unwrap_or_default()
    }

    pub fn level_of(&self, role: &str) -> i32 {
        self.roles
            .get(role)
            .map(|r| r.hierarchy_level)
            .unwrap_or(LOWEST_RANK)
    }

    /// True when `role_a` is strictly more senior than `role_b`.
    pub fn has_higher_rank(&self, role_a: &str, role_b: &str) -> bool {
        self.level_of(role_a) > self.level_of(role_b)
    }
}

impl Default for RoleCatalog {
    fn default() -> Self {
        Self::seeded()
    }
}

#[cfg(test)]
mod tests {
    use super::role_ids::*;
    use super::*;

    #[test]
    fn denies_capabilities_outside_role_set() {
        let catalog = RoleCatalog::seeded();
        for role in catalog.roles() {
            for capability in cap::ALL {
                let expected = role.capabilities.contains(*capability);
                assert_eq!(
                    catalog.has_permission(&role.id, capability),
                    expected,
                    "{} / {}",
                    role.id,
                    capability
                );
            }
            assert!(!catalog.has_permission(&role.id, "Projects.Teleport"));
        }
    }

    #[test]
    fn unknown_role_has_no_permissions() {
        let catalog = RoleCatalog::seeded();
        for capability in cap::ALL {
            assert!(!catalog.has_permission("Intern", capability));
        }
        assert!(catalog.capabilities_of("Intern").is_empty());
    }

    #[test]
    fn role_ids_are_case_sensitive() {
        let catalog = RoleCatalog::seeded();
        assert!(catalog.has_permission(ADMIN, cap::ROLES_MANAGE));
        assert!(!catalog.has_permission("admin", cap::ROLES_MANAGE));
    }

    #[test]
    fn only_admin_manages_roles() {
        let catalog = RoleCatalog::seeded();
        let managers: Vec<&str> = catalog
            .roles()
            .into_iter()
            .filter(|r| r.can_manage_roles())
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(managers, vec![ADMIN]);
    }

    #[test]
    fn named_capabilities_follow_capability_set() {
        let catalog = RoleCatalog::seeded();
        let pm = catalog.role(PROJECT_MANAGER).unwrap();
        assert!(pm.can_manage_projects());
        assert!(pm.can_view_reports());
        assert!(!pm.can_approve_requests());
        assert!(!pm.can_manage_users());
        assert!(!pm.can_view_audit_logs());

        let director = catalog.role(DEPARTMENT_DIRECTOR).unwrap();
        assert!(director.can_approve_requests());
        assert!(!director.can_manage_projects());

        let member = catalog.role(TEAM_MEMBER).unwrap();
        assert!(!member.can_manage_projects());
        assert!(!member.can_view_reports());
    }

    #[test]
    fn ranks_compare_by_level() {
        let catalog = RoleCatalog::seeded();
        assert!(catalog.has_higher_rank(ADMIN, PMO));
        assert!(catalog.has_higher_rank(PROJECT_MANAGER, TEAM_MEMBER));
        assert!(!catalog.has_higher_rank(TEAM_MEMBER, PROJECT_MANAGER));
        assert!(!catalog.has_higher_rank(PMO, PMO));
    }

    #[test]
    fn unknown_roles_rank_lowest() {
        let catalog = RoleCatalog::seeded();
        assert_eq!(catalog.level_of("Contractor"), LOWEST_RANK);
        assert!(catalog.has_higher_rank(TEAM_MEMBER, "Contractor"));
        assert!(!catalog.has_higher_rank("Contractor", "Visitor"));
    }

    #[test]
    fn roles_are_listed_most_senior_first() {
        let catalog = RoleCatalog::seeded();
        let ids: Vec<&str> = catalog.roles().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec![ADMIN, PMO, DEPARTMENT_DIRECTOR, PROJECT_MANAGER, TEAM_MEMBER]);
    }

    #[test]
    fn custom_catalog_rejects_duplicates() {
        let err = RoleCatalog::new(vec![
            Role::new("Auditor", "Auditor", 50, &[cap::AUDIT_LOGS_VIEW]),
            Role::new("Auditor", "Auditor 2", 55, &[]),
        ])
        .unwrap_err();
        assert_eq!(err, CatalogError::DuplicateRole("Auditor".to_string()));

        let err = RoleCatalog::new(vec![Role::new(" ", "Blank", 1, &[])]).unwrap_err();
        assert_eq!(err, CatalogError::EmptyRoleId);
    }

    #[test]
    fn custom_catalog_resolves_its_own_roles() {
        let catalog =
            RoleCatalog::new(vec![Role::new("Auditor", "Auditor", 50, &[cap::AUDIT_LOGS_VIEW])]).unwrap();
        assert!(catalog.has_permission("Auditor", cap::AUDIT_LOGS_VIEW));
        assert!(!catalog.has_permission(ADMIN, cap::AUDIT_LOGS_VIEW));
    }
}
