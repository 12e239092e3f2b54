//! Role-based authorization: the role catalog, capability strings and the
//! status transition guards consulted by handlers and view helpers.

pub mod capabilities;
pub mod catalog;
pub mod status;
pub mod transitions;

pub use catalog::{CatalogError, Role, RoleCatalog, LOWEST_RANK};
pub use status::{ChangeRequestStatus, ProjectStatus, StatusParseError, UpdateStatus, WorkflowStatus};
pub use transitions::{TransitionGuard, Transitions};
