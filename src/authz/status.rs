use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::catalog::role_ids;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown {entity} status: {value}")]
pub struct StatusParseError {
    pub entity: &'static str,
    pub value: String,
}

/// A closed status enumeration for one kind of tracked entity.
pub trait WorkflowStatus:
    Copy + Eq + Hash + fmt::Debug + fmt::Display + FromStr<Err = StatusParseError> + Send + Sync + 'static
{
    /// Entity name used in logs and request bodies
    const ENTITY: &'static str;

    /// Role-class that creates entities of this kind
    const CREATOR_ROLE: &'static str;

    /// Role-class that approves entities of this kind
    const APPROVER_ROLE: &'static str;

    fn all() -> &'static [Self];

    fn as_str(&self) -> &'static str;
}

macro_rules! workflow_status {
    (
        $(#[$meta:meta])*
        $name:ident, entity = $entity:literal, creator = $creator:expr, approver = $approver:expr,
        [$($variant:ident),+ $(,)?]
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl WorkflowStatus for $name {
            const ENTITY: &'static str = $entity;
            const CREATOR_ROLE: &'static str = $creator;
            const APPROVER_ROLE: &'static str = $approver;

            fn all() -> &'static [Self] {
                &[$($name::$variant),+]
            }

            fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = StatusParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $(stringify!($variant) => Ok($name::$variant),)+
                    other => Err(StatusParseError {
                        entity: $entity,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

workflow_status!(
    /// Lifecycle of a project
    ProjectStatus,
    entity = "project",
    creator = role_ids::PROJECT_MANAGER,
    approver = role_ids::PMO,
    [Draft, PendingApproval, Active, OnHold, Completed, Cancelled]
);

workflow_status!(
    /// Lifecycle of a weekly status update
    UpdateStatus,
    entity = "weekly_update",
    creator = role_ids::PROJECT_MANAGER,
    approver = role_ids::PMO,
    [Draft, Submitted, Approved, Rejected]
);

workflow_status!(
    /// Lifecycle of a change request
    ChangeRequestStatus,
    entity = "change_request",
    creator = role_ids::PROJECT_MANAGER,
    approver = role_ids::DEPARTMENT_DIRECTOR,
    [Draft, Submitted, UnderReview, Approved, Rejected, Implemented]
);
