pub mod change_request;
pub mod department;
pub mod project;
pub mod user;
pub mod weekly_update;

pub use change_request::ChangeRequest;
pub use department::Department;
pub use project::Project;
pub use user::{NewShadowUser, User};
pub use weekly_update::WeeklyUpdate;

use uuid::Uuid;

use crate::authz::WorkflowStatus;

/// An entity whose lifecycle is gated by a transition guard
pub trait Tracked {
    type Status: WorkflowStatus;

    fn id(&self) -> Uuid;

    fn status(&self) -> Self::Status;

    fn set_status(&mut self, status: Self::Status);
}
