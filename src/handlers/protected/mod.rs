pub mod me;
pub mod roles;
pub mod transitions;

pub use me::{me_get, permission_get};
pub use roles::roles_get;
pub use transitions::transition_check_post;
