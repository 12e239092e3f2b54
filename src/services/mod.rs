pub mod account;
pub mod assignment;
pub mod identity_sync;
pub mod workflow;

pub use account::{AccountService, AuthError, DisabledProvider, IdentityProvider, ProviderError};
pub use assignment::{AssignmentError, AssignmentRules};
pub use identity_sync::{IdentityAssertion, IdentitySync, SyncError};
pub use workflow::{apply_transition, TransitionError};
