pub mod identity;
pub mod response;

pub use identity::{identity_middleware, CurrentUser};
pub use response::{ApiResponse, ApiResult};
