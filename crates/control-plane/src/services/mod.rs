// Services layer for business logic
// Services own validation and logging, calling storage directly

pub mod error;
pub mod tenant;
pub mod user;

pub use error::{ServiceError, ServiceResult};
pub use tenant::TenantService;
pub use user::UserService;
