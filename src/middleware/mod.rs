pub mod auth;
pub mod extract;
pub mod response;

pub use auth::{AuthUser, RefreshUser};
pub use extract::{ApiJson, ApiPath};
pub use response::{ApiResponse, ApiResult, Message};
