pub mod auth;
pub mod json;

pub use auth::{CurrentUser, JwtAuth, StaffAuth};
pub use json::ApiJson;
