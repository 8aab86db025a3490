pub mod admin_token;
pub mod request_log;

pub use admin_token::{ADMIN_TOKEN_HEADER, admin_token_guard, verify_admin_token};
pub use request_log::RequestLogMiddleware;
