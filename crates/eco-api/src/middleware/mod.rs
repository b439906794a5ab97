//! 中间件模块
//!
//! 提供认证、审核员权限检查和接口限流中间件

mod auth;
mod moderator;
mod rate_limit;

pub use auth::{auth_middleware, bearer_token};
pub use moderator::require_moderator;
pub use rate_limit::rate_limit_middleware;
