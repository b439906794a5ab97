//! 认证模块
//!
//! 提供 JWT Token 生成与验证、密码处理、Token 吊销、登录限流和初始审核员

mod bootstrap;
mod jwt;
mod login_limit;
mod password;
mod revocation;

pub use bootstrap::ensure_bootstrap_moderator;
pub use jwt::{Claims, JwtConfig, JwtManager, MODERATOR_ROLE};
pub use login_limit::LoginLimiter;
pub use password::{hash_password, verify_password};
pub use revocation::{MemoryRevocationStore, RedisRevocationStore, RevocationStore};

#[cfg(test)]
pub use revocation::MockRevocationStore;
