//! 登录限流
//!
//! 按用户名做固定窗口计数（Redis INCR + EXPIRE），窗口内失败次数超限后拒绝登录。
//! Redis 不可用时放行。

use std::sync::Arc;
use std::time::Duration;

use eco_shared::cache::{Cache, CacheKey};
use eco_shared::config::AuthConfig;
use tracing::warn;

use crate::error::{ApiError, Result};

#[derive(Clone)]
pub struct LoginLimiter {
    cache: Arc<Cache>,
    max_attempts: i64,
    window: Duration,
}

impl LoginLimiter {
    pub fn new(cache: Arc<Cache>, config: &AuthConfig) -> Self {
        Self {
            cache,
            max_attempts: config.login_max_attempts,
            window: Duration::from_secs(config.login_window_secs),
        }
    }

    /// max_attempts 为 0 或负数时关闭限流
    pub fn is_enabled(&self) -> bool {
        self.max_attempts > 0
    }

    /// 登录前检查：当前窗口的失败次数是否已达上限
    pub async fn check(&self, username: &str) -> Result<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        let key = CacheKey::login_attempts(username);
        match self.cache.get::<i64>(&key).await {
            Ok(Some(count)) if exceeded(count, self.max_attempts) => {
                warn!(username, count, "Login rate limit reached");
                Err(ApiError::RateLimited)
            }
            Ok(_) => Ok(()),
            Err(e) => {
                warn!(error = %e, "登录限流检查失败，跳过限流");
                Ok(())
            }
        }
    }

    /// 记录一次失败登录
    pub async fn record_failure(&self, username: &str) {
        if !self.is_enabled() {
            return;
        }

        let key = CacheKey::login_attempts(username);
        match self.cache.incr(&key, 1).await {
            // 首次计数时设置窗口过期
            Ok(1) => {
                if let Err(e) = self.cache.expire(&key, self.window).await {
                    warn!(error = %e, "设置登录限流窗口失败");
                }
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "登录失败计数写入失败"),
        }
    }

    /// 登录成功后清零
    pub async fn reset(&self, username: &str) {
        if !self.is_enabled() {
            return;
        }
        if let Err(e) = self.cache.delete(&CacheKey::login_attempts(username)).await {
            warn!(error = %e, "清除登录失败计数失败");
        }
    }
}

fn exceeded(count: i64, max_attempts: i64) -> bool {
    count >= max_attempts
}
