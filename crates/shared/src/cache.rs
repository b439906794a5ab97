//! Redis 缓存管理模块
//!
//! 提供 Redis 连接管理和常用缓存操作封装。
//! 当前用于 Token 吊销名单和限流计数，业务数据不走缓存。

use crate::config::RedisConfig;
use crate::error::{InfraError, Result};
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client};
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::{info, instrument};

/// Redis 缓存客户端
#[derive(Clone)]
pub struct Cache {
    client: Client,
}

impl Cache {
    /// 创建 Redis 客户端
    ///
    /// 只校验 URL，不建立连接；连接在首次使用时创建
    pub fn new(config: &RedisConfig) -> Result<Self> {
        let client = Client::open(config.url.as_str())?;
        info!("Redis client created");
        Ok(Self { client })
    }

    /// 获取连接
    async fn get_conn(&self) -> Result<MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(InfraError::from)
    }

    /// 健康检查
    pub async fn health_check(&self) -> Result<()> {
        let mut conn = self.get_conn().await?;
        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .map(|_| ())
            .map_err(InfraError::from)
    }

    /// 获取值
    #[instrument(skip(self))]
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let mut conn = self.get_conn().await?;
        let value: Option<String> = conn.get(key).await?;

        match value {
            Some(v) => Ok(Some(serde_json::from_str(&v)?)),
            None => Ok(None),
        }
    }

    /// 设置值
    #[instrument(skip(self, value))]
    pub async fn set<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) -> Result<()> {
        let mut conn = self.get_conn().await?;
        let serialized = serde_json::to_string(value)?;

        // SETEX 不接受 0 秒
        let secs = ttl.as_secs().max(1);
        let _: () = conn.set_ex(key, serialized, secs).await?;
        Ok(())
    }

    /// 删除值
    #[instrument(skip(self))]
    pub async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.get_conn().await?;
        let _: () = conn.del(key).await?;
        Ok(())
    }

    /// 检查键是否存在
    pub async fn exists(&self, key: &str) -> Result<bool> {
        let mut conn = self.get_conn().await?;
        let exists: bool = conn.exists(key).await?;
        Ok(exists)
    }

    /// 增量操作
    pub async fn incr(&self, key: &str, delta: i64) -> Result<i64> {
        let mut conn = self.get_conn().await?;
        let result: i64 = conn.incr(key, delta).await?;
        Ok(result)
    }

    /// 设置过期时间
    pub async fn expire(&self, key: &str, ttl: Duration) -> Result<()> {
        let mut conn = self.get_conn().await?;
        let _: () = conn.expire(key, ttl.as_secs() as i64).await?;
        Ok(())
    }
}

/// 缓存键生成器
pub struct CacheKey;

impl CacheKey {
    pub fn revoked_token(jti: &str) -> String {
        format!("eco:auth:revoked:{}", jti)
    }

    pub fn login_attempts(username: &str) -> String {
        format!("eco:auth:login:{}", username.to_lowercase())
    }

    pub fn rate_limit(client: &str) -> String {
        format!("eco:ratelimit:{}", client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_generation() {
        assert_eq!(CacheKey::revoked_token("abc"), "eco:auth:revoked:abc");
        assert_eq!(CacheKey::login_attempts("Alice"), "eco:auth:login:alice");
        assert_eq!(CacheKey::rate_limit("10.0.0.1"), "eco:ratelimit:10.0.0.1");
    }

    #[test]
    fn test_invalid_url_rejected() {
        let config = RedisConfig {
            url: "not-a-redis-url".to_string(),
            ..Default::default()
        };
        assert!(Cache::new(&config).is_err());
    }
}
