//! Token 吊销名单
//!
//! 登出时写入 jti，TTL 为 Token 剩余有效期；过期后自然失效。

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use eco_shared::cache::{Cache, CacheKey};

use crate::error::ApiError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RevocationStore: Send + Sync {
    async fn revoke(&self, jti: &str, ttl: Duration) -> Result<(), ApiError>;
    async fn is_revoked(&self, jti: &str) -> Result<bool, ApiError>;
}

/// Redis 实现，多实例共享
pub struct RedisRevocationStore {
    cache: Arc<Cache>,
}

impl RedisRevocationStore {
    pub fn new(cache: Arc<Cache>) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl RevocationStore for RedisRevocationStore {
    async fn revoke(&self, jti: &str, ttl: Duration) -> Result<(), ApiError> {
        self.cache
            .set(&CacheKey::revoked_token(jti), &true, ttl)
            .await?;
        Ok(())
    }

    async fn is_revoked(&self, jti: &str) -> Result<bool, ApiError> {
        Ok(self.cache.exists(&CacheKey::revoked_token(jti)).await?)
    }
}

/// 进程内实现，用于单实例开发环境和测试
#[derive(Default)]
pub struct MemoryRevocationStore {
    revoked: Mutex<HashMap<String, Instant>>,
}

impl MemoryRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RevocationStore for MemoryRevocationStore {
    async fn revoke(&self, jti: &str, ttl: Duration) -> Result<(), ApiError> {
        let mut revoked = self
            .revoked
            .lock()
            .map_err(|_| ApiError::Internal("吊销名单锁已损坏".to_string()))?;

        let now = Instant::now();
        revoked.retain(|_, expires_at| *expires_at > now);
        revoked.insert(jti.to_string(), now + ttl);
        Ok(())
    }

    async fn is_revoked(&self, jti: &str) -> Result<bool, ApiError> {
        let revoked = self
            .revoked
            .lock()
            .map_err(|_| ApiError::Internal("吊销名单锁已损坏".to_string()))?;

        Ok(revoked
            .get(jti)
            .is_some_and(|expires_at| *expires_at > Instant::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_revokes() {
        let store = MemoryRevocationStore::new();
        assert!(!store.is_revoked("abc").await.unwrap());

        store.revoke("abc", Duration::from_secs(60)).await.unwrap();
        assert!(store.is_revoked("abc").await.unwrap());
        assert!(!store.is_revoked("other").await.unwrap());
    }

    #[tokio::test]
    async fn test_memory_store_entry_expires() {
        let store = MemoryRevocationStore::new();
        store.revoke("short", Duration::ZERO).await.unwrap();
        assert!(!store.is_revoked("short").await.unwrap());
    }
}
