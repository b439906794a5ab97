//! Redis 缓存集成测试
//!
//! 需要可用的 Redis（TEST_REDIS_URL，默认 redis://localhost:6379/1）

use std::time::Duration;

use eco_shared::cache::{Cache, CacheKey};
use eco_shared::test_utils::{test_redis_config, test_username};

fn cache() -> Cache {
    Cache::new(&test_redis_config()).unwrap()
}

#[tokio::test]
#[ignore = "需要 Redis"]
async fn test_set_get_delete() {
    let cache = cache();
    let key = CacheKey::revoked_token(&test_username("jti"));

    cache.set(&key, &true, Duration::from_secs(30)).await.unwrap();
    assert!(cache.exists(&key).await.unwrap());
    assert_eq!(cache.get::<bool>(&key).await.unwrap(), Some(true));

    cache.delete(&key).await.unwrap();
    assert!(!cache.exists(&key).await.unwrap());
    assert_eq!(cache.get::<bool>(&key).await.unwrap(), None);
}

#[tokio::test]
#[ignore = "需要 Redis"]
async fn test_incr_with_expire() {
    let cache = cache();
    let key = CacheKey::rate_limit(&test_username("client"));

    assert_eq!(cache.incr(&key, 1).await.unwrap(), 1);
    cache.expire(&key, Duration::from_secs(30)).await.unwrap();
    assert_eq!(cache.incr(&key, 1).await.unwrap(), 2);

    cache.delete(&key).await.unwrap();
}

#[tokio::test]
#[ignore = "需要 Redis"]
async fn test_health_check() {
    cache().health_check().await.unwrap();
}
