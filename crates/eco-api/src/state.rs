//! 应用状态定义
//!
//! 包含 Axum 路由共享的连接池、缓存、认证组件和各业务服务

use std::sync::Arc;

use eco_core::{
    AccountService, CatalogService, LedgerService, MerchRepository, NotificationRepository,
    NotificationService, OrderService, RedemptionService, ReviewService, StatsRepository,
    StatsService, SubmissionRepository, TaskRepository, TaskService,
};
use eco_shared::cache::Cache;
use eco_shared::config::{AppConfig, RateLimitConfig};
use sqlx::PgPool;

use crate::auth::{JwtConfig, JwtManager, LoginLimiter, RedisRevocationStore, RevocationStore};
use crate::media::MediaStore;

/// Axum 应用共享状态
///
/// 所有字段都是 Arc 或内部共享的句柄，clone 开销很小
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub cache: Arc<Cache>,
    pub jwt_manager: JwtManager,
    pub revocations: Arc<dyn RevocationStore>,
    pub login_limiter: LoginLimiter,
    pub rate_limit: RateLimitConfig,
    pub media: MediaStore,

    pub accounts: Arc<AccountService>,
    pub ledger: Arc<LedgerService>,
    pub redemption: Arc<RedemptionService>,
    pub review: Arc<ReviewService>,
    pub orders: Arc<OrderService>,
    pub tasks: Arc<TaskService<TaskRepository, SubmissionRepository>>,
    pub catalog: Arc<CatalogService<MerchRepository>>,
    pub notifications: Arc<NotificationService<NotificationRepository>>,
    pub stats: Arc<StatsService<StatsRepository, TaskRepository>>,
}

impl AppState {
    /// 按配置创建应用状态，Token 吊销名单存放在 Redis
    pub fn new(pool: PgPool, cache: Arc<Cache>, config: &AppConfig) -> Self {
        let revocations: Arc<dyn RevocationStore> =
            Arc::new(RedisRevocationStore::new(cache.clone()));
        Self::with_revocation_store(pool, cache, config, revocations)
    }

    pub fn with_revocation_store(
        pool: PgPool,
        cache: Arc<Cache>,
        config: &AppConfig,
        revocations: Arc<dyn RevocationStore>,
    ) -> Self {
        let task_repo = Arc::new(TaskRepository::new(pool.clone()));
        let submission_repo = Arc::new(SubmissionRepository::new(pool.clone()));
        let merch_repo = Arc::new(MerchRepository::new(pool.clone()));
        let notification_repo = Arc::new(NotificationRepository::new(pool.clone()));
        let stats_repo = Arc::new(StatsRepository::new(pool.clone()));

        Self {
            jwt_manager: JwtManager::new(JwtConfig::from(&config.auth)),
            login_limiter: LoginLimiter::new(cache.clone(), &config.auth),
            rate_limit: config.rate_limit.clone(),
            media: MediaStore::new(&config.media),
            revocations,

            accounts: Arc::new(AccountService::new(pool.clone())),
            ledger: Arc::new(LedgerService::new(pool.clone())),
            redemption: Arc::new(RedemptionService::new(pool.clone())),
            review: Arc::new(ReviewService::new(pool.clone())),
            orders: Arc::new(OrderService::new(pool.clone())),
            tasks: Arc::new(TaskService::new(task_repo.clone(), submission_repo)),
            catalog: Arc::new(CatalogService::new(merch_repo)),
            notifications: Arc::new(NotificationService::new(notification_repo)),
            stats: Arc::new(StatsService::new(stats_repo, task_repo)),

            pool,
            cache,
        }
    }
}
