//! 仓储 Trait 定义
//!
//! 定义仓储接口，便于服务层依赖抽象而非具体实现，支持 mock 测试

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    CountedRow, DashboardFigures, HomeCounts, ItemDraft, LeaderRow, MerchItem, Notification,
    OverviewTotals, Submission, SubmissionStatus, SubmissionView, Task, TaskDraft, TaskFilter,
};

/// 任务仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepositoryTrait: Send + Sync {
    async fn list_active(
        &self,
        filter: &TaskFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Task>, i64)>;
    async fn get_active(&self, id: i64) -> Result<Option<Task>>;
    async fn get(&self, id: i64) -> Result<Option<Task>>;
    /// 首页展示：在架任务，推荐优先
    async fn list_featured(&self, limit: i64) -> Result<Vec<Task>>;
    async fn create(&self, draft: &TaskDraft) -> Result<Task>;
    async fn update(&self, id: i64, draft: &TaskDraft) -> Result<Option<Task>>;
    async fn set_example_photo(&self, id: i64, photo: &str) -> Result<Option<Task>>;
}

/// 提交仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionRepositoryTrait: Send + Sync {
    async fn find_for(&self, account_id: i64, task_id: i64) -> Result<Option<Submission>>;
    async fn list_by_account(
        &self,
        account_id: i64,
        status: Option<SubmissionStatus>,
    ) -> Result<Vec<SubmissionView>>;
    /// status 为 None 表示全部
    async fn list_by_status(
        &self,
        status: Option<SubmissionStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<SubmissionView>, i64)>;
}

/// 商品仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MerchRepositoryTrait: Send + Sync {
    /// 在架商品，按价格升序
    async fn list_available(&self) -> Result<Vec<MerchItem>>;
    async fn get(&self, id: i64) -> Result<Option<MerchItem>>;
    async fn create(&self, draft: &ItemDraft) -> Result<MerchItem>;
    async fn update(&self, id: i64, draft: &ItemDraft) -> Result<Option<MerchItem>>;
    async fn set_image(&self, id: i64, image: &str) -> Result<Option<MerchItem>>;
}

/// 通知仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepositoryTrait: Send + Sync {
    async fn list_by_account(
        &self,
        account_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Notification>, i64)>;
    async fn count_unread(&self, account_id: i64) -> Result<i64>;
    /// 仅当通知属于该账户时标记，返回是否命中
    async fn mark_read(&self, id: i64, account_id: i64) -> Result<bool>;
    /// 返回被标记的条数
    async fn mark_all_read(&self, account_id: i64) -> Result<u64>;
}

/// 统计仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatsRepositoryTrait: Send + Sync {
    async fn dashboard_figures(&self, account_id: i64) -> Result<Option<DashboardFigures>>;
    /// 通过数严格大于 completed 的账户数
    async fn count_accounts_above(&self, completed: i64) -> Result<i64>;
    /// 按通过数降序、账户 ID 升序
    async fn top_accounts(&self, limit: i64) -> Result<Vec<LeaderRow>>;
    async fn home_counts(&self) -> Result<HomeCounts>;
    async fn overview_totals(&self) -> Result<OverviewTotals>;
    async fn top_tasks(&self, limit: i64) -> Result<Vec<CountedRow>>;
    async fn top_items(&self, limit: i64) -> Result<Vec<CountedRow>>;
}
