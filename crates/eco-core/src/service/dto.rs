//! 服务层数据传输对象
//!
//! 分页参数、状态过滤以及各服务的聚合返回值

use std::str::FromStr;

use serde::Serialize;

use crate::error::{EcoError, Result};
use crate::models::{
    Account, CountedRow, LedgerEntry, MerchItem, Order, OverviewTotals, Profile, Submission,
    Task,
};

/// 任务列表每页条数
pub const TASKS_PER_PAGE: i64 = 9;
/// 流水列表每页条数
pub const TRANSACTIONS_PER_PAGE: i64 = 20;
/// 其他列表默认每页条数
pub const DEFAULT_PAGE_SIZE: i64 = 20;
/// 排行榜人数
pub const LEADERBOARD_SIZE: i64 = 10;
/// 审核后台各榜单条数
pub const OVERVIEW_TOP_N: i64 = 5;
/// 首页展示任务数
pub const HOME_FEATURED_TASKS: i64 = 3;
/// 影响力分数 = 完成任务数 × 该系数
pub const IMPACT_PER_TASK: i64 = 10;

/// 分页请求
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
}

impl PageRequest {
    /// 页码从 1 开始，非法值按第一页处理；每页条数限制在 1..=100
    pub fn new(page: i64, page_size: i64) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.clamp(1, 100),
        }
    }

    /// 超大页码饱和到 i64::MAX，查询结果为空而不是溢出
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }
}

/// 分页结果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

impl<T> Paged<T> {
    pub fn new(items: Vec<T>, total: i64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page,
            page_size: request.page_size,
        }
    }
}

/// 状态过滤：指定状态或全部
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter<S> {
    Only(S),
    All,
}

impl<S> StatusFilter<S>
where
    S: FromStr<Err = EcoError> + Copy,
{
    /// 解析查询参数：缺省取 default，"all" 表示不过滤
    pub fn parse(raw: Option<&str>, default: S) -> Result<Self> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Self::Only(default)),
            Some(s) if s.eq_ignore_ascii_case("all") => Ok(Self::All),
            Some(s) => s.parse().map(Self::Only),
        }
    }

    /// 转为仓储层参数，None 表示全部
    pub fn status(&self) -> Option<S> {
        match self {
            Self::Only(s) => Some(*s),
            Self::All => None,
        }
    }
}

/// 任务详情（登录用户附带自己的提交）
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDetail {
    pub task: Task,
    pub my_submission: Option<Submission>,
}

/// 兑换结果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedemptionReceipt {
    pub order: Order,
    pub item: MerchItem,
    pub new_balance: i64,
}

/// 记账结果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerPosting {
    pub entry: LedgerEntry,
    pub balance_after: i64,
}

/// 流水历史
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionHistory {
    pub entries: Paged<LedgerEntry>,
    pub total_earned: i64,
    pub coin_balance: i64,
}

/// 当前用户
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountWithProfile {
    pub account: Account,
    pub profile: Profile,
}

/// 个人看板
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub completed_tasks: i64,
    pub total_coins_earned: i64,
    pub rank: i64,
    pub impact_score: i64,
    pub unread_notifications: i64,
    pub coin_balance: i64,
}

/// 排行榜条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: i64,
    pub account_id: i64,
    pub username: String,
    pub first_name: String,
    pub completed_tasks: i64,
    pub photo: Option<String>,
}

/// 首页统计
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeStats {
    pub total_tasks: i64,
    pub total_users: i64,
    pub total_submissions: i64,
    pub featured_tasks: Vec<Task>,
}

/// 审核后台概览
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub totals: OverviewTotals,
    pub top_users: Vec<LeaderboardEntry>,
    pub top_tasks: Vec<CountedRow>,
    pub top_items: Vec<CountedRow>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OrderStatus, SubmissionStatus};

    #[test]
    fn test_page_request() {
        let p = PageRequest::new(3, TASKS_PER_PAGE);
        assert_eq!(p.offset(), 18);
        assert_eq!(p.limit(), 9);

        let p = PageRequest::new(0, 1000);
        assert_eq!(p.page, 1);
        assert_eq!(p.offset(), 0);
        assert_eq!(p.limit(), 100);
    }

    #[test]
    fn test_page_request_huge_page_saturates() {
        let p = PageRequest::new(i64::MAX, TASKS_PER_PAGE);
        assert_eq!(p.page, i64::MAX);
        assert_eq!(p.offset(), i64::MAX);

        let p = PageRequest::new(i64::MAX, 100);
        assert_eq!(p.offset(), i64::MAX);

        let p = PageRequest::new(i64::MIN, TASKS_PER_PAGE);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_status_filter_parse() {
        let f = StatusFilter::parse(None, SubmissionStatus::Pending).unwrap();
        assert_eq!(f.status(), Some(SubmissionStatus::Pending));

        let f = StatusFilter::parse(Some("ALL"), SubmissionStatus::Pending).unwrap();
        assert_eq!(f, StatusFilter::All);
        assert_eq!(f.status(), None);

        let f = StatusFilter::parse(Some("shipped"), OrderStatus::Pending).unwrap();
        assert_eq!(f.status(), Some(OrderStatus::Shipped));

        assert!(StatusFilter::parse(Some("bogus"), OrderStatus::Pending).is_err());
    }
}
