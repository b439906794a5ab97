//! 统计读模型

use serde::{Deserialize, Serialize};

/// 排行榜原始行（按通过数降序、账户 ID 升序）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LeaderRow {
    pub account_id: i64,
    pub username: String,
    pub first_name: String,
    #[sqlx(default)]
    pub photo: Option<String>,
    pub completed: i64,
}

/// 个人看板所需的原始数字
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DashboardFigures {
    pub coin_balance: i64,
    pub completed: i64,
    pub total_earned: i64,
    pub unread_notifications: i64,
}

/// 首页统计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct HomeCounts {
    pub active_tasks: i64,
    pub accounts: i64,
    pub approved_submissions: i64,
}

/// 审核后台汇总计数
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OverviewTotals {
    pub accounts: i64,
    pub tasks: i64,
    pub submissions: i64,
    pub pending_submissions: i64,
    pub orders: i64,
    pub pending_orders: i64,
}

/// 通用的 (ID, 名称, 计数) 排名行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CountedRow {
    pub id: i64,
    pub name: String,
    pub count: i64,
}
