//! 领域枚举类型定义
//!
//! 所有枚举都支持数据库（sqlx）和 JSON（serde）序列化，
//! 状态类枚举额外提供显式的状态流转表。

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EcoError;

/// 提交状态
///
/// 只允许 pending -> approved / pending -> rejected，两个结果状态均为终态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum SubmissionStatus {
    /// 待审核
    #[default]
    Pending,
    /// 已通过，奖励已发放
    Approved,
    /// 已拒绝
    Rejected,
}

impl SubmissionStatus {
    pub const ALL: [SubmissionStatus; 3] = [Self::Pending, Self::Approved, Self::Rejected];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// 状态流转表
    pub fn can_transition_to(&self, next: SubmissionStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Approved) | (Self::Pending, Self::Rejected)
        )
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionStatus {
    type Err = EcoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(EcoError::Validation(format!("未知的提交状态: {}", other))),
        }
    }
}

/// 订单状态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum OrderStatus {
    /// 待处理 - 兑换成功后的初始状态
    #[default]
    Pending,
    /// 已发货
    Shipped,
    /// 已完成
    Completed,
    /// 已取消（不退还金币）
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Shipped => "shipped",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// 面向用户的展示名称，用于通知文案
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Shipped => "Shipped",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    /// 从当前状态出发允许到达的状态
    pub fn allowed_next(&self) -> &'static [OrderStatus] {
        match self {
            Self::Pending => &[Self::Shipped, Self::Completed, Self::Cancelled],
            Self::Shipped => &[Self::Completed, Self::Cancelled],
            Self::Completed | Self::Cancelled => &[],
        }
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        self.allowed_next().contains(&next)
    }

    pub fn is_terminal(&self) -> bool {
        self.allowed_next().is_empty()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = EcoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "shipped" => Ok(Self::Shipped),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(EcoError::Validation(format!("未知的订单状态: {}", other))),
        }
    }
}

/// 流水类型
///
/// earn 记正数，spend 记负数，余额等于全部流水金额之和
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum EntryKind {
    /// 获得（+）
    Earn,
    /// 消费（-）
    Spend,
}

impl EntryKind {
    pub fn sign(&self) -> i64 {
        match self {
            Self::Earn => 1,
            Self::Spend => -1,
        }
    }
}

/// 通知类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "varchar", rename_all = "snake_case")]
pub enum NotificationKind {
    TaskApproved,
    TaskRejected,
    OrderPlaced,
    OrderUpdate,
    General,
}

/// 任务难度
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

/// 任务列表排序方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskSort {
    #[default]
    Newest,
    Oldest,
    RewardHigh,
    RewardLow,
    Deadline,
}

impl TaskSort {
    /// 对应的 ORDER BY 子句，末尾追加 id 保证分页稳定
    pub fn order_by(&self) -> &'static str {
        match self {
            Self::Newest => "created_at DESC, id DESC",
            Self::Oldest => "created_at ASC, id ASC",
            Self::RewardHigh => "reward DESC, id DESC",
            Self::RewardLow => "reward ASC, id ASC",
            Self::Deadline => "deadline ASC NULLS LAST, id ASC",
        }
    }
}
