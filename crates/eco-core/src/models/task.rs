//! 环保任务与提交实体定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{Difficulty, SubmissionStatus, TaskSort};

/// 默认任务奖励
pub const DEFAULT_TASK_REWARD: i64 = 10;

/// 环保任务
///
/// 停用的任务不出现在列表、详情和提交入口
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub reward: i64,
    #[sqlx(default)]
    pub deadline: Option<DateTime<Utc>>,
    pub difficulty: Difficulty,
    pub is_featured: bool,
    #[sqlx(default)]
    pub example_photo: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// 截止时间已过（无截止时间视为永不过期）
    pub fn is_past_deadline(&self, now: DateTime<Utc>) -> bool {
        self.deadline.is_some_and(|d| now > d)
    }
}

/// 任务创建/更新参数（审核员后台）
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub reward: i64,
    pub deadline: Option<DateTime<Utc>>,
    pub difficulty: Difficulty,
    pub is_featured: bool,
    pub is_active: bool,
}

/// 任务列表过滤条件
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub difficulty: Option<Difficulty>,
    pub featured_only: bool,
    /// 标题或描述模糊匹配（不区分大小写）
    pub search: Option<String>,
    pub sort: TaskSort,
}

impl TaskFilter {
    /// ILIKE 模式，转义通配符
    pub fn search_pattern(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                let escaped = s
                    .replace('\\', "\\\\")
                    .replace('%', "\\%")
                    .replace('_', "\\_");
                format!("%{}%", escaped)
            })
    }
}

/// 任务提交
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: i64,
    pub account_id: i64,
    pub task_id: i64,
    pub description: String,
    pub image: String,
    pub status: SubmissionStatus,
    pub moderator_comment: String,
    pub created_at: DateTime<Utc>,
    #[sqlx(default)]
    pub reviewed_at: Option<DateTime<Utc>>,
}

/// 提交列表视图（关联任务和提交人）
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionView {
    pub id: i64,
    pub account_id: i64,
    pub username: String,
    pub task_id: i64,
    pub task_title: String,
    pub task_reward: i64,
    pub description: String,
    pub image: String,
    pub status: SubmissionStatus,
    pub moderator_comment: String,
    pub created_at: DateTime<Utc>,
    #[sqlx(default)]
    pub reviewed_at: Option<DateTime<Utc>>,
}

/// 新提交
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub account_id: i64,
    pub task_id: i64,
    pub description: String,
    /// 已落盘的图片相对路径
    pub image: String,
}
