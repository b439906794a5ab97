//! 站内通知实体定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{NotificationKind, OrderStatus};

/// 通知
///
/// 除已读标记外不可变
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i64,
    pub account_id: i64,
    pub message: String,
    pub kind: NotificationKind,
    pub is_read: bool,
    #[sqlx(default)]
    pub link: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// 待写入的通知
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub account_id: i64,
    pub message: String,
    pub kind: NotificationKind,
    pub link: Option<String>,
}

impl NewNotification {
    pub fn task_approved(account_id: i64, task_id: i64, task_title: &str, reward: i64) -> Self {
        Self {
            account_id,
            message: format!(
                "Your submission for \"{}\" has been approved! You earned {} coins.",
                task_title, reward
            ),
            kind: NotificationKind::TaskApproved,
            link: Some(format!("/tasks/{}", task_id)),
        }
    }

    pub fn task_rejected(account_id: i64, task_id: i64, task_title: &str) -> Self {
        Self {
            account_id,
            message: format!("Your submission for \"{}\" was rejected.", task_title),
            kind: NotificationKind::TaskRejected,
            link: Some(format!("/tasks/{}", task_id)),
        }
    }

    pub fn order_placed(account_id: i64, item_name: &str, cost: i64) -> Self {
        Self {
            account_id,
            message: format!(
                "You successfully redeemed {} for {} coins!",
                item_name, cost
            ),
            kind: NotificationKind::OrderPlaced,
            link: Some("/orders".to_string()),
        }
    }

    pub fn order_update(account_id: i64, item_name: &str, status: OrderStatus) -> Self {
        Self {
            account_id,
            message: format!("Your order for {} is now {}.", item_name, status.label()),
            kind: NotificationKind::OrderUpdate,
            link: Some("/orders".to_string()),
        }
    }
}
