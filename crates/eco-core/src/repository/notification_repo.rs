//! 通知仓储

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};

use super::traits::NotificationRepositoryTrait;
use crate::error::Result;
use crate::models::{NewNotification, Notification};

const NOTIFICATION_COLUMNS: &str = "id, account_id, message, kind, is_read, link, created_at";

pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 在事务中写入通知，与触发它的业务变更一起提交
    pub async fn create_in_tx(
        tx: &mut PgConnection,
        notification: &NewNotification,
    ) -> Result<Notification> {
        let created = sqlx::query_as::<_, Notification>(&format!(
            r#"
            INSERT INTO notifications (account_id, message, kind, link)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            NOTIFICATION_COLUMNS
        ))
        .bind(notification.account_id)
        .bind(&notification.message)
        .bind(notification.kind)
        .bind(&notification.link)
        .fetch_one(tx)
        .await?;

        Ok(created)
    }

    pub async fn list_by_account(
        &self,
        account_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Notification>, i64)> {
        let notifications = sqlx::query_as::<_, Notification>(&format!(
            r#"
            SELECT {} FROM notifications
            WHERE account_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
            NOTIFICATION_COLUMNS
        ))
        .bind(account_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE account_id = $1")
                .bind(account_id)
                .fetch_one(&self.pool)
                .await?;

        Ok((notifications, total))
    }

    pub async fn count_unread(&self, account_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE account_id = $1 AND is_read = FALSE",
        )
        .bind(account_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    pub async fn mark_read(&self, id: i64, account_id: i64) -> Result<bool> {
        let result =
            sqlx::query("UPDATE notifications SET is_read = TRUE WHERE id = $1 AND account_id = $2")
                .bind(id)
                .bind(account_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn mark_all_read(&self, account_id: i64) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE account_id = $1 AND is_read = FALSE",
        )
        .bind(account_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl NotificationRepositoryTrait for NotificationRepository {
    async fn list_by_account(
        &self,
        account_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Notification>, i64)> {
        self.list_by_account(account_id, limit, offset).await
    }

    async fn count_unread(&self, account_id: i64) -> Result<i64> {
        self.count_unread(account_id).await
    }

    async fn mark_read(&self, id: i64, account_id: i64) -> Result<bool> {
        self.mark_read(id, account_id).await
    }

    async fn mark_all_read(&self, account_id: i64) -> Result<u64> {
        self.mark_all_read(account_id).await
    }
}
