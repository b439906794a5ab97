//! 通知查询服务
//!
//! 通知由各工作流在事务内写入，这里只负责读取和标记已读。

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::actor::Actor;
use crate::error::{EcoError, Result};
use crate::models::Notification;
use crate::repository::NotificationRepositoryTrait;
use crate::service::dto::{DEFAULT_PAGE_SIZE, PageRequest, Paged};

pub struct NotificationService<NR>
where
    NR: NotificationRepositoryTrait,
{
    notification_repo: Arc<NR>,
}

impl<NR> NotificationService<NR>
where
    NR: NotificationRepositoryTrait,
{
    pub fn new(notification_repo: Arc<NR>) -> Self {
        Self { notification_repo }
    }

    /// 当前用户的通知，最新在前
    pub async fn list(&self, actor: &Actor, page: i64) -> Result<Paged<Notification>> {
        let request = PageRequest::new(page, DEFAULT_PAGE_SIZE);
        let (items, total) = self
            .notification_repo
            .list_by_account(actor.account_id, request.limit(), request.offset())
            .await?;

        Ok(Paged::new(items, total, request))
    }

    pub async fn unread_count(&self, actor: &Actor) -> Result<i64> {
        self.notification_repo.count_unread(actor.account_id).await
    }

    /// 标记单条已读；他人的通知视为不存在
    #[instrument(skip(self, actor), fields(account_id = actor.account_id))]
    pub async fn mark_read(&self, actor: &Actor, notification_id: i64) -> Result<()> {
        let hit = self
            .notification_repo
            .mark_read(notification_id, actor.account_id)
            .await?;

        if !hit {
            return Err(EcoError::NotificationNotFound(notification_id));
        }
        Ok(())
    }

    #[instrument(skip(self, actor), fields(account_id = actor.account_id))]
    pub async fn mark_all_read(&self, actor: &Actor) -> Result<u64> {
        let updated = self
            .notification_repo
            .mark_all_read(actor.account_id)
            .await?;
        debug!(updated, "Notifications marked as read");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockNotificationRepositoryTrait;

    fn alice() -> Actor {
        Actor::new(3, "alice", false)
    }

    #[tokio::test]
    async fn test_mark_read_foreign_notification() {
        let mut repo = MockNotificationRepositoryTrait::new();
        repo.expect_mark_read()
            .withf(|id, account_id| *id == 11 && *account_id == 3)
            .returning(|_, _| Ok(false));

        let err = NotificationService::new(Arc::new(repo))
            .mark_read(&alice(), 11)
            .await
            .unwrap_err();
        assert!(matches!(err, EcoError::NotificationNotFound(11)));
    }

    #[tokio::test]
    async fn test_mark_read_own_notification() {
        let mut repo = MockNotificationRepositoryTrait::new();
        repo.expect_mark_read().returning(|_, _| Ok(true));

        NotificationService::new(Arc::new(repo))
            .mark_read(&alice(), 11)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_list_scoped_to_actor() {
        let mut repo = MockNotificationRepositoryTrait::new();
        repo.expect_list_by_account()
            .withf(|account_id, limit, offset| *account_id == 3 && *limit == 20 && *offset == 0)
            .returning(|_, _, _| Ok((vec![], 0)));

        let page = NotificationService::new(Arc::new(repo))
            .list(&alice(), 1)
            .await
            .unwrap();
        assert_eq!(page.total, 0);
        assert!(page.items.is_empty());
    }

    #[tokio::test]
    async fn test_mark_all_read_returns_count() {
        let mut repo = MockNotificationRepositoryTrait::new();
        repo.expect_mark_all_read().returning(|_| Ok(4));

        let n = NotificationService::new(Arc::new(repo))
            .mark_all_read(&alice())
            .await
            .unwrap();
        assert_eq!(n, 4);
    }
}
