//! NotificationService 集成测试
//!
//! ## 运行方式
//!
//! ```bash
//! DATABASE_URL=postgres://... cargo test -p eco-core --test notification_service_test -- --ignored
//! ```

mod common;

use std::sync::Arc;

use eco_core::models::NewNotification;
use eco_core::{NotificationRepository, NotificationService};
use sqlx::PgPool;

use common::*;

async fn notify(pool: &PgPool, account_id: i64, count: usize) {
    let mut tx = pool.begin().await.unwrap();
    for i in 0..count {
        NotificationRepository::create_in_tx(
            &mut tx,
            &NewNotification::order_placed(account_id, &format!("Item {}", i), 10),
        )
        .await
        .unwrap();
    }
    tx.commit().await.unwrap();
}

#[tokio::test]
#[ignore = "需要 PostgreSQL"]
async fn test_mark_all_read_only_touches_own_notifications() {
    let pool = setup_pool().await;
    let alice = seed_account(&pool, "alice", 0, false).await;
    let bob = seed_account(&pool, "bob", 0, false).await;
    notify(&pool, alice.account_id, 2).await;
    notify(&pool, bob.account_id, 3).await;

    let service = NotificationService::new(Arc::new(NotificationRepository::new(pool.clone())));

    assert_eq!(service.mark_all_read(&alice).await.unwrap(), 2);
    assert_eq!(service.unread_count(&alice).await.unwrap(), 0);
    assert_eq!(service.unread_count(&bob).await.unwrap(), 3);

    // 已读后再次执行不再更新任何行
    assert_eq!(service.mark_all_read(&alice).await.unwrap(), 0);
    assert_eq!(service.unread_count(&bob).await.unwrap(), 3);
}

#[tokio::test]
#[ignore = "需要 PostgreSQL"]
async fn test_mark_read_refuses_foreign_notification() {
    let pool = setup_pool().await;
    let alice = seed_account(&pool, "alice", 0, false).await;
    let bob = seed_account(&pool, "bob", 0, false).await;
    notify(&pool, bob.account_id, 1).await;

    let repo = NotificationRepository::new(pool.clone());
    let (bob_notes, _) = repo.list_by_account(bob.account_id, 10, 0).await.unwrap();
    let service = NotificationService::new(Arc::new(repo));

    assert!(service.mark_read(&alice, bob_notes[0].id).await.is_err());
    assert_eq!(service.unread_count(&bob).await.unwrap(), 1);
}
