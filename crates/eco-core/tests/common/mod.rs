//! 集成测试公共辅助
//!
//! 连接真实 PostgreSQL 并执行迁移，按需创建账户、任务和商品。

#![allow(dead_code)]

use eco_core::models::{Difficulty, ItemDraft, MerchItem, NewAccount, Task, TaskDraft};
use eco_core::repository::{MerchRepository, TaskRepository};
use eco_core::{AccountService, Actor, LedgerService};
use eco_shared::database::Database;
use eco_shared::test_utils::{test_database_config, test_username};
use fake::Fake;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::{FirstName, LastName};
use sqlx::PgPool;

pub async fn setup_pool() -> PgPool {
    let db = Database::connect(&test_database_config())
        .await
        .expect("数据库连接失败");
    db.run_migrations().await.expect("迁移执行失败");
    db.pool().clone()
}

/// 创建账户并按需充值，返回对应的 Actor
pub async fn seed_account(pool: &PgPool, prefix: &str, coins: i64, is_moderator: bool) -> Actor {
    let new_account = NewAccount {
        username: test_username(prefix),
        email: SafeEmail().fake(),
        first_name: FirstName().fake(),
        last_name: LastName().fake(),
        password_hash: "not-a-real-hash".to_string(),
        is_moderator,
    };

    let created = AccountService::new(pool.clone())
        .register(&new_account)
        .await
        .expect("注册失败");

    if coins > 0 {
        LedgerService::new(pool.clone())
            .credit(created.account.id, coins, "Initial grant")
            .await
            .expect("充值失败");
    }

    Actor::new(created.account.id, created.account.username, is_moderator)
}

pub async fn seed_moderator(pool: &PgPool) -> Actor {
    seed_account(pool, "mod", 0, true).await
}

pub async fn seed_task(pool: &PgPool, reward: i64, is_active: bool) -> Task {
    let draft = TaskDraft {
        title: format!("Task {}", test_username("t")),
        description: "Collect plastic on the riverbank".to_string(),
        reward,
        deadline: None,
        difficulty: Difficulty::Easy,
        is_featured: false,
        is_active,
    };
    TaskRepository::new(pool.clone())
        .create(&draft)
        .await
        .expect("创建任务失败")
}

pub async fn seed_item(pool: &PgPool, cost: i64, stock: i32) -> MerchItem {
    let draft = ItemDraft {
        name: format!("Item {}", test_username("i")),
        description: "Recycled tote bag".to_string(),
        coin_cost: cost,
        stock_quantity: stock,
        is_available: true,
    };
    MerchRepository::new(pool.clone())
        .create(&draft)
        .await
        .expect("创建商品失败")
}

pub async fn balance_of(pool: &PgPool, account_id: i64) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT coin_balance FROM accounts WHERE id = $1")
        .bind(account_id)
        .fetch_one(pool)
        .await
        .expect("查询余额失败")
}

pub async fn count_rows(pool: &PgPool, table: &str, account_id: i64) -> i64 {
    let sql = format!("SELECT COUNT(*) FROM {} WHERE account_id = $1", table);
    sqlx::query_scalar::<_, i64>(&sql)
        .bind(account_id)
        .fetch_one(pool)
        .await
        .expect("计数失败")
}
