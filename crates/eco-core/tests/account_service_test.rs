//! AccountService 集成测试
//!
//! ## 运行方式
//!
//! ```bash
//! DATABASE_URL=postgres://... cargo test -p eco-core --test account_service_test -- --ignored
//! ```

mod common;

use eco_core::AccountService;
use eco_core::models::NewAccount;
use eco_shared::test_utils::test_username;

use common::*;

fn moderator_draft(username: &str) -> NewAccount {
    NewAccount {
        username: username.to_string(),
        email: "moderator@eco.example".to_string(),
        first_name: String::new(),
        last_name: String::new(),
        password_hash: "bootstrap-hash".to_string(),
        is_moderator: false,
    }
}

#[tokio::test]
#[ignore = "需要 PostgreSQL"]
async fn test_ensure_moderator_creates_account_with_profile() {
    let pool = setup_pool().await;
    let service = AccountService::new(pool.clone());
    let username = test_username("boot");

    let (account, created) = service
        .ensure_moderator(&moderator_draft(&username))
        .await
        .unwrap();

    assert!(created);
    assert!(account.is_moderator);
    assert_eq!(account.coin_balance, 0);
    assert_eq!(count_rows(&pool, "profiles", account.id).await, 1);

    // 再次执行是幂等的
    let (again, created) = service
        .ensure_moderator(&moderator_draft(&username))
        .await
        .unwrap();
    assert!(!created);
    assert_eq!(again.id, account.id);
    assert!(again.is_moderator);
}

#[tokio::test]
#[ignore = "需要 PostgreSQL"]
async fn test_ensure_moderator_promotes_existing_account() {
    let pool = setup_pool().await;
    let member = seed_account(&pool, "member", 40, false).await;
    let service = AccountService::new(pool.clone());

    let (account, created) = service
        .ensure_moderator(&moderator_draft(&member.username))
        .await
        .unwrap();

    assert!(!created);
    assert_eq!(account.id, member.account_id);
    assert!(account.is_moderator);
    // 原有密码与余额不受影响
    assert_eq!(account.password_hash, "not-a-real-hash");
    assert_eq!(account.coin_balance, 40);
}
