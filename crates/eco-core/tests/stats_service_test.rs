//! StatsService 集成测试
//!
//! 排名基于已通过的提交数，按竞争排名计算。
//!
//! ## 运行方式
//!
//! ```bash
//! DATABASE_URL=postgres://... cargo test -p eco-core --test stats_service_test -- --ignored
//! ```

mod common;

use std::sync::Arc;

use eco_core::{Actor, ReviewService, StatsRepository, StatsService, TaskRepository};
use sqlx::PgPool;

use common::*;

/// 为账户完成 n 个任务并全部审核通过
async fn complete_tasks(pool: &PgPool, moderator: &Actor, account: &Actor, n: usize) {
    let review = ReviewService::new(pool.clone());
    for _ in 0..n {
        let task = seed_task(pool, 5, true).await;
        let submission = review
            .submit(account, task.id, "Done", "submissions/proof.jpg")
            .await
            .unwrap();
        review.approve(moderator, submission.id).await.unwrap();
    }
}

#[tokio::test]
#[ignore = "需要 PostgreSQL"]
async fn test_dashboard_rank_counts_accounts_strictly_above() {
    let pool = setup_pool().await;
    let stats_repo = StatsRepository::new(pool.clone());

    // 库中可能已有其他测试留下的数据，以当前基线为准
    let above_five = stats_repo.count_accounts_above(5).await.unwrap();
    let above_three = stats_repo.count_accounts_above(3).await.unwrap();

    let moderator = seed_moderator(&pool).await;
    let leader = seed_account(&pool, "leader", 0, false).await;
    let runner_up = seed_account(&pool, "runner", 0, false).await;
    let tied = seed_account(&pool, "tied", 0, false).await;
    complete_tasks(&pool, &moderator, &leader, 5).await;
    complete_tasks(&pool, &moderator, &runner_up, 3).await;
    complete_tasks(&pool, &moderator, &tied, 3).await;

    let service = StatsService::new(
        Arc::new(StatsRepository::new(pool.clone())),
        Arc::new(TaskRepository::new(pool.clone())),
    );

    let leader_dash = service.dashboard(&leader).await.unwrap();
    assert_eq!(leader_dash.completed_tasks, 5);
    assert_eq!(leader_dash.rank, above_five + 1);
    assert_eq!(leader_dash.impact_score, 50);
    assert_eq!(leader_dash.total_coins_earned, 25);

    // 3 个通过的账户排在 5 个通过的账户之后，并列者名次相同
    let runner_dash = service.dashboard(&runner_up).await.unwrap();
    let tied_dash = service.dashboard(&tied).await.unwrap();
    assert_eq!(runner_dash.completed_tasks, 3);
    assert_eq!(runner_dash.rank, above_three + 2);
    assert_eq!(tied_dash.rank, runner_dash.rank);
    assert!(runner_dash.rank > leader_dash.rank);
}

#[tokio::test]
#[ignore = "需要 PostgreSQL"]
async fn test_account_without_approvals_ranks_behind() {
    let pool = setup_pool().await;
    let moderator = seed_moderator(&pool).await;
    let newcomer = seed_account(&pool, "new", 0, false).await;
    let doer = seed_account(&pool, "doer", 0, false).await;
    complete_tasks(&pool, &moderator, &doer, 1).await;

    let service = StatsService::new(
        Arc::new(StatsRepository::new(pool.clone())),
        Arc::new(TaskRepository::new(pool.clone())),
    );

    let doer_dash = service.dashboard(&doer).await.unwrap();
    let newcomer_dash = service.dashboard(&newcomer).await.unwrap();
    assert_eq!(newcomer_dash.completed_tasks, 0);
    assert_eq!(newcomer_dash.impact_score, 0);
    assert!(newcomer_dash.rank > doer_dash.rank);
}
