//! 统计服务
//!
//! 个人看板、排行榜、首页统计和审核后台概览。
//! 排名采用竞争排名：通过数相同名次相同，下一名次跳过并列人数。

use std::sync::Arc;

use tracing::instrument;

use crate::actor::Actor;
use crate::error::{EcoError, Result};
use crate::models::LeaderRow;
use crate::repository::{StatsRepositoryTrait, TaskRepositoryTrait};
use crate::service::dto::{
    Dashboard, HOME_FEATURED_TASKS, HomeStats, IMPACT_PER_TASK, LEADERBOARD_SIZE,
    LeaderboardEntry, OVERVIEW_TOP_N, Overview,
};

pub struct StatsService<SR, TR>
where
    SR: StatsRepositoryTrait,
    TR: TaskRepositoryTrait,
{
    stats_repo: Arc<SR>,
    task_repo: Arc<TR>,
}

impl<SR, TR> StatsService<SR, TR>
where
    SR: StatsRepositoryTrait,
    TR: TaskRepositoryTrait,
{
    pub fn new(stats_repo: Arc<SR>, task_repo: Arc<TR>) -> Self {
        Self {
            stats_repo,
            task_repo,
        }
    }

    /// 个人看板
    #[instrument(skip(self, actor), fields(account_id = actor.account_id))]
    pub async fn dashboard(&self, actor: &Actor) -> Result<Dashboard> {
        let figures = self
            .stats_repo
            .dashboard_figures(actor.account_id)
            .await?
            .ok_or(EcoError::AccountNotFound(actor.account_id))?;

        let above = self
            .stats_repo
            .count_accounts_above(figures.completed)
            .await?;

        Ok(Dashboard {
            completed_tasks: figures.completed,
            total_coins_earned: figures.total_earned,
            rank: above + 1,
            impact_score: figures.completed * IMPACT_PER_TASK,
            unread_notifications: figures.unread_notifications,
            coin_balance: figures.coin_balance,
        })
    }

    /// 排行榜前 10
    pub async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>> {
        let rows = self.stats_repo.top_accounts(LEADERBOARD_SIZE).await?;
        Ok(rank_rows(rows))
    }

    pub async fn home(&self) -> Result<HomeStats> {
        let counts = self.stats_repo.home_counts().await?;
        let featured_tasks = self.task_repo.list_featured(HOME_FEATURED_TASKS).await?;

        Ok(HomeStats {
            total_tasks: counts.active_tasks,
            total_users: counts.accounts,
            total_submissions: counts.approved_submissions,
            featured_tasks,
        })
    }

    /// 审核后台概览
    #[instrument(skip(self, actor), fields(moderator = %actor.username))]
    pub async fn overview(&self, actor: &Actor) -> Result<Overview> {
        actor.require_moderator()?;

        let totals = self.stats_repo.overview_totals().await?;
        let top_users = rank_rows(self.stats_repo.top_accounts(OVERVIEW_TOP_N).await?);
        let top_tasks = self.stats_repo.top_tasks(OVERVIEW_TOP_N).await?;
        let top_items = self.stats_repo.top_items(OVERVIEW_TOP_N).await?;

        Ok(Overview {
            totals,
            top_users,
            top_tasks,
            top_items,
        })
    }
}

/// 为已按通过数降序排列的行计算竞争排名
fn rank_rows(rows: Vec<LeaderRow>) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = Vec::with_capacity(rows.len());

    for (index, row) in rows.into_iter().enumerate() {
        let rank = match entries.last() {
            Some(prev) if prev.completed_tasks == row.completed => prev.rank,
            _ => index as i64 + 1,
        };
        entries.push(LeaderboardEntry {
            rank,
            account_id: row.account_id,
            username: row.username,
            first_name: row.first_name,
            completed_tasks: row.completed,
            photo: row.photo,
        });
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DashboardFigures, HomeCounts};
    use crate::repository::{MockStatsRepositoryTrait, MockTaskRepositoryTrait};

    fn row(account_id: i64, completed: i64) -> LeaderRow {
        LeaderRow {
            account_id,
            username: format!("user{}", account_id),
            first_name: String::new(),
            photo: None,
            completed,
        }
    }

    fn service(
        stats: MockStatsRepositoryTrait,
    ) -> StatsService<MockStatsRepositoryTrait, MockTaskRepositoryTrait> {
        StatsService::new(Arc::new(stats), Arc::new(MockTaskRepositoryTrait::new()))
    }

    #[test]
    fn test_competition_ranking() {
        let ranked = rank_rows(vec![row(1, 5), row(2, 3), row(3, 3), row(4, 1), row(5, 0)]);
        let ranks: Vec<i64> = ranked.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2, 2, 4, 5]);
    }

    #[test]
    fn test_all_tied() {
        let ranked = rank_rows(vec![row(1, 0), row(2, 0), row(3, 0)]);
        assert!(ranked.iter().all(|e| e.rank == 1));
    }

    #[tokio::test]
    async fn test_dashboard_rank_and_impact() {
        let mut stats = MockStatsRepositoryTrait::new();
        stats.expect_dashboard_figures().returning(|_| {
            Ok(Some(DashboardFigures {
                coin_balance: 40,
                completed: 3,
                total_earned: 60,
                unread_notifications: 2,
            }))
        });
        stats
            .expect_count_accounts_above()
            .withf(|completed| *completed == 3)
            .returning(|_| Ok(4));

        let dashboard = service(stats)
            .dashboard(&Actor::new(9, "carol", false))
            .await
            .unwrap();

        assert_eq!(
            dashboard,
            Dashboard {
                completed_tasks: 3,
                total_coins_earned: 60,
                rank: 5,
                impact_score: 30,
                unread_notifications: 2,
                coin_balance: 40,
            }
        );
    }

    #[tokio::test]
    async fn test_dashboard_missing_account() {
        let mut stats = MockStatsRepositoryTrait::new();
        stats.expect_dashboard_figures().returning(|_| Ok(None));

        let err = service(stats)
            .dashboard(&Actor::new(9, "ghost", false))
            .await
            .unwrap_err();
        assert!(matches!(err, EcoError::AccountNotFound(9)));
    }

    #[tokio::test]
    async fn test_leaderboard_requests_top_ten() {
        let mut stats = MockStatsRepositoryTrait::new();
        stats
            .expect_top_accounts()
            .withf(|limit| *limit == 10)
            .returning(|_| Ok(vec![row(1, 2), row(2, 2)]));

        let board = service(stats).leaderboard().await.unwrap();
        assert_eq!(board.len(), 2);
        assert_eq!(board[1].rank, 1);
    }

    #[tokio::test]
    async fn test_home_uses_featured_tasks() {
        let mut stats = MockStatsRepositoryTrait::new();
        stats.expect_home_counts().returning(|| {
            Ok(HomeCounts {
                active_tasks: 7,
                accounts: 12,
                approved_submissions: 30,
            })
        });
        let mut tasks = MockTaskRepositoryTrait::new();
        tasks
            .expect_list_featured()
            .withf(|limit| *limit == 3)
            .returning(|_| Ok(vec![]));

        let home = StatsService::new(Arc::new(stats), Arc::new(tasks))
            .home()
            .await
            .unwrap();
        assert_eq!(home.total_tasks, 7);
        assert_eq!(home.total_users, 12);
        assert_eq!(home.total_submissions, 30);
    }

    #[tokio::test]
    async fn test_overview_requires_moderator() {
        let err = service(MockStatsRepositoryTrait::new())
            .overview(&Actor::new(1, "user", false))
            .await
            .unwrap_err();
        assert!(matches!(err, EcoError::Forbidden));
    }
}
