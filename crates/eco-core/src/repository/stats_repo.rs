//! 统计仓储
//!
//! 只读聚合查询，每次请求实时计算

use async_trait::async_trait;
use sqlx::PgPool;

use super::traits::StatsRepositoryTrait;
use crate::error::Result;
use crate::models::{CountedRow, DashboardFigures, HomeCounts, LeaderRow, OverviewTotals};

pub struct StatsRepository {
    pool: PgPool,
}

impl StatsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn dashboard_figures(&self, account_id: i64) -> Result<Option<DashboardFigures>> {
        let figures = sqlx::query_as::<_, DashboardFigures>(
            r#"
            SELECT a.coin_balance,
                   (SELECT COUNT(*) FROM submissions s
                     WHERE s.account_id = a.id AND s.status = 'approved') AS completed,
                   (SELECT COALESCE(SUM(l.amount), 0)::BIGINT FROM ledger_entries l
                     WHERE l.account_id = a.id AND l.kind = 'earn') AS total_earned,
                   (SELECT COUNT(*) FROM notifications n
                     WHERE n.account_id = a.id AND n.is_read = FALSE) AS unread_notifications
            FROM accounts a
            WHERE a.id = $1
            "#,
        )
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(figures)
    }

    pub async fn count_accounts_above(&self, completed: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM (
                SELECT a.id
                FROM accounts a
                LEFT JOIN submissions s ON s.account_id = a.id AND s.status = 'approved'
                GROUP BY a.id
                HAVING COUNT(s.id) > $1
            ) ranked
            "#,
        )
        .bind(completed)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    pub async fn top_accounts(&self, limit: i64) -> Result<Vec<LeaderRow>> {
        let rows = sqlx::query_as::<_, LeaderRow>(
            r#"
            SELECT a.id AS account_id, a.username, a.first_name, p.photo,
                   COUNT(s.id) AS completed
            FROM accounts a
            LEFT JOIN profiles p ON p.account_id = a.id
            LEFT JOIN submissions s ON s.account_id = a.id AND s.status = 'approved'
            GROUP BY a.id, a.username, a.first_name, p.photo
            ORDER BY completed DESC, a.id ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn home_counts(&self) -> Result<HomeCounts> {
        let counts = sqlx::query_as::<_, HomeCounts>(
            r#"
            SELECT (SELECT COUNT(*) FROM tasks WHERE is_active = TRUE) AS active_tasks,
                   (SELECT COUNT(*) FROM accounts) AS accounts,
                   (SELECT COUNT(*) FROM submissions WHERE status = 'approved') AS approved_submissions
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(counts)
    }

    pub async fn overview_totals(&self) -> Result<OverviewTotals> {
        let totals = sqlx::query_as::<_, OverviewTotals>(
            r#"
            SELECT (SELECT COUNT(*) FROM accounts) AS accounts,
                   (SELECT COUNT(*) FROM tasks) AS tasks,
                   (SELECT COUNT(*) FROM submissions) AS submissions,
                   (SELECT COUNT(*) FROM submissions WHERE status = 'pending') AS pending_submissions,
                   (SELECT COUNT(*) FROM orders) AS orders,
                   (SELECT COUNT(*) FROM orders WHERE status = 'pending') AS pending_orders
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(totals)
    }

    pub async fn top_tasks(&self, limit: i64) -> Result<Vec<CountedRow>> {
        let rows = sqlx::query_as::<_, CountedRow>(
            r#"
            SELECT t.id, t.title AS name, COUNT(s.id) AS count
            FROM tasks t
            LEFT JOIN submissions s ON s.task_id = t.id AND s.status = 'approved'
            GROUP BY t.id, t.title
            ORDER BY count DESC, t.id ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn top_items(&self, limit: i64) -> Result<Vec<CountedRow>> {
        let rows = sqlx::query_as::<_, CountedRow>(
            r#"
            SELECT m.id, m.name, COUNT(o.id) AS count
            FROM merch_items m
            LEFT JOIN orders o ON o.item_id = m.id
            GROUP BY m.id, m.name
            ORDER BY count DESC, m.id ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

#[async_trait]
impl StatsRepositoryTrait for StatsRepository {
    async fn dashboard_figures(&self, account_id: i64) -> Result<Option<DashboardFigures>> {
        self.dashboard_figures(account_id).await
    }

    async fn count_accounts_above(&self, completed: i64) -> Result<i64> {
        self.count_accounts_above(completed).await
    }

    async fn top_accounts(&self, limit: i64) -> Result<Vec<LeaderRow>> {
        self.top_accounts(limit).await
    }

    async fn home_counts(&self) -> Result<HomeCounts> {
        self.home_counts().await
    }

    async fn overview_totals(&self) -> Result<OverviewTotals> {
        self.overview_totals().await
    }

    async fn top_tasks(&self, limit: i64) -> Result<Vec<CountedRow>> {
        self.top_tasks(limit).await
    }

    async fn top_items(&self, limit: i64) -> Result<Vec<CountedRow>> {
        self.top_items(limit).await
    }
}
