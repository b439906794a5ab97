//! 金币账本仓储
//!
//! 流水只追加，不提供更新和删除

use sqlx::{PgConnection, PgPool};

use crate::error::Result;
use crate::models::{EntryKind, LedgerEntry, NewLedgerEntry};

pub struct LedgerRepository {
    pool: PgPool,
}

impl LedgerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 在事务中追加流水
    pub async fn append_in_tx(tx: &mut PgConnection, entry: &NewLedgerEntry) -> Result<LedgerEntry> {
        let created = sqlx::query_as::<_, LedgerEntry>(
            r#"
            INSERT INTO ledger_entries (account_id, amount, kind, description)
            VALUES ($1, $2, $3, $4)
            RETURNING id, account_id, amount, kind, description, created_at
            "#,
        )
        .bind(entry.account_id)
        .bind(entry.amount)
        .bind(entry.kind)
        .bind(&entry.description)
        .fetch_one(tx)
        .await?;

        Ok(created)
    }

    /// 列出账户流水，按时间倒序
    pub async fn list_by_account(
        &self,
        account_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<LedgerEntry>, i64)> {
        let entries = sqlx::query_as::<_, LedgerEntry>(
            r#"
            SELECT id, account_id, amount, kind, description, created_at
            FROM ledger_entries
            WHERE account_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(account_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM ledger_entries WHERE account_id = $1")
                .bind(account_id)
                .fetch_one(&self.pool)
                .await?;

        Ok((entries, total))
    }

    /// 累计获得金币
    pub async fn total_earned(&self, account_id: i64) -> Result<i64> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(amount), 0)::BIGINT
            FROM ledger_entries
            WHERE account_id = $1 AND kind = $2
            "#,
        )
        .bind(account_id)
        .bind(EntryKind::Earn)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    /// 流水金额之和，用于对账
    pub async fn signed_sum(&self, account_id: i64) -> Result<i64> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount), 0)::BIGINT FROM ledger_entries WHERE account_id = $1",
        )
        .bind(account_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }
}
