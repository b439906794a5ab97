//! 金币账本服务
//!
//! 余额变动与流水写入在同一事务内完成，并持有账户行锁：
//! - 入账：余额增加，追加 earn 流水（正数）
//! - 扣款：余额不足时失败且不产生任何变化，否则追加 spend 流水（负数）
//!
//! 其他工作流通过 `post_in_tx` 把记账并入自己的事务。

use std::sync::Arc;

use sqlx::{PgConnection, PgPool};
use tracing::{info, instrument};

use eco_shared::observability::metrics;

use crate::actor::Actor;
use crate::error::{EcoError, Result};
use crate::models::{EntryKind, NewLedgerEntry};
use crate::repository::{AccountRepository, LedgerRepository};
use crate::service::dto::{LedgerPosting, PageRequest, Paged, TRANSACTIONS_PER_PAGE, TransactionHistory};

pub struct LedgerService {
    ledger_repo: Arc<LedgerRepository>,
    account_repo: Arc<AccountRepository>,
    pool: PgPool,
}

impl LedgerService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            ledger_repo: Arc::new(LedgerRepository::new(pool.clone())),
            account_repo: Arc::new(AccountRepository::new(pool.clone())),
            pool,
        }
    }

    /// 入账
    #[instrument(skip(self, description), fields(account_id = %account_id, amount = %amount))]
    pub async fn credit(
        &self,
        account_id: i64,
        amount: i64,
        description: &str,
    ) -> Result<LedgerPosting> {
        let entry = NewLedgerEntry::earn(account_id, amount, description)?;
        self.post(entry).await
    }

    /// 扣款
    #[instrument(skip(self, description), fields(account_id = %account_id, amount = %amount))]
    pub async fn debit(
        &self,
        account_id: i64,
        amount: i64,
        description: &str,
    ) -> Result<LedgerPosting> {
        let entry = NewLedgerEntry::spend(account_id, amount, description)?;
        self.post(entry).await
    }

    async fn post(&self, entry: NewLedgerEntry) -> Result<LedgerPosting> {
        let mut tx = self.pool.begin().await?;
        let posting = Self::post_in_tx(&mut tx, &entry).await?;
        tx.commit().await?;

        metrics::record_coin_movement(posting.entry.amount);
        info!(
            account_id = entry.account_id,
            amount = entry.amount,
            balance_after = posting.balance_after,
            "Ledger entry posted"
        );

        Ok(posting)
    }

    /// 在调用方事务中记账
    ///
    /// 先锁定账户行，再计算新余额、写回余额、追加流水
    pub async fn post_in_tx(tx: &mut PgConnection, entry: &NewLedgerEntry) -> Result<LedgerPosting> {
        let account = AccountRepository::lock_in_tx(tx, entry.account_id)
            .await?
            .ok_or(EcoError::AccountNotFound(entry.account_id))?;

        let balance_after = match entry.kind {
            EntryKind::Earn => account.credited(entry.magnitude())?,
            EntryKind::Spend => account.debited(entry.magnitude())?,
        };

        AccountRepository::set_balance_in_tx(tx, account.id, balance_after).await?;
        let created = LedgerRepository::append_in_tx(tx, entry).await?;

        Ok(LedgerPosting {
            entry: created,
            balance_after,
        })
    }

    /// 当前用户的流水，每页 20 条
    #[instrument(skip(self, actor), fields(account_id = %actor.account_id))]
    pub async fn history(&self, actor: &Actor, page: i64) -> Result<TransactionHistory> {
        let request = PageRequest::new(page, TRANSACTIONS_PER_PAGE);

        let account = self
            .account_repo
            .get(actor.account_id)
            .await?
            .ok_or(EcoError::AccountNotFound(actor.account_id))?;

        let (entries, total) = self
            .ledger_repo
            .list_by_account(actor.account_id, request.limit(), request.offset())
            .await?;
        let total_earned = self.ledger_repo.total_earned(actor.account_id).await?;

        Ok(TransactionHistory {
            entries: Paged::new(entries, total, request),
            total_earned,
            coin_balance: account.coin_balance,
        })
    }

    /// 对账：流水之和与余额是否一致
    pub async fn reconcile(&self, account_id: i64) -> Result<bool> {
        let account = self
            .account_repo
            .get(account_id)
            .await?
            .ok_or(EcoError::AccountNotFound(account_id))?;
        let sum = self.ledger_repo.signed_sum(account_id).await?;
        Ok(sum == account.coin_balance)
    }
}
