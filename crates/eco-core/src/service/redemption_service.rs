//! 商品兑换服务
//!
//! ## 兑换流程
//!
//! 1. 锁定账户 -> 2. 锁定商品 -> 3. 前置条件（在架、余额、库存）
//!    -> 4. 创建订单 -> 5. 扣款记账 -> 6. 扣减库存 -> 7. 写入通知 -> 8. 提交
//!
//! 任一前置条件失败时事务回滚，不产生订单、流水、库存变化或通知。
//! 锁顺序固定为先账户后商品，避免并发兑换之间死锁。

use std::sync::Arc;

use sqlx::PgPool;
use tracing::{info, instrument, warn};

use eco_shared::observability::metrics;

use crate::actor::Actor;
use crate::error::{EcoError, Result};
use crate::models::{NewLedgerEntry, NewNotification, OrderView};
use crate::repository::{AccountRepository, MerchRepository, NotificationRepository, OrderRepository};
use crate::service::LedgerService;
use crate::service::dto::RedemptionReceipt;

/// 收货地址最大长度
pub const MAX_SHIPPING_ADDRESS_LEN: usize = 500;

pub struct RedemptionService {
    order_repo: Arc<OrderRepository>,
    pool: PgPool,
}

impl RedemptionService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            order_repo: Arc::new(OrderRepository::new(pool.clone())),
            pool,
        }
    }

    /// 用金币兑换商品
    #[instrument(skip(self, actor, shipping_address), fields(account_id = %actor.account_id, item_id = %item_id))]
    pub async fn redeem(
        &self,
        actor: &Actor,
        item_id: i64,
        shipping_address: &str,
    ) -> Result<RedemptionReceipt> {
        let address = normalize_address(shipping_address)?;

        match self.execute(actor, item_id, &address).await {
            Ok(receipt) => {
                metrics::record_redemption("success");
                if receipt.item.coin_cost > 0 {
                    metrics::record_coin_movement(-receipt.item.coin_cost);
                }
                info!(
                    account_id = actor.account_id,
                    item_id,
                    order_id = receipt.order.id,
                    cost = receipt.item.coin_cost,
                    new_balance = receipt.new_balance,
                    "Merch redeemed"
                );
                Ok(receipt)
            }
            Err(e) => {
                metrics::record_redemption(outcome_label(&e));
                if e.is_business_error() {
                    warn!(account_id = actor.account_id, item_id, error = %e, "Redemption refused");
                }
                Err(e)
            }
        }
    }

    async fn execute(&self, actor: &Actor, item_id: i64, address: &str) -> Result<RedemptionReceipt> {
        let mut tx = self.pool.begin().await?;

        let account = AccountRepository::lock_in_tx(&mut tx, actor.account_id)
            .await?
            .ok_or(EcoError::AccountNotFound(actor.account_id))?;

        let mut item = MerchRepository::lock_in_tx(&mut tx, item_id)
            .await?
            .ok_or(EcoError::ItemNotFound(item_id))?;

        item.check_redeemable(account.coin_balance)?;

        let order = OrderRepository::create_in_tx(&mut tx, account.id, item.id, address).await?;

        let entry = NewLedgerEntry::redemption(account.id, &item.name, item.coin_cost);
        let new_balance = match entry {
            Ok(entry) => LedgerService::post_in_tx(&mut tx, &entry).await?.balance_after,
            // 零价商品不记流水
            Err(EcoError::InvalidAmount(0)) => account.coin_balance,
            Err(e) => return Err(e),
        };

        let (stock_quantity, is_available) = item.after_take_one();
        MerchRepository::set_stock_in_tx(&mut tx, item.id, stock_quantity, is_available).await?;

        NotificationRepository::create_in_tx(
            &mut tx,
            &NewNotification::order_placed(account.id, &item.name, item.coin_cost),
        )
        .await?;

        tx.commit().await?;

        item.stock_quantity = stock_quantity;
        item.is_available = is_available;

        Ok(RedemptionReceipt {
            order,
            item,
            new_balance,
        })
    }

    /// 当前用户的订单
    #[instrument(skip(self, actor), fields(account_id = %actor.account_id))]
    pub async fn my_orders(&self, actor: &Actor) -> Result<Vec<OrderView>> {
        self.order_repo.list_by_account(actor.account_id).await
    }
}

/// 收货地址去除首尾空白并限制长度，内容不做校验
pub fn normalize_address(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.chars().count() > MAX_SHIPPING_ADDRESS_LEN {
        return Err(EcoError::Validation(format!(
            "收货地址不能超过 {} 个字符",
            MAX_SHIPPING_ADDRESS_LEN
        )));
    }
    Ok(trimmed.to_string())
}

fn outcome_label(error: &EcoError) -> &'static str {
    match error {
        EcoError::InsufficientFunds { .. } => "insufficient_funds",
        EcoError::OutOfStock(_) => "out_of_stock",
        EcoError::ItemNotFound(_) => "unavailable",
        e if e.is_business_error() => "rejected",
        _ => "error",
    }
}
