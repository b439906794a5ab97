//! 商品与订单实体定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::OrderStatus;
use crate::error::{EcoError, Result};

/// 默认库存
pub const DEFAULT_STOCK_QUANTITY: i32 = 100;

/// 商品
///
/// 库存不会为负；库存归零时自动下架
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MerchItem {
    pub id: i64,
    pub name: String,
    pub description: String,
    #[sqlx(default)]
    pub image: Option<String>,
    pub coin_cost: i64,
    pub stock_quantity: i32,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
}

impl MerchItem {
    /// 兑换前置条件，按顺序检查：
    /// 1. 商品在架
    /// 2. 余额足够
    /// 3. 库存大于零
    pub fn check_redeemable(&self, balance: i64) -> Result<()> {
        if !self.is_available {
            return Err(EcoError::ItemNotFound(self.id));
        }
        if balance < self.coin_cost {
            return Err(EcoError::InsufficientFunds {
                required: self.coin_cost,
                available: balance,
            });
        }
        if self.stock_quantity <= 0 {
            return Err(EcoError::OutOfStock(self.id));
        }
        Ok(())
    }

    /// 扣减一件库存后的 (库存, 是否在架)
    pub fn after_take_one(&self) -> (i32, bool) {
        let remaining = (self.stock_quantity - 1).max(0);
        (remaining, self.is_available && remaining > 0)
    }
}

/// 商品创建/更新参数（审核员后台）
#[derive(Debug, Clone)]
pub struct ItemDraft {
    pub name: String,
    pub description: String,
    pub coin_cost: i64,
    pub stock_quantity: i32,
    pub is_available: bool,
}

impl ItemDraft {
    /// 零库存的商品不能处于在架状态
    pub fn effective_availability(&self) -> bool {
        self.is_available && self.stock_quantity > 0
    }
}

/// 兑换订单
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub account_id: i64,
    pub item_id: i64,
    pub status: OrderStatus,
    pub shipping_address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 订单列表视图（关联商品和下单人）
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: i64,
    pub account_id: i64,
    pub username: String,
    pub item_id: i64,
    pub item_name: String,
    pub coin_cost: i64,
    #[sqlx(default)]
    pub item_image: Option<String>,
    pub status: OrderStatus,
    pub shipping_address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
pub(crate) fn test_item(id: i64, cost: i64, stock: i32) -> MerchItem {
    MerchItem {
        id,
        name: format!("Item {}", id),
        description: String::new(),
        image: None,
        coin_cost: cost,
        stock_quantity: stock,
        is_available: stock > 0,
        created_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redeemable_happy_path() {
        let item = test_item(1, 100, 5);
        assert!(item.check_redeemable(150).is_ok());
        assert!(item.check_redeemable(100).is_ok());
    }

    #[test]
    fn test_unavailable_checked_first() {
        let mut item = test_item(1, 100, 0);
        item.is_available = false;
        // 余额和库存都不满足时，仍以下架为准
        assert!(matches!(
            item.check_redeemable(0),
            Err(EcoError::ItemNotFound(1))
        ));
    }

    #[test]
    fn test_balance_checked_before_stock() {
        let mut item = test_item(2, 100, 0);
        item.is_available = true;
        assert!(matches!(
            item.check_redeemable(10),
            Err(EcoError::InsufficientFunds {
                required: 100,
                available: 10
            })
        ));
        assert!(matches!(
            item.check_redeemable(500),
            Err(EcoError::OutOfStock(2))
        ));
    }

    #[test]
    fn test_take_last_one_unlists() {
        let item = test_item(1, 10, 1);
        assert_eq!(item.after_take_one(), (0, false));

        let item = test_item(1, 10, 3);
        assert_eq!(item.after_take_one(), (2, true));
    }

    #[test]
    fn test_draft_availability() {
        let draft = ItemDraft {
            name: "Tote".to_string(),
            description: String::new(),
            coin_cost: 40,
            stock_quantity: 0,
            is_available: true,
        };
        assert!(!draft.effective_availability());
    }
}
