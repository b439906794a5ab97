//! 订单仓储

use sqlx::{PgConnection, PgPool};

use crate::error::Result;
use crate::models::{Order, OrderStatus, OrderView};

const ORDER_COLUMNS: &str =
    "id, account_id, item_id, status, shipping_address, created_at, updated_at";

const VIEW_SELECT: &str = r#"
    SELECT o.id, o.account_id, a.username, o.item_id, m.name AS item_name,
           m.coin_cost, m.image AS item_image, o.status, o.shipping_address,
           o.created_at, o.updated_at
    FROM orders o
    JOIN accounts a ON a.id = o.account_id
    JOIN merch_items m ON m.id = o.item_id
"#;

pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 在事务中创建订单（初始状态 pending）
    pub async fn create_in_tx(
        tx: &mut PgConnection,
        account_id: i64,
        item_id: i64,
        shipping_address: &str,
    ) -> Result<Order> {
        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            INSERT INTO orders (account_id, item_id, status, shipping_address)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            ORDER_COLUMNS
        ))
        .bind(account_id)
        .bind(item_id)
        .bind(OrderStatus::Pending)
        .bind(shipping_address)
        .fetch_one(tx)
        .await?;

        Ok(order)
    }

    /// 锁定订单并带出商品名称
    pub async fn lock_view_in_tx(tx: &mut PgConnection, id: i64) -> Result<Option<OrderView>> {
        let order = sqlx::query_as::<_, OrderView>(&format!(
            "{} WHERE o.id = $1 FOR UPDATE OF o",
            VIEW_SELECT
        ))
        .bind(id)
        .fetch_optional(tx)
        .await?;

        Ok(order)
    }

    /// 在事务中更新订单状态
    pub async fn set_status_in_tx(
        tx: &mut PgConnection,
        id: i64,
        status: OrderStatus,
    ) -> Result<Order> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "UPDATE orders SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            ORDER_COLUMNS
        ))
        .bind(id)
        .bind(status)
        .fetch_one(tx)
        .await?;

        Ok(order)
    }

    pub async fn list_by_account(&self, account_id: i64) -> Result<Vec<OrderView>> {
        let orders = sqlx::query_as::<_, OrderView>(&format!(
            "{} WHERE o.account_id = $1 ORDER BY o.created_at DESC, o.id DESC",
            VIEW_SELECT
        ))
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    pub async fn list_by_status(
        &self,
        status: Option<OrderStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<OrderView>, i64)> {
        let orders = sqlx::query_as::<_, OrderView>(&format!(
            r#"
            {}
            WHERE ($1::varchar IS NULL OR o.status = $1)
            ORDER BY o.created_at DESC, o.id DESC
            LIMIT $2 OFFSET $3
            "#,
            VIEW_SELECT
        ))
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM orders WHERE ($1::varchar IS NULL OR status = $1)",
        )
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        Ok((orders, total))
    }
}
