//! 商品仓储

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};

use super::traits::MerchRepositoryTrait;
use crate::error::Result;
use crate::models::{ItemDraft, MerchItem};

const ITEM_COLUMNS: &str =
    "id, name, description, image, coin_cost, stock_quantity, is_available, created_at";

pub struct MerchRepository {
    pool: PgPool,
}

impl MerchRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_available(&self) -> Result<Vec<MerchItem>> {
        let items = sqlx::query_as::<_, MerchItem>(&format!(
            "SELECT {} FROM merch_items WHERE is_available = TRUE ORDER BY coin_cost ASC, id ASC",
            ITEM_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    pub async fn get(&self, id: i64) -> Result<Option<MerchItem>> {
        let item = sqlx::query_as::<_, MerchItem>(&format!(
            "SELECT {} FROM merch_items WHERE id = $1",
            ITEM_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// 锁定商品行（FOR UPDATE），须在锁定账户之后调用
    pub async fn lock_in_tx(tx: &mut PgConnection, id: i64) -> Result<Option<MerchItem>> {
        let item = sqlx::query_as::<_, MerchItem>(&format!(
            "SELECT {} FROM merch_items WHERE id = $1 FOR UPDATE",
            ITEM_COLUMNS
        ))
        .bind(id)
        .fetch_optional(tx)
        .await?;

        Ok(item)
    }

    /// 在事务中写入库存与在架状态
    pub async fn set_stock_in_tx(
        tx: &mut PgConnection,
        id: i64,
        stock_quantity: i32,
        is_available: bool,
    ) -> Result<()> {
        sqlx::query("UPDATE merch_items SET stock_quantity = $2, is_available = $3 WHERE id = $1")
            .bind(id)
            .bind(stock_quantity)
            .bind(is_available)
            .execute(tx)
            .await?;

        Ok(())
    }

    pub async fn create(&self, draft: &ItemDraft) -> Result<MerchItem> {
        let item = sqlx::query_as::<_, MerchItem>(&format!(
            r#"
            INSERT INTO merch_items (name, description, coin_cost, stock_quantity, is_available)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            ITEM_COLUMNS
        ))
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(draft.coin_cost)
        .bind(draft.stock_quantity)
        .bind(draft.effective_availability())
        .fetch_one(&self.pool)
        .await?;

        Ok(item)
    }

    pub async fn update(&self, id: i64, draft: &ItemDraft) -> Result<Option<MerchItem>> {
        let item = sqlx::query_as::<_, MerchItem>(&format!(
            r#"
            UPDATE merch_items
            SET name = $2, description = $3, coin_cost = $4, stock_quantity = $5, is_available = $6
            WHERE id = $1
            RETURNING {}
            "#,
            ITEM_COLUMNS
        ))
        .bind(id)
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(draft.coin_cost)
        .bind(draft.stock_quantity)
        .bind(draft.effective_availability())
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// 设置商品图片（上传后回写路径）
    pub async fn set_image(&self, id: i64, image: &str) -> Result<Option<MerchItem>> {
        let item = sqlx::query_as::<_, MerchItem>(&format!(
            "UPDATE merch_items SET image = $2 WHERE id = $1 RETURNING {}",
            ITEM_COLUMNS
        ))
        .bind(id)
        .bind(image)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }
}

#[async_trait]
impl MerchRepositoryTrait for MerchRepository {
    async fn list_available(&self) -> Result<Vec<MerchItem>> {
        self.list_available().await
    }

    async fn get(&self, id: i64) -> Result<Option<MerchItem>> {
        self.get(id).await
    }

    async fn create(&self, draft: &ItemDraft) -> Result<MerchItem> {
        self.create(draft).await
    }

    async fn update(&self, id: i64, draft: &ItemDraft) -> Result<Option<MerchItem>> {
        self.update(id, draft).await
    }

    async fn set_image(&self, id: i64, image: &str) -> Result<Option<MerchItem>> {
        self.set_image(id, image).await
    }
}
