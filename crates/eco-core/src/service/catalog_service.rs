//! 商品目录服务
//!
//! 商城展示在架商品（按价格升序），审核员维护商品信息与库存。

use std::sync::Arc;

use tracing::{info, instrument};

use crate::actor::Actor;
use crate::error::{EcoError, Result};
use crate::models::{ItemDraft, MerchItem};
use crate::repository::MerchRepositoryTrait;

pub struct CatalogService<MR>
where
    MR: MerchRepositoryTrait,
{
    merch_repo: Arc<MR>,
}

impl<MR> CatalogService<MR>
where
    MR: MerchRepositoryTrait,
{
    pub fn new(merch_repo: Arc<MR>) -> Self {
        Self { merch_repo }
    }

    pub async fn list_available(&self) -> Result<Vec<MerchItem>> {
        self.merch_repo.list_available().await
    }

    /// 商品详情（不论是否在架）
    pub async fn get(&self, item_id: i64) -> Result<MerchItem> {
        self.merch_repo
            .get(item_id)
            .await?
            .ok_or(EcoError::ItemNotFound(item_id))
    }

    #[instrument(skip(self, actor, draft), fields(moderator = %actor.username))]
    pub async fn create(&self, actor: &Actor, draft: &ItemDraft) -> Result<MerchItem> {
        actor.require_moderator()?;
        validate_draft(draft)?;

        let item = self.merch_repo.create(draft).await?;
        info!(item_id = item.id, name = %item.name, "Merch item created");
        Ok(item)
    }

    /// 更新商品；库存为 0 时强制下架
    #[instrument(skip(self, actor, draft), fields(moderator = %actor.username))]
    pub async fn update(&self, actor: &Actor, item_id: i64, draft: &ItemDraft) -> Result<MerchItem> {
        actor.require_moderator()?;
        validate_draft(draft)?;

        let item = self
            .merch_repo
            .update(item_id, draft)
            .await?
            .ok_or(EcoError::ItemNotFound(item_id))?;
        info!(
            item_id,
            stock = item.stock_quantity,
            available = item.is_available,
            "Merch item updated"
        );
        Ok(item)
    }

    pub async fn set_image(&self, actor: &Actor, item_id: i64, image: &str) -> Result<MerchItem> {
        actor.require_moderator()?;

        self.merch_repo
            .set_image(item_id, image)
            .await?
            .ok_or(EcoError::ItemNotFound(item_id))
    }
}

fn validate_draft(draft: &ItemDraft) -> Result<()> {
    if draft.name.trim().is_empty() {
        return Err(EcoError::Validation("商品名称不能为空".to_string()));
    }
    if draft.coin_cost < 0 {
        return Err(EcoError::Validation("商品价格不能为负数".to_string()));
    }
    if draft.stock_quantity < 0 {
        return Err(EcoError::Validation("库存不能为负数".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::merch::test_item;
    use crate::repository::MockMerchRepositoryTrait;

    fn draft(stock: i32) -> ItemDraft {
        ItemDraft {
            name: "Reusable Bottle".to_string(),
            description: String::new(),
            coin_cost: 80,
            stock_quantity: stock,
            is_available: true,
        }
    }

    #[tokio::test]
    async fn test_get_missing_item() {
        let mut repo = MockMerchRepositoryTrait::new();
        repo.expect_get().returning(|_| Ok(None));

        let err = CatalogService::new(Arc::new(repo)).get(5).await.unwrap_err();
        assert!(matches!(err, EcoError::ItemNotFound(5)));
    }

    #[tokio::test]
    async fn test_list_passthrough() {
        let mut repo = MockMerchRepositoryTrait::new();
        repo.expect_list_available()
            .times(1)
            .returning(|| Ok(vec![test_item(1, 10, 3), test_item(2, 50, 1)]));

        let items = CatalogService::new(Arc::new(repo)).list_available().await.unwrap();
        assert_eq!(items.len(), 2);
    }

    #[tokio::test]
    async fn test_update_rejects_negative_stock() {
        let repo = MockMerchRepositoryTrait::new();
        let err = CatalogService::new(Arc::new(repo))
            .update(&Actor::new(1, "mod", true), 1, &draft(-1))
            .await
            .unwrap_err();
        assert!(matches!(err, EcoError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_requires_moderator() {
        let repo = MockMerchRepositoryTrait::new();
        let err = CatalogService::new(Arc::new(repo))
            .create(&Actor::new(1, "user", false), &draft(5))
            .await
            .unwrap_err();
        assert!(matches!(err, EcoError::Forbidden));
    }
}
