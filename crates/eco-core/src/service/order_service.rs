//! 订单管理服务（审核员）
//!
//! 订单状态按流转表更新，每次成功更新都会在同一事务内通知下单人。
//! 取消订单不退还金币。

use std::sync::Arc;

use sqlx::PgPool;
use tracing::{info, instrument};

use crate::actor::Actor;
use crate::error::{EcoError, Result};
use crate::models::{NewNotification, Order, OrderStatus, OrderView};
use crate::repository::{NotificationRepository, OrderRepository};
use crate::service::dto::{DEFAULT_PAGE_SIZE, PageRequest, Paged, StatusFilter};

pub struct OrderService {
    order_repo: Arc<OrderRepository>,
    pool: PgPool,
}

impl OrderService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            order_repo: Arc::new(OrderRepository::new(pool.clone())),
            pool,
        }
    }

    /// 更新订单状态
    #[instrument(skip(self, actor), fields(moderator = %actor.username, order_id = %order_id, status = %status))]
    pub async fn update_status(
        &self,
        actor: &Actor,
        order_id: i64,
        status: OrderStatus,
    ) -> Result<Order> {
        actor.require_moderator()?;

        let mut tx = self.pool.begin().await?;

        let current = OrderRepository::lock_view_in_tx(&mut tx, order_id)
            .await?
            .ok_or(EcoError::OrderNotFound(order_id))?;

        if !current.status.can_transition_to(status) {
            return Err(EcoError::InvalidOrderTransition {
                id: order_id,
                from: current.status.to_string(),
                to: status.to_string(),
            });
        }

        let updated = OrderRepository::set_status_in_tx(&mut tx, order_id, status).await?;

        NotificationRepository::create_in_tx(
            &mut tx,
            &NewNotification::order_update(current.account_id, &current.item_name, status),
        )
        .await?;

        tx.commit().await?;

        info!(
            order_id,
            from = %current.status,
            to = %status,
            "Order status updated"
        );

        Ok(updated)
    }

    /// 订单列表，默认只看待处理
    #[instrument(skip(self, actor), fields(moderator = %actor.username))]
    pub async fn list_for_moderation(
        &self,
        actor: &Actor,
        filter: StatusFilter<OrderStatus>,
        page: i64,
    ) -> Result<Paged<OrderView>> {
        actor.require_moderator()?;

        let request = PageRequest::new(page, DEFAULT_PAGE_SIZE);
        let (items, total) = self
            .order_repo
            .list_by_status(filter.status(), request.limit(), request.offset())
            .await?;

        Ok(Paged::new(items, total, request))
    }
}
