//! 个人订单处理器

use axum::{Json, extract::State};
use eco_core::models::OrderView;

use crate::dto::ApiResponse;
use crate::error::Result;
use crate::extract::CurrentUser;
use crate::state::AppState;

/// GET /api/orders/mine
pub async fn my_orders(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<ApiResponse<Vec<OrderView>>>> {
    let orders = state.redemption.my_orders(&actor).await?;
    Ok(Json(ApiResponse::success(orders)))
}
