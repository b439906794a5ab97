//! 金币商城处理器

use axum::{
    Json,
    extract::{Path, State},
};
use eco_core::dto::RedemptionReceipt;
use eco_core::models::MerchItem;
use validator::Validate;

use crate::dto::{ApiResponse, RedeemRequest};
use crate::error::Result;
use crate::extract::CurrentUser;
use crate::state::AppState;

/// 在售商品，按价格升序
///
/// GET /api/store/items
pub async fn list_items(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<MerchItem>>>> {
    let items = state.catalog.list_available().await?;
    Ok(Json(ApiResponse::success(items)))
}

/// GET /api/store/items/{id}
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<MerchItem>>> {
    let item = state.catalog.get(id).await?;
    Ok(Json(ApiResponse::success(item)))
}

/// 金币兑换商品
///
/// POST /api/store/items/{id}/redeem
pub async fn redeem_item(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i64>,
    Json(req): Json<RedeemRequest>,
) -> Result<Json<ApiResponse<RedemptionReceipt>>> {
    req.validate()?;

    let receipt = state
        .redemption
        .redeem(&actor, id, &req.shipping_address)
        .await?;

    Ok(Json(ApiResponse::success_with_message(receipt, "兑换成功")))
}
