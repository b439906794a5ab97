//! 金币流水处理器

use axum::{
    Json,
    extract::{Query, State},
};
use eco_core::dto::TransactionHistory;

use crate::dto::{ApiResponse, PageQuery};
use crate::error::Result;
use crate::extract::CurrentUser;
use crate::state::AppState;

/// 我的流水（每页 20 条），附累计获得金币与当前余额
///
/// GET /api/transactions
pub async fn list_transactions(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<TransactionHistory>>> {
    let history = state.ledger.history(&actor, query.page()).await?;
    Ok(Json(ApiResponse::success(history)))
}
