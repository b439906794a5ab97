//! 站内通知处理器

use axum::{
    Json,
    extract::{Path, Query, State},
};
use eco_core::models::Notification;

use crate::dto::{
    ApiResponse, MarkAllReadResponse, PageQuery, PageResponse, UnreadCountResponse,
};
use crate::error::Result;
use crate::extract::CurrentUser;
use crate::state::AppState;

/// 我的通知，最新的在前
///
/// GET /api/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<PageResponse<Notification>>>> {
    let paged = state.notifications.list(&actor, query.page()).await?;
    Ok(Json(ApiResponse::success(paged.into())))
}

/// GET /api/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<ApiResponse<UnreadCountResponse>>> {
    let unread = state.notifications.unread_count(&actor).await?;
    Ok(Json(ApiResponse::success(UnreadCountResponse { unread })))
}

/// 标记单条已读，只能操作自己的通知
///
/// POST /api/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    state.notifications.mark_read(&actor, id).await?;
    Ok(Json(ApiResponse::success_empty()))
}

/// POST /api/notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<ApiResponse<MarkAllReadResponse>>> {
    let updated = state.notifications.mark_all_read(&actor).await?;
    Ok(Json(ApiResponse::success(MarkAllReadResponse { updated })))
}
