//! 审核后台处理器
//!
//! 路由层已挂 `require_moderator`，服务层仍会按 Actor 再校验一次角色

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
};
use eco_core::dto::{Overview, StatusFilter};
use eco_core::models::{
    ItemDraft, MerchItem, Order, OrderStatus, OrderView, Submission, SubmissionStatus,
    SubmissionView, Task, TaskDraft,
};
use tracing::warn;
use validator::Validate;

use crate::dto::{
    ApiResponse, CreateItemRequest, PageResponse, RejectRequest, StatusQuery, TaskRequest,
    UpdateOrderStatusRequest, UploadResponse,
};
use crate::error::Result;
use crate::extract::CurrentUser;
use crate::media::{MediaKind, UploadForm};
use crate::state::AppState;

// ============================================
// 提交审核
// ============================================

/// 提交列表，status 缺省为 pending，"all" 表示全部
///
/// GET /api/moderation/submissions
pub async fn list_submissions(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Query(query): Query<StatusQuery>,
) -> Result<Json<ApiResponse<PageResponse<SubmissionView>>>> {
    let filter = StatusFilter::parse(query.status.as_deref(), SubmissionStatus::Pending)?;
    let paged = state
        .review
        .review_queue(&actor, filter, query.page())
        .await?;
    Ok(Json(ApiResponse::success(paged.into())))
}

/// POST /api/moderation/submissions/{id}/approve
pub async fn approve_submission(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Submission>>> {
    let submission = state.review.approve(&actor, id).await?;
    Ok(Json(ApiResponse::success(submission)))
}

/// POST /api/moderation/submissions/{id}/reject
pub async fn reject_submission(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i64>,
    Json(req): Json<RejectRequest>,
) -> Result<Json<ApiResponse<Submission>>> {
    req.validate()?;

    let submission = state.review.reject(&actor, id, &req.comment).await?;
    Ok(Json(ApiResponse::success(submission)))
}

// ============================================
// 订单管理
// ============================================

/// 订单列表，status 缺省为 pending，"all" 表示全部
///
/// GET /api/moderation/orders
pub async fn list_orders(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Query(query): Query<StatusQuery>,
) -> Result<Json<ApiResponse<PageResponse<OrderView>>>> {
    let filter = StatusFilter::parse(query.status.as_deref(), OrderStatus::Pending)?;
    let paged = state
        .orders
        .list_for_moderation(&actor, filter, query.page())
        .await?;
    Ok(Json(ApiResponse::success(paged.into())))
}

/// PUT /api/moderation/orders/{id}/status
pub async fn update_order_status(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdateOrderStatusRequest>,
) -> Result<Json<ApiResponse<Order>>> {
    let order = state.orders.update_status(&actor, id, req.status).await?;
    Ok(Json(ApiResponse::success(order)))
}

/// GET /api/moderation/overview
pub async fn overview(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<ApiResponse<Overview>>> {
    let overview = state.stats.overview(&actor).await?;
    Ok(Json(ApiResponse::success(overview)))
}

// ============================================
// 任务管理
// ============================================

/// POST /api/moderation/tasks
pub async fn create_task(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Json(req): Json<TaskRequest>,
) -> Result<Json<ApiResponse<Task>>> {
    req.validate()?;

    let task = state.tasks.create(&actor, &TaskDraft::from(req)).await?;
    Ok(Json(ApiResponse::success(task)))
}

/// 任务详情，包含已下架的任务
///
/// GET /api/moderation/tasks/{id}
pub async fn get_task(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Task>>> {
    let task = state.tasks.get_any(&actor, id).await?;
    Ok(Json(ApiResponse::success(task)))
}

/// PUT /api/moderation/tasks/{id}
pub async fn update_task(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i64>,
    Json(req): Json<TaskRequest>,
) -> Result<Json<ApiResponse<Task>>> {
    req.validate()?;

    let task = state
        .tasks
        .update(&actor, id, &TaskDraft::from(req))
        .await?;
    Ok(Json(ApiResponse::success(task)))
}

/// 上传任务示例图
///
/// POST /api/moderation/tasks/{id}/photo
pub async fn upload_task_photo(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<UploadResponse<Task>>>> {
    let previous = state.tasks.get_any(&actor, id).await?.example_photo;

    let mut form = UploadForm::read(multipart, "photo").await?;
    let file = form.require_file("photo")?;
    let path = state.media.save(MediaKind::TaskExample, &file).await?;

    let task = match state.tasks.set_example_photo(&actor, id, &path).await {
        Ok(task) => task,
        Err(e) => {
            warn!(task_id = id, error = %e, "Task photo update failed, removing upload");
            state.media.delete(&path).await;
            return Err(e.into());
        }
    };

    if let Some(old) = previous {
        state.media.delete(&old).await;
    }

    let url = state.media.url_for(&path);
    Ok(Json(ApiResponse::success(UploadResponse { record: task, url })))
}

// ============================================
// 商品管理
// ============================================

/// POST /api/moderation/store/items
pub async fn create_item(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Json(req): Json<CreateItemRequest>,
) -> Result<Json<ApiResponse<MerchItem>>> {
    req.validate()?;

    let item = state.catalog.create(&actor, &ItemDraft::from(req)).await?;
    Ok(Json(ApiResponse::success(item)))
}

/// 更新商品，库存更新为 0 时自动下架
///
/// PUT /api/moderation/store/items/{id}
pub async fn update_item(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i64>,
    Json(req): Json<CreateItemRequest>,
) -> Result<Json<ApiResponse<MerchItem>>> {
    req.validate()?;

    let item = state
        .catalog
        .update(&actor, id, &ItemDraft::from(req))
        .await?;
    Ok(Json(ApiResponse::success(item)))
}

/// POST /api/moderation/store/items/{id}/image
pub async fn upload_item_image(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<UploadResponse<MerchItem>>>> {
    let previous = state.catalog.get(id).await?.image;

    let mut form = UploadForm::read(multipart, "image").await?;
    let file = form.require_file("image")?;
    let path = state.media.save(MediaKind::MerchImage, &file).await?;

    let item = match state.catalog.set_image(&actor, id, &path).await {
        Ok(item) => item,
        Err(e) => {
            warn!(item_id = id, error = %e, "Item image update failed, removing upload");
            state.media.delete(&path).await;
            return Err(e.into());
        }
    };

    if let Some(old) = previous {
        state.media.delete(&old).await;
    }

    let url = state.media.url_for(&path);
    Ok(Json(ApiResponse::success(UploadResponse { record: item, url })))
}
