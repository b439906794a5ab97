//! 任务浏览与提交处理器

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
};
use eco_core::dto::TaskDetail;
use eco_core::models::{Submission, Task};
use tracing::warn;

use crate::dto::{ApiResponse, PageResponse, TaskListQuery};
use crate::error::{ApiError, Result};
use crate::extract::{CurrentUser, MaybeUser};
use crate::media::{MediaKind, UploadForm};
use crate::state::AppState;

/// 提交描述的最大长度
const MAX_SUBMISSION_DESCRIPTION_LEN: usize = 2000;

/// 任务列表（只含上架任务）
///
/// GET /api/tasks
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<TaskListQuery>,
) -> Result<Json<ApiResponse<PageResponse<Task>>>> {
    let paged = state.tasks.list(&query.to_filter(), query.page()).await?;
    Ok(Json(ApiResponse::success(paged.into())))
}

/// 任务详情，登录用户附带自己的提交
///
/// GET /api/tasks/{id}
pub async fn get_task(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<TaskDetail>>> {
    let detail = state.tasks.detail(id, viewer.as_ref()).await?;
    Ok(Json(ApiResponse::success(detail)))
}

/// 提交任务完成证明（multipart：description + image）
///
/// POST /api/tasks/{id}/submit
pub async fn submit_task(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<Submission>>> {
    let mut form = UploadForm::read(multipart, "image").await?;
    let description = submission_description(form.field("description"))?;
    let image = form.require_file("image")?;

    // 先检查资格，避免为注定失败的提交落盘
    state.review.ensure_can_submit(&actor, id).await?;

    let path = state.media.save(MediaKind::Submission, &image).await?;
    match state.review.submit(&actor, id, &description, &path).await {
        Ok(submission) => Ok(Json(ApiResponse::success_with_message(
            submission,
            "提交成功，等待审核",
        ))),
        Err(e) => {
            warn!(task_id = id, error = %e, "Submission failed, removing uploaded image");
            state.media.delete(&path).await;
            Err(e.into())
        }
    }
}

fn submission_description(raw: Option<&str>) -> Result<String> {
    let description = raw.map(str::trim).unwrap_or_default();
    if description.is_empty() {
        return Err(ApiError::Validation("请填写完成说明".to_string()));
    }
    if description.chars().count() > MAX_SUBMISSION_DESCRIPTION_LEN {
        return Err(ApiError::Validation(format!(
            "完成说明不能超过 {} 个字符",
            MAX_SUBMISSION_DESCRIPTION_LEN
        )));
    }
    Ok(description.to_string())
}
