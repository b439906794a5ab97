//! 个人提交记录处理器

use axum::{
    Json,
    extract::{Query, State},
};
use eco_core::dto::StatusFilter;
use eco_core::models::{SubmissionStatus, SubmissionView};

use crate::dto::{ApiResponse, StatusQuery};
use crate::error::Result;
use crate::extract::CurrentUser;
use crate::state::AppState;

/// 我的提交，status 缺省为全部
///
/// GET /api/submissions/mine
pub async fn my_submissions(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Query(query): Query<StatusQuery>,
) -> Result<Json<ApiResponse<Vec<SubmissionView>>>> {
    let status = match query.status.as_deref() {
        None => None,
        raw => StatusFilter::parse(raw, SubmissionStatus::Pending)?.status(),
    };

    let submissions = state.review.my_submissions(&actor, status).await?;
    Ok(Json(ApiResponse::success(submissions)))
}
