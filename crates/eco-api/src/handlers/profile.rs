//! 个人资料处理器

use axum::{
    Json,
    extract::{Multipart, State},
};
use eco_core::dto::AccountWithProfile;
use eco_core::models::{Profile, ProfileUpdate};
use tracing::warn;
use validator::Validate;

use crate::dto::{ApiResponse, UpdateProfileRequest, UploadResponse};
use crate::error::Result;
use crate::extract::CurrentUser;
use crate::media::{MediaKind, UploadForm};
use crate::state::AppState;

/// GET /api/profile
pub async fn get_profile(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<ApiResponse<AccountWithProfile>>> {
    let me = state.accounts.me(&actor).await?;
    Ok(Json(ApiResponse::success(me)))
}

/// 更新资料：未提供的字段保持不变
///
/// PUT /api/profile
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<AccountWithProfile>>> {
    req.validate()?;

    let update = ProfileUpdate::from(req);
    let updated = state.accounts.update_profile(&actor, &update).await?;
    Ok(Json(ApiResponse::success_with_message(updated, "资料已更新")))
}

/// 上传头像，替换成功后删除旧文件
///
/// POST /api/profile/photo
pub async fn upload_photo(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    multipart: Multipart,
) -> Result<Json<ApiResponse<UploadResponse<Profile>>>> {
    let mut form = UploadForm::read(multipart, "photo").await?;
    let file = form.require_file("photo")?;

    let path = state.media.save(MediaKind::ProfilePhoto, &file).await?;
    let (profile, previous) = match state.accounts.set_photo(&actor, &path).await {
        Ok(result) => result,
        Err(e) => {
            warn!(account_id = actor.account_id, error = %e, "Photo update failed, removing upload");
            state.media.delete(&path).await;
            return Err(e.into());
        }
    };

    if let Some(old) = previous.filter(|old| old != &path) {
        state.media.delete(&old).await;
    }

    let url = state.media.url_for(&path);
    Ok(Json(ApiResponse::success(UploadResponse {
        record: profile,
        url,
    })))
}
