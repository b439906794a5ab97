//! 统计处理器

use axum::{Json, extract::State};
use eco_core::dto::{Dashboard, HomeStats, LeaderboardEntry};

use crate::dto::ApiResponse;
use crate::error::Result;
use crate::extract::CurrentUser;
use crate::state::AppState;

/// 个人看板
///
/// GET /api/stats/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<ApiResponse<Dashboard>>> {
    let dashboard = state.stats.dashboard(&actor).await?;
    Ok(Json(ApiResponse::success(dashboard)))
}

/// 排行榜前 10 名
///
/// GET /api/stats/leaderboard
pub async fn leaderboard(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<LeaderboardEntry>>>> {
    let entries = state.stats.leaderboard().await?;
    Ok(Json(ApiResponse::success(entries)))
}

/// GET /api/stats/home
pub async fn home(State(state): State<AppState>) -> Result<Json<ApiResponse<HomeStats>>> {
    let stats = state.stats.home().await?;
    Ok(Json(ApiResponse::success(stats)))
}
