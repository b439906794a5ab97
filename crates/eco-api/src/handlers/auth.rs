//! 认证相关的 HTTP 处理器
//!
//! 提供注册、登录、登出和获取当前用户的 API

use std::time::Duration;

use axum::{Json, extract::State};
use eco_core::dto::AccountWithProfile;
use eco_core::models::{Account, NewAccount};
use tracing::{info, warn};
use validator::Validate;

use crate::auth::{hash_password, verify_password};
use crate::dto::{ApiResponse, AuthResponse, LoginRequest, SignupRequest};
use crate::error::{ApiError, Result};
use crate::extract::{CurrentClaims, CurrentUser};
use crate::state::AppState;

/// 用户注册
///
/// POST /api/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>> {
    req.validate()?;

    let new_account = NewAccount {
        username: req.username.trim().to_string(),
        email: req.email.trim().to_string(),
        first_name: req.first_name.trim().to_string(),
        last_name: req.last_name.trim().to_string(),
        password_hash: hash_password(&req.password)?,
        is_moderator: false,
    };

    let created = state.accounts.register(&new_account).await?;
    let response = issue_token(&state, created.account)?;

    Ok(Json(ApiResponse::success_with_message(response, "注册成功")))
}

/// 用户登录
///
/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>> {
    req.validate()?;

    state.login_limiter.check(&req.username).await?;

    let account = match state.accounts.find_by_username(&req.username).await? {
        Some(account) if verify_password(&req.password, &account.password_hash)? => account,
        _ => {
            state.login_limiter.record_failure(&req.username).await;
            warn!(username = %req.username, "Login failed");
            return Err(ApiError::InvalidCredentials);
        }
    };

    state.login_limiter.reset(&req.username).await;
    info!(account_id = account.id, "Login succeeded");

    let response = issue_token(&state, account)?;
    Ok(Json(ApiResponse::success(response)))
}

/// 用户登出：吊销当前 Token
///
/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    CurrentClaims(claims): CurrentClaims,
) -> Result<Json<ApiResponse<()>>> {
    let ttl = Duration::from_secs(claims.remaining_secs().max(1));
    state.revocations.revoke(&claims.jti, ttl).await?;

    info!(account_id = %claims.sub, "Logged out");
    Ok(Json(ApiResponse::success_empty()))
}

/// 获取当前用户信息
///
/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<ApiResponse<AccountWithProfile>>> {
    let me = state.accounts.me(&actor).await?;
    Ok(Json(ApiResponse::success(me)))
}

fn issue_token(state: &AppState, account: Account) -> Result<AuthResponse> {
    let (token, expires_at) =
        state
            .jwt_manager
            .generate_token(account.id, &account.username, account.is_moderator)?;

    Ok(AuthResponse {
        token,
        expires_at,
        user: account,
    })
}
