//! 审核员权限中间件
//!
//! 挂在审核后台路由上：未登录返回 401，非审核员返回 403

use axum::{
    body::Body,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth::Claims;
use crate::error::ApiError;

pub async fn require_moderator(request: Request<Body>, next: Next) -> Response {
    match request.extensions().get::<Claims>() {
        None => ApiError::unauthorized("未认证").into_response(),
        Some(claims) if !claims.is_moderator() => {
            ApiError::Forbidden("需要审核员权限".to_string()).into_response()
        }
        Some(_) => next.run(request).await,
    }
}
