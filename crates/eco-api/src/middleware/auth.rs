//! JWT 认证中间件
//!
//! 验证请求中的 Bearer Token 并将 Claims 注入请求扩展。
//! 未携带 Token 的请求直接放行，由处理器通过提取器决定是否需要登录。

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::error::ApiError;
use crate::state::AppState;

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(auth_header) = request.headers().get(header::AUTHORIZATION) else {
        return next.run(request).await;
    };

    let token = match auth_header.to_str().ok().and_then(bearer_token) {
        Some(token) => token.to_string(),
        None => return ApiError::unauthorized("认证头格式错误").into_response(),
    };

    let claims = match state.jwt_manager.verify_token(&token) {
        Ok(claims) => claims,
        Err(e) => return e.into_response(),
    };

    match state.revocations.is_revoked(&claims.jti).await {
        Ok(true) => return ApiError::unauthorized("Token 已失效").into_response(),
        Ok(false) => {}
        Err(e) => {
            // 吊销名单不可用时放行，与限流保持一致
            warn!(error = %e, "Token 吊销检查失败，跳过检查");
        }
    }

    request.extensions_mut().insert(claims);
    next.run(request).await
}

/// 解析 `Bearer <token>`
pub fn bearer_token(header_value: &str) -> Option<&str> {
    header_value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("Bearer   "), None);
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("abc"), None);
    }
}
