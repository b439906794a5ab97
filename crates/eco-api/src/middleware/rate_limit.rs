//! 接口限流中间件
//!
//! 基于 Redis 固定窗口计数器（INCR + EXPIRE），支持多实例部署。
//! 已登录请求按账户计数，匿名请求按 TCP 对端 IP 计数；
//! 只有配置了 trust_forwarded_for 才采信 X-Forwarded-For。
//! Redis 不可用时放行，避免限流故障导致业务不可用。

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use eco_shared::cache::{Cache, CacheKey};
use tracing::warn;

use crate::auth::Claims;
use crate::error::ApiError;
use crate::state::AppState;

pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let config = &state.rate_limit;
    if !config.enabled || is_exempt_path(request.uri().path()) {
        return next.run(request).await;
    }

    let client = client_key(&request, config.trust_forwarded_for);
    let key = CacheKey::rate_limit(&format!("{}:{}", client, window_key(config.window_secs)));

    match check_rate_limit(&state.cache, &key, config.max_requests, config.window_secs).await {
        Ok(remaining) if remaining < 0 => {
            warn!(client = %client, path = %request.uri().path(), "接口限流触发");
            return too_many_requests_response(config.window_secs);
        }
        Err(e) => {
            warn!(error = %e, "Redis 限流检查失败，跳过限流");
        }
        _ => {}
    }

    next.run(request).await
}

/// 返回剩余配额（负数表示已超限）
async fn check_rate_limit(
    cache: &Arc<Cache>,
    key: &str,
    max_requests: i64,
    window_secs: u64,
) -> Result<i64, eco_shared::error::InfraError> {
    let count = cache.incr(key, 1).await?;

    // 首次创建时设置过期时间，确保窗口到期后自动清理
    if count == 1 {
        cache.expire(key, Duration::from_secs(window_secs)).await?;
    }

    Ok(max_requests - count)
}

/// 计数维度：账户优先，其次客户端 IP
fn client_key(request: &Request<Body>, trust_forwarded_for: bool) -> String {
    if let Some(claims) = request.extensions().get::<Claims>() {
        return format!("acct:{}", claims.sub);
    }

    if trust_forwarded_for {
        let forwarded = request
            .headers()
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());
        if let Some(ip) = forwarded {
            return format!("ip:{}", ip);
        }
    }

    match request.extensions().get::<ConnectInfo<SocketAddr>>() {
        Some(ConnectInfo(addr)) => format!("ip:{}", addr.ip()),
        None => "anonymous".to_string(),
    }
}

/// 以窗口大小对齐的 Unix 时间戳，相同窗口内的请求共享同一个计数器
fn window_key(window_secs: u64) -> u64 {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    now / window_secs.max(1)
}

fn is_exempt_path(path: &str) -> bool {
    matches!(path, "/health" | "/ready" | "/metrics") || path.starts_with("/media/")
}

/// 429 响应，带 Retry-After 头
fn too_many_requests_response(window_secs: u64) -> Response {
    let mut response = ApiError::RateLimited.into_response();
    if let Ok(val) = HeaderValue::from_str(&window_secs.to_string()) {
        response.headers_mut().insert("Retry-After", val);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn request() -> Request<Body> {
        Request::builder().uri("/api/tasks").body(Body::empty()).unwrap()
    }

    #[test]
    fn test_exempt_paths() {
        assert!(is_exempt_path("/health"));
        assert!(is_exempt_path("/ready"));
        assert!(is_exempt_path("/media/submissions/a.png"));
        assert!(!is_exempt_path("/api/tasks"));
    }

    #[test]
    fn test_client_key_prefers_account() {
        let mut req = request();
        req.extensions_mut().insert(Claims {
            sub: "7".to_string(),
            username: "alice".to_string(),
            roles: vec![],
            jti: "j".to_string(),
            iat: 0,
            exp: 0,
            iss: "eco-api".to_string(),
        });
        req.headers_mut()
            .insert("x-forwarded-for", HeaderValue::from_static("1.2.3.4"));
        assert_eq!(client_key(&req, true), "acct:7");
    }

    fn from_peer(forwarded_for: &str) -> Request<Body> {
        let mut req = request();
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([198, 51, 100, 7], 40000))));
        req.headers_mut().insert(
            "x-forwarded-for",
            HeaderValue::from_str(forwarded_for).unwrap(),
        );
        req
    }

    #[test]
    fn test_client_key_ignores_forwarded_for_by_default() {
        let keys: Vec<String> = ["10.0.0.0", "10.0.0.1", "10.0.0.2"]
            .iter()
            .map(|ip| client_key(&from_peer(ip), false))
            .collect();
        assert!(keys.iter().all(|k| k == "ip:198.51.100.7"));
    }

    #[test]
    fn test_client_key_trusted_proxy() {
        let req = from_peer("203.0.113.9, 10.0.0.1");
        assert_eq!(client_key(&req, true), "ip:203.0.113.9");

        // 代理未带头时退回对端地址
        let mut req = request();
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([10, 1, 2, 3], 5555))));
        assert_eq!(client_key(&req, true), "ip:10.1.2.3");
    }

    #[test]
    fn test_client_key_without_peer() {
        assert_eq!(client_key(&request(), false), "anonymous");
    }

    #[test]
    fn test_window_key_stability() {
        assert_eq!(window_key(60), window_key(60));
    }

    #[test]
    fn test_too_many_requests_response() {
        let response = too_many_requests_response(60);
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()["Retry-After"], "60");
    }
}
