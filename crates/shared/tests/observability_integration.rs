//! 可观测性模块集成测试
//!
//! 覆盖指标记录函数、请求 ID 中间件、配置和资源守卫。

// ============================================================================
// 指标记录测试
// ============================================================================

mod metrics_tests {
    use eco_shared::observability::metrics::{
        record_coin_movement, record_http_request, record_redemption, record_submission_review,
    };

    #[test]
    fn test_record_http_request() {
        record_http_request("GET", "/api/tasks", 200, 0.05);
        record_http_request("POST", "/api/store/items/{id}/redeem", 409, 0.12);
        record_http_request("PUT", "/api/moderation/orders/{id}/status", 200, 0.08);
        record_http_request("GET", "/api/not-found", 404, 0.01);
        record_http_request("POST", "/api/auth/login", 500, 0.25);
    }

    #[test]
    fn test_record_domain_counters() {
        for outcome in ["success", "insufficient_funds", "out_of_stock", "unavailable"] {
            record_redemption(outcome);
        }
        record_submission_review("approved");
        record_submission_review("rejected");
    }

    #[test]
    fn test_record_coin_movement_edge_values() {
        record_coin_movement(0);
        record_coin_movement(i64::MAX);
        record_coin_movement(i64::MIN);
    }
}

// ============================================================================
// 请求 ID 中间件测试
// ============================================================================

mod middleware_tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        middleware,
        routing::get,
    };
    use eco_shared::observability::middleware::{REQUEST_ID_HEADER, RequestId, request_id};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(middleware::from_fn(request_id))
    }

    #[test]
    fn test_request_id_creation() {
        let id = RequestId("test-id-123".to_string());
        assert_eq!(id.as_str(), "test-id-123");
        assert_eq!(id.clone().as_str(), "test-id-123");
    }

    #[tokio::test]
    async fn test_request_id_propagated() {
        let request = Request::builder()
            .uri("/")
            .header(REQUEST_ID_HEADER, "upstream-42")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[REQUEST_ID_HEADER], "upstream-42");
    }

    #[tokio::test]
    async fn test_request_id_generated() {
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();

        let response = app().oneshot(request).await.unwrap();
        let id = response.headers()[REQUEST_ID_HEADER].to_str().unwrap();
        assert_eq!(id.len(), 36);
    }
}

// ============================================================================
// 配置测试
// ============================================================================

mod config_tests {
    use eco_shared::observability::ObservabilityConfig;

    #[test]
    fn test_default_config() {
        let config = ObservabilityConfig::default();
        assert_eq!(config.service_name, "unknown-service");
        assert_eq!(config.metrics_port, 9090);
        assert_eq!(config.log_level, "info");
        assert!(!config.json_logs());
    }

    #[test]
    fn test_with_service_name() {
        let config = ObservabilityConfig::default().with_service_name("eco-api");
        assert_eq!(config.service_name, "eco-api");
    }
}

// ============================================================================
// Guard 测试
// ============================================================================

mod guard_tests {
    use eco_shared::observability::ObservabilityGuard;

    #[test]
    fn test_empty_guard() {
        let guard = ObservabilityGuard::empty();
        drop(guard);
    }
}
