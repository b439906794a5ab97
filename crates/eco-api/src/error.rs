//! HTTP 错误类型定义
//!
//! 所有失败都在请求边界转换为统一的 JSON 错误响应：
//! `{"success": false, "code": ..., "message": ..., "data": null}`

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use eco_core::EcoError;
use eco_shared::error::InfraError;
use serde_json::json;

/// HTTP 层错误类型
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    // 认证错误
    #[error("未授权: {0}")]
    Unauthorized(String),
    #[error("禁止访问: {0}")]
    Forbidden(String),
    #[error("用户名或密码错误")]
    InvalidCredentials,
    #[error("请求过于频繁，请稍后再试")]
    RateLimited,

    // 请求错误
    #[error("参数验证失败: {0}")]
    Validation(String),
    #[error("文件处理失败: {0}")]
    FileProcessing(String),
    #[error("上传文件过大: {0}")]
    PayloadTooLarge(String),

    // 领域错误
    #[error(transparent)]
    Core(#[from] EcoError),

    // 系统错误
    #[error("基础设施错误: {0}")]
    Infra(#[from] InfraError),
    #[error("内部错误: {0}")]
    Internal(String),
}

impl ApiError {
    /// 返回对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::FileProcessing(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Core(e) => core_status(e),
            Self::Infra(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 返回错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::RateLimited => "RATE_LIMITED",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::FileProcessing(_) => "FILE_PROCESSING_ERROR",
            Self::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            Self::Core(e) => e.error_code(),
            Self::Infra(e) => e.code(),
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }
}

fn core_status(error: &EcoError) -> StatusCode {
    match error {
        e if e.is_not_found() => StatusCode::NOT_FOUND,
        EcoError::Forbidden => StatusCode::FORBIDDEN,
        EcoError::Validation(_) | EcoError::InvalidAmount(_) | EcoError::UsernameTaken(_) => {
            StatusCode::BAD_REQUEST
        }
        EcoError::InsufficientFunds { .. }
        | EcoError::OutOfStock(_)
        | EcoError::DuplicateSubmission(_)
        | EcoError::InvalidSubmissionTransition { .. }
        | EcoError::InvalidOrderTransition { .. } => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 系统级错误只返回通用提示，详细信息仅记录日志
        let message = match &self {
            Self::Core(e) if !e.is_business_error() => {
                tracing::error!(error = %e, "服务内部错误");
                "服务内部错误，请稍后重试".to_string()
            }
            Self::Infra(e) => {
                tracing::error!(error = %e, code = e.code(), "基础设施错误");
                "服务内部错误，请稍后重试".to_string()
            }
            Self::Internal(e) => {
                tracing::error!(error = %e, "内部错误");
                "服务内部错误，请稍后重试".to_string()
            }
            other => other.to_string(),
        };

        let body = json!({
            "success": false,
            "code": self.error_code(),
            "message": message,
            "data": serde_json::Value::Null
        });

        (status, axum::Json(body)).into_response()
    }
}

/// 从 validator 错误转换
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        Self::Core(EcoError::Database(err))
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return Self::PayloadTooLarge(err.body_text());
        }
        Self::Validation(format!("multipart 解析失败: {}", err.body_text()))
    }
}

/// HTTP 层 Result 类型别名
pub type Result<T> = std::result::Result<T, ApiError>;
