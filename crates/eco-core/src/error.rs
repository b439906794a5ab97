//! 核心服务错误类型
//!
//! 定义服务层的业务错误和系统错误

use thiserror::Error;

/// 核心服务错误类型
#[derive(Debug, Error)]
pub enum EcoError {
    // === 资源不存在 ===
    #[error("任务不存在: {0}")]
    TaskNotFound(i64),

    #[error("商品不存在或已下架: {0}")]
    ItemNotFound(i64),

    #[error("订单不存在: {0}")]
    OrderNotFound(i64),

    #[error("提交记录不存在: {0}")]
    SubmissionNotFound(i64),

    #[error("通知不存在: {0}")]
    NotificationNotFound(i64),

    #[error("账户不存在: {0}")]
    AccountNotFound(i64),

    // === 业务规则 ===
    #[error("金币余额不足: 需要 {required}, 可用 {available}")]
    InsufficientFunds { required: i64, available: i64 },

    #[error("商品库存不足: item_id={0}")]
    OutOfStock(i64),

    #[error("该任务已提交过: task_id={0}")]
    DuplicateSubmission(i64),

    #[error("提交状态不允许此操作: submission_id={id}, current_status={current}")]
    InvalidSubmissionTransition { id: i64, current: String },

    #[error("订单状态不允许流转: order_id={id}, {from} -> {to}")]
    InvalidOrderTransition { id: i64, from: String, to: String },

    #[error("用户名已被占用: {0}")]
    UsernameTaken(String),

    #[error("需要审核员权限")]
    Forbidden,

    #[error("金额必须为正数: {0}")]
    InvalidAmount(i64),

    #[error("参数校验失败: {0}")]
    Validation(String),

    // === 系统错误 ===
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),

    #[error("内部错误: {0}")]
    Internal(String),
}

/// 核心服务 Result 类型别名
pub type Result<T> = std::result::Result<T, EcoError>;

impl EcoError {
    /// 检查是否为业务错误（非系统错误）
    pub fn is_business_error(&self) -> bool {
        !matches!(self, Self::Database(_) | Self::Internal(_))
    }

    /// 检查是否为资源不存在类错误
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::TaskNotFound(_)
                | Self::ItemNotFound(_)
                | Self::OrderNotFound(_)
                | Self::SubmissionNotFound(_)
                | Self::NotificationNotFound(_)
                | Self::AccountNotFound(_)
        )
    }

    /// 获取错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::TaskNotFound(_) => "TASK_NOT_FOUND",
            Self::ItemNotFound(_) => "ITEM_NOT_FOUND",
            Self::OrderNotFound(_) => "ORDER_NOT_FOUND",
            Self::SubmissionNotFound(_) => "SUBMISSION_NOT_FOUND",
            Self::NotificationNotFound(_) => "NOTIFICATION_NOT_FOUND",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            Self::OutOfStock(_) => "OUT_OF_STOCK",
            Self::DuplicateSubmission(_) => "DUPLICATE_SUBMISSION",
            Self::InvalidSubmissionTransition { .. } => "INVALID_SUBMISSION_TRANSITION",
            Self::InvalidOrderTransition { .. } => "INVALID_ORDER_TRANSITION",
            Self::UsernameTaken(_) => "USERNAME_TAKEN",
            Self::Forbidden => "FORBIDDEN",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
