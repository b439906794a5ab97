//! 环保任务核心服务
//!
//! 提供任务、提交审核、金币账本、商品兑换、订单、通知与统计等领域能力。
//!
//! ## 核心功能
//!
//! - **金币账本**：余额变动与流水记录在同一事务内完成，流水只追加
//! - **商品兑换**：余额检查、库存扣减、订单创建、通知发送一次性提交
//! - **提交审核**：审核通过发放奖励，拒绝记录审核意见，状态只能从待审核流转一次
//! - **订单管理**：按状态流转表更新订单并通知用户
//! - **统计**：个人看板、排行榜、首页统计、审核后台概览
//!
//! ## 模块结构
//!
//! - `actor`: 请求发起者（由 JWT 声明构造）
//! - `models`: 领域模型定义
//! - `error`: 错误类型定义
//! - `repository`: 数据库仓储层
//! - `service`: 业务服务层

pub mod actor;
pub mod error;
pub mod models;
pub mod repository;
pub mod service;

pub use actor::Actor;
pub use error::{EcoError, Result};
pub use models::*;
pub use repository::{
    AccountRepository, LedgerRepository, MerchRepository, NotificationRepository,
    OrderRepository, StatsRepository, SubmissionRepository, TaskRepository,
};
pub use service::{
    AccountService, CatalogService, LedgerService, NotificationService, OrderService,
    RedemptionService, ReviewService, StatsService, TaskService, dto,
};
