//! 业务服务层
//!
//! 写路径（记账、兑换、审核、订单、注册）直接持有连接池并自行管理事务；
//! 读路径依赖仓储 trait，便于 mock 测试。

pub mod dto;

mod account_service;
mod catalog_service;
mod ledger_service;
mod notification_service;
mod order_service;
mod redemption_service;
mod review_service;
mod stats_service;
mod task_service;

pub use account_service::AccountService;
pub use catalog_service::CatalogService;
pub use ledger_service::LedgerService;
pub use notification_service::NotificationService;
pub use order_service::OrderService;
pub use redemption_service::{MAX_SHIPPING_ADDRESS_LEN, RedemptionService};
pub use review_service::{MAX_COMMENT_LEN, ReviewService};
pub use stats_service::StatsService;
pub use task_service::TaskService;
