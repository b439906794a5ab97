//! 数据库仓储层
//!
//! 提供所有实体的数据访问接口，封装 SQL 操作细节。
//!
//! ## 设计原则
//!
//! - 仓储只负责数据持久化，不包含业务逻辑
//! - 使用 SQLx 进行类型安全的数据库操作
//! - 事务控制由调用方（服务层）决定，事务内操作以 `_in_tx` 结尾
//! - 读路径定义 trait 接口以支持 mock 测试

mod account_repo;
mod ledger_repo;
mod merch_repo;
mod notification_repo;
mod order_repo;
mod stats_repo;
mod submission_repo;
mod task_repo;
mod traits;

pub use account_repo::AccountRepository;
pub use ledger_repo::LedgerRepository;
pub use merch_repo::MerchRepository;
pub use notification_repo::NotificationRepository;
pub use order_repo::OrderRepository;
pub use stats_repo::StatsRepository;
pub use submission_repo::SubmissionRepository;
pub use task_repo::TaskRepository;
pub use traits::*;
