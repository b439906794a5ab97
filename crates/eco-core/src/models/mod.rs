//! 领域模型
//!
//! 包含账户、账本、任务、商品、订单、通知等核心实体定义

pub mod account;
pub mod enums;
pub mod ledger;
pub mod merch;
pub mod notification;
pub mod stats;
pub mod task;

// 重新导出常用类型
pub use account::{Account, NewAccount, Profile, ProfileUpdate};
pub use enums::{
    Difficulty, EntryKind, NotificationKind, OrderStatus, SubmissionStatus, TaskSort,
};
pub use ledger::{LedgerEntry, NewLedgerEntry};
pub use merch::{DEFAULT_STOCK_QUANTITY, ItemDraft, MerchItem, Order, OrderView};
pub use notification::{NewNotification, Notification};
pub use stats::{CountedRow, DashboardFigures, HomeCounts, LeaderRow, OverviewTotals};
pub use task::{
    DEFAULT_TASK_REWARD, NewSubmission, Submission, SubmissionView, Task, TaskDraft, TaskFilter,
};
