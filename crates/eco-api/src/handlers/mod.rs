//! HTTP 请求处理器模块
//!
//! 处理器只负责参数提取、校验和响应封装，业务规则全部在 eco-core 的服务层

pub mod auth;
pub mod moderation;
pub mod notifications;
pub mod orders;
pub mod profile;
pub mod stats;
pub mod store;
pub mod submissions;
pub mod tasks;
pub mod transactions;
