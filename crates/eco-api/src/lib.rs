//! 环保任务平台 HTTP 服务
//!
//! 提供注册登录、任务与提交、金币商城、订单、通知、统计以及审核后台的 JSON API。
//!
//! ## 模块结构
//!
//! - `auth`: JWT、密码哈希、Token 吊销与登录限流
//! - `dto`: 请求和响应的数据传输对象
//! - `error`: HTTP 错误类型与统一响应封装
//! - `extract`: 从请求中提取当前用户
//! - `handlers`: HTTP 请求处理器
//! - `media`: 上传文件的本地存储
//! - `middleware`: 认证、审核员权限、限流中间件
//! - `routes`: 路由配置
//! - `state`: 应用状态
//!
//! ## 技术栈
//!
//! - Web 框架：Axum
//! - 数据验证：validator
//! - 序列化：serde (camelCase)

pub mod auth;
pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod media;
pub mod middleware;
pub mod routes;
pub mod state;

pub use dto::{ApiResponse, PageResponse};
pub use error::{ApiError, Result};
pub use state::AppState;
