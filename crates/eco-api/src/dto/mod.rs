//! DTO 模块
//!
//! 包含所有请求和响应的数据传输对象

pub mod request;
pub mod response;

pub use request::{
    CreateItemRequest, LoginRequest, PageQuery, RedeemRequest, RejectRequest, SignupRequest,
    StatusQuery, TaskListQuery, TaskRequest, UpdateOrderStatusRequest, UpdateProfileRequest,
};
pub use response::{
    ApiResponse, AuthResponse, MarkAllReadResponse, PageResponse, UnreadCountResponse,
    UploadResponse,
};
