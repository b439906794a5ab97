//! 请求 DTO 定义
//!
//! 所有 REST API 的请求参数和请求体结构

use chrono::{DateTime, Utc};
use eco_core::models::{
    DEFAULT_STOCK_QUANTITY, DEFAULT_TASK_REWARD, Difficulty, ItemDraft, OrderStatus,
    ProfileUpdate, TaskDraft, TaskFilter, TaskSort,
};
use serde::Deserialize;
use validator::{Validate, ValidationError};

/// 注册请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_password_confirm", skip_on_field_errors = false))]
pub struct SignupRequest {
    #[validate(
        length(min = 1, max = 150, message = "用户名长度必须在 1-150 之间"),
        custom(function = "validate_username")
    )]
    pub username: String,
    #[validate(email(message = "邮箱格式不正确"))]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "密码长度必须在 8-128 之间"))]
    pub password: String,
    pub password_confirm: Option<String>,
    #[validate(length(max = 150, message = "名字不能超过 150 个字符"))]
    #[serde(default)]
    pub first_name: String,
    #[validate(length(max = 150, message = "姓氏不能超过 150 个字符"))]
    #[serde(default)]
    pub last_name: String,
}

/// 用户名只允许字母、数字和 @ . + - _
fn validate_username(username: &str) -> Result<(), ValidationError> {
    let valid = username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'));
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("username_chars")
            .with_message("用户名只能包含字母、数字和 @.+-_".into()))
    }
}

fn validate_password_confirm(req: &SignupRequest) -> Result<(), ValidationError> {
    match &req.password_confirm {
        Some(confirm) if confirm != &req.password => Err(ValidationError::new(
            "password_mismatch",
        )
        .with_message("两次输入的密码不一致".into())),
        _ => Ok(()),
    }
}

/// 登录请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 150, message = "用户名长度必须在 1-150 之间"))]
    pub username: String,
    #[validate(length(min = 1, max = 128, message = "密码长度必须在 1-128 之间"))]
    pub password: String,
}

/// 兑换请求
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RedeemRequest {
    #[validate(length(max = 500, message = "收货地址不能超过 500 个字符"))]
    #[serde(default)]
    pub shipping_address: String,
}

/// 审核拒绝请求
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RejectRequest {
    #[validate(length(max = 1000, message = "审核意见不能超过 1000 个字符"))]
    #[serde(default)]
    pub comment: String,
}

/// 订单状态更新请求
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

/// 个人资料更新请求，缺省字段保持不变
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(max = 150, message = "名字不能超过 150 个字符"))]
    pub first_name: Option<String>,
    #[validate(length(max = 150, message = "姓氏不能超过 150 个字符"))]
    pub last_name: Option<String>,
    #[validate(email(message = "邮箱格式不正确"))]
    pub email: Option<String>,
    #[validate(length(max = 100, message = "所在地不能超过 100 个字符"))]
    pub location: Option<String>,
    #[validate(length(max = 500, message = "简介不能超过 500 个字符"))]
    pub bio: Option<String>,
    #[validate(range(min = 0, max = 150, message = "年龄必须在 0-150 之间"))]
    pub age: Option<i32>,
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            location: req.location,
            bio: req.bio,
            age: req.age,
        }
    }
}

/// 任务创建/更新请求（审核员）
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskRequest {
    #[validate(length(min = 1, max = 200, message = "任务标题长度必须在 1-200 之间"))]
    pub title: String,
    #[validate(length(min = 1, message = "任务描述不能为空"))]
    pub description: String,
    #[validate(range(min = 0, message = "任务奖励不能为负数"))]
    pub reward: Option<i64>,
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub is_featured: bool,
    pub is_active: Option<bool>,
}

impl From<TaskRequest> for TaskDraft {
    fn from(req: TaskRequest) -> Self {
        Self {
            title: req.title.trim().to_string(),
            description: req.description,
            reward: req.reward.unwrap_or(DEFAULT_TASK_REWARD),
            deadline: req.deadline,
            difficulty: req.difficulty,
            is_featured: req.is_featured,
            is_active: req.is_active.unwrap_or(true),
        }
    }
}

/// 商品创建/更新请求（审核员）
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    #[validate(length(min = 1, max = 200, message = "商品名称长度必须在 1-200 之间"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(range(min = 0, message = "商品价格不能为负数"))]
    pub coin_cost: i64,
    #[validate(range(min = 0, message = "库存不能为负数"))]
    pub stock_quantity: Option<i32>,
    pub is_available: Option<bool>,
}

impl From<CreateItemRequest> for ItemDraft {
    fn from(req: CreateItemRequest) -> Self {
        Self {
            name: req.name.trim().to_string(),
            description: req.description,
            coin_cost: req.coin_cost,
            stock_quantity: req.stock_quantity.unwrap_or(DEFAULT_STOCK_QUANTITY),
            is_available: req.is_available.unwrap_or(true),
        }
    }
}

/// 分页查询参数
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page: Option<i64>,
}

impl PageQuery {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1)
    }
}

/// 按状态过滤的列表查询，status 缺省为 pending，"all" 表示全部
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusQuery {
    pub status: Option<String>,
    pub page: Option<i64>,
}

impl StatusQuery {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1)
    }
}

/// 任务列表查询
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListQuery {
    pub difficulty: Option<Difficulty>,
    pub featured: Option<bool>,
    pub search: Option<String>,
    pub sort: Option<TaskSort>,
    pub page: Option<i64>,
}

impl TaskListQuery {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1)
    }

    pub fn to_filter(&self) -> TaskFilter {
        TaskFilter {
            difficulty: self.difficulty,
            featured_only: self.featured.unwrap_or(false),
            search: self.search.clone(),
            sort: self.sort.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::Fake;
    use fake::faker::internet::en::{Password, SafeEmail};

    fn signup(username: &str, password: &str, confirm: Option<&str>) -> SignupRequest {
        SignupRequest {
            username: username.to_string(),
            email: SafeEmail().fake(),
            password: password.to_string(),
            password_confirm: confirm.map(str::to_string),
            first_name: String::new(),
            last_name: String::new(),
        }
    }

    #[test]
    fn test_signup_validation() {
        let password: String = Password(8..20).fake();
        assert!(signup("green.hero+1", &password, Some(&password)).validate().is_ok());
        assert!(signup("green.hero", &password, None).validate().is_ok());

        assert!(signup("", &password, None).validate().is_err());
        assert!(signup("bad name!", &password, None).validate().is_err());
        assert!(signup("alice", "short", None).validate().is_err());
        assert!(signup("alice", &password, Some("different-password")).validate().is_err());
    }

    #[test]
    fn test_signup_rejects_bad_email() {
        let mut req = signup("alice", "long-enough-pw", None);
        req.email = "not-an-email".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_task_request_defaults() {
        let req: TaskRequest = serde_json::from_value(serde_json::json!({
            "title": "  Plant a tree ",
            "description": "Any native species"
        }))
        .unwrap();
        assert!(req.validate().is_ok());

        let draft = TaskDraft::from(req);
        assert_eq!(draft.title, "Plant a tree");
        assert_eq!(draft.reward, DEFAULT_TASK_REWARD);
        assert_eq!(draft.difficulty, Difficulty::Easy);
        assert!(draft.is_active);
        assert!(!draft.is_featured);
    }

    #[test]
    fn test_item_request_defaults_and_range() {
        let req: CreateItemRequest = serde_json::from_value(serde_json::json!({
            "name": "Bamboo Toothbrush",
            "coinCost": 40
        }))
        .unwrap();
        let draft = ItemDraft::from(req);
        assert_eq!(draft.stock_quantity, DEFAULT_STOCK_QUANTITY);
        assert!(draft.is_available);

        let bad: CreateItemRequest = serde_json::from_value(serde_json::json!({
            "name": "Bamboo Toothbrush",
            "coinCost": -1
        }))
        .unwrap();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_profile_age_range() {
        let req = UpdateProfileRequest {
            age: Some(151),
            ..Default::default()
        };
        assert!(req.validate().is_err());

        let req = UpdateProfileRequest {
            age: Some(30),
            ..Default::default()
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_task_list_query_filter() {
        let query = TaskListQuery {
            difficulty: Some(Difficulty::Hard),
            featured: Some(true),
            search: Some("river".to_string()),
            sort: Some(TaskSort::RewardHigh),
            page: None,
        };
        let filter = query.to_filter();
        assert_eq!(filter.difficulty, Some(Difficulty::Hard));
        assert!(filter.featured_only);
        assert_eq!(filter.sort, TaskSort::RewardHigh);
        assert_eq!(query.page(), 1);
    }
}
