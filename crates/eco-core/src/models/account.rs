//! 账户与个人资料实体定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EcoError, Result};

/// 账户
///
/// coin_balance 是流水的物化汇总，只能通过账本服务修改
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub is_moderator: bool,
    pub coin_balance: i64,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn can_afford(&self, amount: i64) -> bool {
        self.coin_balance >= amount
    }

    /// 计算入账后的余额
    pub fn credited(&self, amount: i64) -> Result<i64> {
        if amount <= 0 {
            return Err(EcoError::InvalidAmount(amount));
        }
        self.coin_balance
            .checked_add(amount)
            .ok_or_else(|| EcoError::Validation(format!("余额溢出: account_id={}", self.id)))
    }

    /// 计算扣款后的余额，余额不足时不产生任何变化
    pub fn debited(&self, amount: i64) -> Result<i64> {
        if amount <= 0 {
            return Err(EcoError::InvalidAmount(amount));
        }
        if !self.can_afford(amount) {
            return Err(EcoError::InsufficientFunds {
                required: amount,
                available: self.coin_balance,
            });
        }
        Ok(self.coin_balance - amount)
    }
}

/// 新建账户参数
///
/// 密码在进入核心层前已完成哈希
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub is_moderator: bool,
}

/// 个人资料（与账户同一事务创建）
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub account_id: i64,
    pub location: String,
    pub bio: String,
    #[sqlx(default)]
    pub age: Option<i32>,
    #[sqlx(default)]
    pub photo: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// 个人资料更新
///
/// 字段为 None 表示保持不变
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub age: Option<i32>,
}

#[cfg(test)]
pub(crate) fn test_account(id: i64, balance: i64) -> Account {
    Account {
        id,
        username: format!("user{}", id),
        email: format!("user{}@example.com", id),
        first_name: String::new(),
        last_name: String::new(),
        password_hash: String::new(),
        is_moderator: false,
        coin_balance: balance,
        created_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debit_within_balance() {
        let account = test_account(1, 150);
        assert_eq!(account.debited(100).unwrap(), 50);
        assert_eq!(account.debited(150).unwrap(), 0);
    }

    #[test]
    fn test_debit_over_balance_fails() {
        let account = test_account(1, 99);
        match account.debited(100) {
            Err(EcoError::InsufficientFunds {
                required,
                available,
            }) => {
                assert_eq!(required, 100);
                assert_eq!(available, 99);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_non_positive_amounts_rejected() {
        let account = test_account(1, 10);
        assert!(matches!(account.debited(0), Err(EcoError::InvalidAmount(0))));
        assert!(matches!(
            account.credited(-5),
            Err(EcoError::InvalidAmount(-5))
        ));
    }

    #[test]
    fn test_credit_overflow() {
        let account = test_account(1, i64::MAX);
        assert!(matches!(account.credited(1), Err(EcoError::Validation(_))));
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let mut account = test_account(1, 0);
        account.password_hash = "$2b$secret".to_string();
        let json = serde_json::to_string(&account).unwrap();
        assert!(!json.contains("secret"));
        assert!(json.contains("coinBalance"));
    }
}
