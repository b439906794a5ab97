//! 金币流水实体定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::EntryKind;
use crate::error::{EcoError, Result};

/// 金币流水
///
/// 不可变，amount 带符号：earn 为正，spend 为负
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub id: i64,
    pub account_id: i64,
    pub amount: i64,
    pub kind: EntryKind,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// 待写入的流水
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLedgerEntry {
    pub account_id: i64,
    pub amount: i64,
    pub kind: EntryKind,
    pub description: String,
}

impl NewLedgerEntry {
    /// 入账流水，amount 必须为正
    pub fn earn(account_id: i64, amount: i64, description: impl Into<String>) -> Result<Self> {
        Self::build(account_id, amount, EntryKind::Earn, description.into())
    }

    /// 扣款流水，传入正数，存储为负数
    pub fn spend(account_id: i64, amount: i64, description: impl Into<String>) -> Result<Self> {
        Self::build(account_id, amount, EntryKind::Spend, description.into())
    }

    fn build(account_id: i64, amount: i64, kind: EntryKind, description: String) -> Result<Self> {
        if amount <= 0 {
            return Err(EcoError::InvalidAmount(amount));
        }
        Ok(Self {
            account_id,
            amount: amount * kind.sign(),
            kind,
            description,
        })
    }

    /// 流水对应的正数金额
    pub fn magnitude(&self) -> i64 {
        self.amount.abs()
    }

    pub fn task_reward(account_id: i64, task_title: &str, reward: i64) -> Result<Self> {
        Self::earn(account_id, reward, format!("Completed task: {}", task_title))
    }

    pub fn redemption(account_id: i64, item_name: &str, cost: i64) -> Result<Self> {
        Self::spend(account_id, cost, format!("Redeemed: {}", item_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spend_is_negative() {
        let e = NewLedgerEntry::redemption(1, "Bamboo Cup", 100).unwrap();
        assert_eq!(e.amount, -100);
        assert_eq!(e.kind, EntryKind::Spend);
        assert_eq!(e.magnitude(), 100);
        assert_eq!(e.description, "Redeemed: Bamboo Cup");
    }

    #[test]
    fn test_earn_description() {
        let e = NewLedgerEntry::task_reward(1, "Plant a tree", 25).unwrap();
        assert_eq!(e.amount, 25);
        assert_eq!(e.description, "Completed task: Plant a tree");
    }

    #[test]
    fn test_zero_amount_rejected() {
        assert!(matches!(
            NewLedgerEntry::earn(1, 0, "x"),
            Err(EcoError::InvalidAmount(0))
        ));
        assert!(matches!(
            NewLedgerEntry::spend(1, -3, "x"),
            Err(EcoError::InvalidAmount(-3))
        ));
    }
}
