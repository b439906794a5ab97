//! 请求发起者
//!
//! 每次工作流调用都显式携带 Actor，服务层据此做归属和角色校验。

use serde::{Deserialize, Serialize};

use crate::error::{EcoError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub account_id: i64,
    pub username: String,
    pub is_moderator: bool,
}

impl Actor {
    pub fn new(account_id: i64, username: impl Into<String>, is_moderator: bool) -> Self {
        Self {
            account_id,
            username: username.into(),
            is_moderator,
        }
    }

    /// 审核类操作的角色校验
    pub fn require_moderator(&self) -> Result<()> {
        if self.is_moderator {
            Ok(())
        } else {
            Err(EcoError::Forbidden)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_moderator() {
        assert!(Actor::new(1, "mod", true).require_moderator().is_ok());
        assert!(matches!(
            Actor::new(2, "user", false).require_moderator(),
            Err(EcoError::Forbidden)
        ));
    }
}
