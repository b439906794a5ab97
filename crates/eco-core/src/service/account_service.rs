//! 账户服务
//!
//! 注册时账户与个人资料在同一事务内创建；密码哈希由调用方完成。

use std::sync::Arc;

use sqlx::PgPool;
use tracing::{info, instrument};

use crate::actor::Actor;
use crate::error::{EcoError, Result};
use crate::models::{Account, NewAccount, Profile, ProfileUpdate};
use crate::repository::AccountRepository;
use crate::service::dto::AccountWithProfile;

pub struct AccountService {
    account_repo: Arc<AccountRepository>,
    pool: PgPool,
}

impl AccountService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            account_repo: Arc::new(AccountRepository::new(pool.clone())),
            pool,
        }
    }

    /// 注册账户
    #[instrument(skip(self, new_account), fields(username = %new_account.username))]
    pub async fn register(&self, new_account: &NewAccount) -> Result<AccountWithProfile> {
        let mut tx = self.pool.begin().await?;

        let account = AccountRepository::create_in_tx(&mut tx, new_account)
            .await?
            .ok_or_else(|| EcoError::UsernameTaken(new_account.username.clone()))?;
        let profile = AccountRepository::create_profile_in_tx(&mut tx, account.id).await?;

        tx.commit().await?;

        info!(account_id = account.id, "Account registered");

        Ok(AccountWithProfile { account, profile })
    }

    /// 确保存在一个审核员账户
    ///
    /// 用户名不存在时按 new_account 创建（强制为审核员），已存在时只提升权限，
    /// 不改动原有密码。返回账户以及是否为新建。
    #[instrument(skip(self, new_account), fields(username = %new_account.username))]
    pub async fn ensure_moderator(&self, new_account: &NewAccount) -> Result<(Account, bool)> {
        let new_account = NewAccount {
            is_moderator: true,
            ..new_account.clone()
        };

        let mut tx = self.pool.begin().await?;

        let (account, created) =
            match AccountRepository::create_in_tx(&mut tx, &new_account).await? {
                Some(account) => {
                    AccountRepository::create_profile_in_tx(&mut tx, account.id).await?;
                    (account, true)
                }
                None => {
                    let account = AccountRepository::promote_in_tx(&mut tx, &new_account.username)
                        .await?
                        .ok_or_else(|| {
                            EcoError::Internal(format!(
                                "账户 {} 在提升时已不存在",
                                new_account.username
                            ))
                        })?;
                    (account, false)
                }
            };

        tx.commit().await?;

        info!(account_id = account.id, created, "Moderator account ensured");

        Ok((account, created))
    }

    /// 按用户名查找（登录校验用，包含密码哈希）
    pub async fn find_by_username(&self, username: &str) -> Result<Option<Account>> {
        self.account_repo.get_by_username(username).await
    }

    pub async fn get(&self, account_id: i64) -> Result<Account> {
        self.account_repo
            .get(account_id)
            .await?
            .ok_or(EcoError::AccountNotFound(account_id))
    }

    /// 当前用户与个人资料
    pub async fn me(&self, actor: &Actor) -> Result<AccountWithProfile> {
        let account = self.get(actor.account_id).await?;
        let profile = self
            .account_repo
            .get_profile(actor.account_id)
            .await?
            .unwrap_or_else(|| empty_profile(actor.account_id));

        Ok(AccountWithProfile { account, profile })
    }

    /// 更新个人资料（姓名、邮箱、所在地、简介、年龄）
    #[instrument(skip(self, actor, update), fields(account_id = %actor.account_id))]
    pub async fn update_profile(
        &self,
        actor: &Actor,
        update: &ProfileUpdate,
    ) -> Result<AccountWithProfile> {
        if update.age.is_some_and(|age| !(0..=150).contains(&age)) {
            return Err(EcoError::Validation("年龄必须在 0 到 150 之间".to_string()));
        }

        let mut tx = self.pool.begin().await?;

        let account = AccountRepository::update_names_in_tx(&mut tx, actor.account_id, update)
            .await?
            .ok_or(EcoError::AccountNotFound(actor.account_id))?;
        let profile =
            AccountRepository::upsert_profile_in_tx(&mut tx, actor.account_id, update).await?;

        tx.commit().await?;

        info!(account_id = actor.account_id, "Profile updated");

        Ok(AccountWithProfile { account, profile })
    }

    /// 替换头像，返回新资料和需要清理的旧文件路径
    #[instrument(skip(self, actor), fields(account_id = %actor.account_id))]
    pub async fn set_photo(&self, actor: &Actor, photo: &str) -> Result<(Profile, Option<String>)> {
        self.account_repo.set_photo(actor.account_id, photo).await
    }
}

fn empty_profile(account_id: i64) -> Profile {
    Profile {
        account_id,
        location: String::new(),
        bio: String::new(),
        age: None,
        photo: None,
        updated_at: chrono::Utc::now(),
    }
}
