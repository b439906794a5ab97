//! 账户仓储
//!
//! 账户与个人资料的数据访问。余额列只由账本服务在事务内修改。

use sqlx::{PgConnection, PgPool};

use crate::error::Result;
use crate::models::{Account, NewAccount, Profile, ProfileUpdate};

const ACCOUNT_COLUMNS: &str = "id, username, email, first_name, last_name, password_hash, \
                               is_moderator, coin_balance, created_at";

pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, id: i64) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {} FROM accounts WHERE id = $1",
            ACCOUNT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {} FROM accounts WHERE username = $1",
            ACCOUNT_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    pub async fn get_profile(&self, account_id: i64) -> Result<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT account_id, location, bio, age, photo, updated_at
            FROM profiles
            WHERE account_id = $1
            "#,
        )
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    /// 在事务中创建账户
    ///
    /// 用户名冲突时返回 None
    pub async fn create_in_tx(tx: &mut PgConnection, account: &NewAccount) -> Result<Option<Account>> {
        let created = sqlx::query_as::<_, Account>(&format!(
            r#"
            INSERT INTO accounts (username, email, first_name, last_name, password_hash, is_moderator)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (username) DO NOTHING
            RETURNING {}
            "#,
            ACCOUNT_COLUMNS
        ))
        .bind(&account.username)
        .bind(&account.email)
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(&account.password_hash)
        .bind(account.is_moderator)
        .fetch_optional(tx)
        .await?;

        Ok(created)
    }

    /// 在事务中把账户提升为审核员
    pub async fn promote_in_tx(tx: &mut PgConnection, username: &str) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "UPDATE accounts SET is_moderator = TRUE WHERE username = $1 RETURNING {}",
            ACCOUNT_COLUMNS
        ))
        .bind(username)
        .fetch_optional(tx)
        .await?;

        Ok(account)
    }

    /// 在事务中创建空白个人资料
    pub async fn create_profile_in_tx(tx: &mut PgConnection, account_id: i64) -> Result<Profile> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (account_id)
            VALUES ($1)
            RETURNING account_id, location, bio, age, photo, updated_at
            "#,
        )
        .bind(account_id)
        .fetch_one(tx)
        .await?;

        Ok(profile)
    }

    /// 锁定账户行（FOR UPDATE）
    ///
    /// 所有余额变动必须先拿到该锁
    pub async fn lock_in_tx(tx: &mut PgConnection, id: i64) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {} FROM accounts WHERE id = $1 FOR UPDATE",
            ACCOUNT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(tx)
        .await?;

        Ok(account)
    }

    /// 在事务中写入新余额
    pub async fn set_balance_in_tx(tx: &mut PgConnection, id: i64, balance: i64) -> Result<()> {
        sqlx::query("UPDATE accounts SET coin_balance = $2 WHERE id = $1")
            .bind(id)
            .bind(balance)
            .execute(tx)
            .await?;

        Ok(())
    }

    /// 在事务中更新账户基本信息
    pub async fn update_names_in_tx(
        tx: &mut PgConnection,
        id: i64,
        update: &ProfileUpdate,
    ) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(&format!(
            r#"
            UPDATE accounts
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email)
            WHERE id = $1
            RETURNING {}
            "#,
            ACCOUNT_COLUMNS
        ))
        .bind(id)
        .bind(&update.first_name)
        .bind(&update.last_name)
        .bind(&update.email)
        .fetch_optional(tx)
        .await?;

        Ok(account)
    }

    /// 在事务中更新个人资料，资料缺失时补建
    pub async fn upsert_profile_in_tx(
        tx: &mut PgConnection,
        account_id: i64,
        update: &ProfileUpdate,
    ) -> Result<Profile> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (account_id, location, bio, age)
            VALUES ($1, COALESCE($2, ''), COALESCE($3, ''), $4)
            ON CONFLICT (account_id) DO UPDATE
            SET location = COALESCE($2, profiles.location),
                bio = COALESCE($3, profiles.bio),
                age = COALESCE($4, profiles.age),
                updated_at = NOW()
            RETURNING account_id, location, bio, age, photo, updated_at
            "#,
        )
        .bind(account_id)
        .bind(&update.location)
        .bind(&update.bio)
        .bind(update.age)
        .fetch_one(tx)
        .await?;

        Ok(profile)
    }

    /// 替换头像，返回 (新资料, 旧头像路径)
    pub async fn set_photo(&self, account_id: i64, photo: &str) -> Result<(Profile, Option<String>)> {
        let mut tx = self.pool.begin().await?;

        let previous: Option<Option<String>> =
            sqlx::query_scalar("SELECT photo FROM profiles WHERE account_id = $1 FOR UPDATE")
                .bind(account_id)
                .fetch_optional(&mut *tx)
                .await?;

        let profile = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (account_id, photo)
            VALUES ($1, $2)
            ON CONFLICT (account_id) DO UPDATE
            SET photo = $2, updated_at = NOW()
            RETURNING account_id, location, bio, age, photo, updated_at
            "#,
        )
        .bind(account_id)
        .bind(photo)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((profile, previous.flatten()))
    }
}
