//! 任务提交仓储

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};

use super::traits::SubmissionRepositoryTrait;
use crate::error::Result;
use crate::models::{NewSubmission, Submission, SubmissionStatus, SubmissionView};

const SUBMISSION_COLUMNS: &str = "id, account_id, task_id, description, image, status, \
                                  moderator_comment, created_at, reviewed_at";

const VIEW_SELECT: &str = r#"
    SELECT s.id, s.account_id, a.username, s.task_id, t.title AS task_title,
           t.reward AS task_reward, s.description, s.image, s.status,
           s.moderator_comment, s.created_at, s.reviewed_at
    FROM submissions s
    JOIN accounts a ON a.id = s.account_id
    JOIN tasks t ON t.id = s.task_id
"#;

pub struct SubmissionRepository {
    pool: PgPool,
}

impl SubmissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 在事务中创建提交
    ///
    /// 同一账户对同一任务已有提交时返回 None（唯一约束兜底）
    pub async fn create_in_tx(
        tx: &mut PgConnection,
        submission: &NewSubmission,
    ) -> Result<Option<Submission>> {
        let created = sqlx::query_as::<_, Submission>(&format!(
            r#"
            INSERT INTO submissions (account_id, task_id, description, image)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT ON CONSTRAINT uq_submissions_account_task DO NOTHING
            RETURNING {}
            "#,
            SUBMISSION_COLUMNS
        ))
        .bind(submission.account_id)
        .bind(submission.task_id)
        .bind(&submission.description)
        .bind(&submission.image)
        .fetch_optional(tx)
        .await?;

        Ok(created)
    }

    /// 锁定提交行（FOR UPDATE）
    pub async fn lock_in_tx(tx: &mut PgConnection, id: i64) -> Result<Option<Submission>> {
        let submission = sqlx::query_as::<_, Submission>(&format!(
            "SELECT {} FROM submissions WHERE id = $1 FOR UPDATE",
            SUBMISSION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(tx)
        .await?;

        Ok(submission)
    }

    /// 在事务中写入审核结果
    pub async fn set_review_in_tx(
        tx: &mut PgConnection,
        id: i64,
        status: SubmissionStatus,
        comment: &str,
    ) -> Result<Submission> {
        let submission = sqlx::query_as::<_, Submission>(&format!(
            r#"
            UPDATE submissions
            SET status = $2, moderator_comment = $3, reviewed_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            SUBMISSION_COLUMNS
        ))
        .bind(id)
        .bind(status)
        .bind(comment)
        .fetch_one(tx)
        .await?;

        Ok(submission)
    }

    pub async fn find_for(&self, account_id: i64, task_id: i64) -> Result<Option<Submission>> {
        let submission = sqlx::query_as::<_, Submission>(&format!(
            "SELECT {} FROM submissions WHERE account_id = $1 AND task_id = $2",
            SUBMISSION_COLUMNS
        ))
        .bind(account_id)
        .bind(task_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(submission)
    }

    pub async fn list_by_account(
        &self,
        account_id: i64,
        status: Option<SubmissionStatus>,
    ) -> Result<Vec<SubmissionView>> {
        let submissions = sqlx::query_as::<_, SubmissionView>(&format!(
            r#"
            {}
            WHERE s.account_id = $1 AND ($2::varchar IS NULL OR s.status = $2)
            ORDER BY s.created_at DESC, s.id DESC
            "#,
            VIEW_SELECT
        ))
        .bind(account_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(submissions)
    }

    /// 审核列表，最早提交的排在前面
    pub async fn list_by_status(
        &self,
        status: Option<SubmissionStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<SubmissionView>, i64)> {
        let submissions = sqlx::query_as::<_, SubmissionView>(&format!(
            r#"
            {}
            WHERE ($1::varchar IS NULL OR s.status = $1)
            ORDER BY s.created_at ASC, s.id ASC
            LIMIT $2 OFFSET $3
            "#,
            VIEW_SELECT
        ))
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM submissions WHERE ($1::varchar IS NULL OR status = $1)",
        )
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        Ok((submissions, total))
    }
}

#[async_trait]
impl SubmissionRepositoryTrait for SubmissionRepository {
    async fn find_for(&self, account_id: i64, task_id: i64) -> Result<Option<Submission>> {
        self.find_for(account_id, task_id).await
    }

    async fn list_by_account(
        &self,
        account_id: i64,
        status: Option<SubmissionStatus>,
    ) -> Result<Vec<SubmissionView>> {
        self.list_by_account(account_id, status).await
    }

    async fn list_by_status(
        &self,
        status: Option<SubmissionStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<SubmissionView>, i64)> {
        self.list_by_status(status, limit, offset).await
    }
}
